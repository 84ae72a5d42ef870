// ---------------------------------------------------------------------------
// Isothermal exponential atmosphere
// ---------------------------------------------------------------------------

/// Density model `rho(h) = rho0 * exp(-h / H)`.
///
/// Default values are the sea-level density and scale height fitted to the
/// game's home planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialAtmosphere {
    pub surface_density: f64, // kg/m^3
    pub scale_height: f64,    // m
}

impl ExponentialAtmosphere {
    /// Air density at a given altitude above the surface.
    ///
    /// No clamping: negative altitudes give densities above sea level, which
    /// only happens if a model is started below the pad.
    pub fn density(&self, altitude: f64) -> f64 {
        self.surface_density * (-altitude / self.scale_height).exp()
    }
}

impl Default for ExponentialAtmosphere {
    fn default() -> Self {
        Self {
            surface_density: 1.223_094_855_487_4,
            scale_height: 5_600.0,
        }
    }
}
