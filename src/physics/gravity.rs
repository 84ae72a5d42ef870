/// Central body for the point-mass models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub surface_gravity: f64, // m/s^2
    pub radius: f64,          // m
}

impl Body {
    /// Inverse-square gravity magnitude at an altitude above the surface.
    pub fn gravity(&self, altitude: f64) -> f64 {
        self.surface_gravity * (self.radius / (self.radius + altitude)).powi(2)
    }

    /// Weight of a mass at an altitude (N).
    pub fn weight(&self, mass: f64, altitude: f64) -> f64 {
        mass * self.gravity(altitude)
    }
}

impl Default for Body {
    /// Home planet of the game: 600 km radius, 9.81 m/s^2 at the surface.
    fn default() -> Self {
        Self {
            surface_gravity: 9.81,
            radius: 600_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Orbital helpers
// ---------------------------------------------------------------------------

/// Vis-viva: orbital speed at radius `r` on an orbit with semi-major axis `a`.
pub fn vis_viva_speed(mu: f64, r: f64, a: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / a)).sqrt()
}
