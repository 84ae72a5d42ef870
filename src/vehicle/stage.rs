// ---------------------------------------------------------------------------
// Propulsion phases and jettisoned hardware
// ---------------------------------------------------------------------------

/// Constant-thrust, constant-flow propulsion phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Propulsion {
    pub thrust: f64,    // N
    pub mass_flow: f64, // kg/s
    pub cutoff: f64,    // s, mission time at which the phase stops burning
}

impl Propulsion {
    /// Phase that burns `propellant` kg over `burn_time` seconds from t = 0.
    pub fn from_burn(thrust: f64, propellant: f64, burn_time: f64) -> Self {
        let mass_flow = if burn_time > 0.0 { propellant / burn_time } else { 0.0 };
        Self { thrust, mass_flow, cutoff: burn_time }
    }

    /// Thrust and flow at mission time `t`, zero after cutoff.
    pub fn at(&self, t: f64) -> (f64, f64) {
        if t < self.cutoff {
            (self.thrust, self.mass_flow)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Identical units (strap-on boosters) dropped together at a fixed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Jettison {
    pub name: String,
    pub unit_mass: f64, // kg
    pub count: u32,
    pub time: f64,      // s
}

impl Jettison {
    pub fn total_mass(&self) -> f64 {
        self.unit_mass * f64::from(self.count)
    }
}
