use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// 1-D state: altitude, vertical speed, mass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalState {
    pub time: f64,     // s
    pub altitude: f64, // m
    pub velocity: f64, // m/s, positive up
    pub mass: f64,     // kg
}

// ---------------------------------------------------------------------------
// 2-D state: downrange/altitude plane
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarState {
    pub time: f64,
    pub pos: Vector2<f64>, // m   [downrange, up]
    pub vel: Vector2<f64>, // m/s
    pub mass: f64,         // kg
    pub pitch: f64,        // deg above horizon, as commanded during the step
}

impl PlanarState {
    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn downrange(&self) -> f64 {
        self.pos.x
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Angle of the velocity above the horizon (deg).
    pub fn flight_path_angle(&self) -> f64 {
        let speed = self.speed();
        if speed < 1e-9 {
            return 90.0;
        }
        (self.vel.y / speed).asin().to_degrees()
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub dt: f64,       // integration timestep, s
    pub max_time: f64, // horizon, s
}

impl SimConfig {
    pub fn with_horizon(max_time: f64) -> Self {
        Self { max_time, ..Self::default() }
    }

    /// A positive finite step and a finite, non-negative horizon.
    pub fn is_valid(&self) -> bool {
        self.dt.is_finite() && self.dt > 0.0 && self.max_time.is_finite() && self.max_time >= 0.0
    }

    /// Expected number of samples, initial state included.
    pub fn samples(&self) -> usize {
        if !self.is_valid() {
            return 1;
        }
        ((self.max_time / self.dt).ceil() as usize).saturating_add(1)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,         // 10 Hz, matches the log cadence
            max_time: 70.0,  // booster burn
        }
    }
}
