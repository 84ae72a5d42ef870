/// Signed heading difference `current - target` wrapped into (-180, 180] deg.
pub fn heading_error(current: f64, target: f64) -> f64 {
    let e = (current - target).rem_euclid(360.0);
    if e > 180.0 {
        e - 360.0
    } else {
        e
    }
}

/// Re-command the target heading when drift exceeds a tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingHold {
    pub target: f64,    // deg
    pub tolerance: f64, // deg
}

impl HeadingHold {
    pub fn new(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    pub fn needs_correction(&self, heading: f64) -> bool {
        heading_error(heading, self.target).abs() > self.tolerance
    }
}
