use nalgebra::Vector2;

/// Drag properties of the airframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aero {
    pub drag_coefficient: f64, // Cx
    pub reference_area: f64,   // m^2
}

impl Aero {
    /// Signed drag along a single axis, opposing `velocity`.
    pub fn drag_1d(&self, density: f64, velocity: f64) -> f64 {
        let sign = if velocity >= 0.0 { 1.0 } else { -1.0 };
        0.5 * density * velocity * velocity * self.drag_coefficient * self.reference_area * sign
    }

    /// Drag force vector opposing `vel`.
    pub fn drag_2d(&self, density: f64, vel: &Vector2<f64>) -> Vector2<f64> {
        let speed = vel.norm();
        if speed > 1e-9 {
            let drag_mag = 0.5 * density * speed * speed * self.drag_coefficient * self.reference_area;
            -vel / speed * drag_mag
        } else {
            Vector2::zeros()
        }
    }
}

impl Default for Aero {
    fn default() -> Self {
        Self {
            drag_coefficient: 0.5,
            reference_area: 19.04,
        }
    }
}
