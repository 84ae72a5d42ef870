// ---------------------------------------------------------------------------
// Guidance: open-loop pitch program keyed to altitude
// ---------------------------------------------------------------------------

/// Piecewise-linear pitch schedule, degrees above the horizon as a function
/// of altitude.
///
/// Breakpoints must be sorted by altitude. Below the first breakpoint the
/// first pitch holds, above the last the last pitch holds. The shipped
/// breakpoints were fitted to one logged flight and are calibration data for
/// that vehicle only.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchProgram {
    points: Vec<(f64, f64)>, // (altitude m, pitch deg)
}

impl PitchProgram {
    /// Build a program from `(altitude, pitch)` breakpoints.
    ///
    /// Returns `None` for an empty table or one that is not strictly
    /// increasing in altitude.
    pub fn new(points: Vec<(f64, f64)>) -> Option<Self> {
        if points.is_empty() || points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return None;
        }
        Some(Self { points })
    }

    /// Constant pitch at every altitude.
    pub fn constant(pitch_deg: f64) -> Self {
        Self { points: vec![(0.0, pitch_deg)] }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Commanded pitch (deg) at `altitude` (m).
    pub fn pitch_at(&self, altitude: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if altitude <= first.0 {
            return first.1;
        }
        if altitude >= last.0 {
            return last.1;
        }
        for w in self.points.windows(2) {
            let (h0, p0) = w[0];
            let (h1, p1) = w[1];
            if altitude < h1 {
                let frac = (altitude - h0) / (h1 - h0);
                return p0 + frac * (p1 - p0);
            }
        }
        last.1
    }
}

impl Default for PitchProgram {
    /// Schedule hand-fitted to the logged "Luna-9" ascent.
    fn default() -> Self {
        Self {
            points: vec![
                (0.0, 90.0),
                (1_500.0, 90.0),
                (5_000.0, 80.0),
                (10_000.0, 68.0),
                (20_000.0, 52.0),
                (35_000.0, 36.0),
                (50_000.0, 24.0),
                (70_000.0, 12.0),
                (90_000.0, 5.0),
            ],
        }
    }
}
