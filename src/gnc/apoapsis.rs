// ---------------------------------------------------------------------------
// Apoapsis band controller: two-state bang-bang on target pitch
// ---------------------------------------------------------------------------

/// Pitch change (deg) for a given distance (km) between apoapsis and the
/// band edge being approached.
pub fn pitch_step(distance_km: f64) -> f64 {
    if distance_km > 100.0 {
        3.0
    } else if distance_km > 50.0 {
        2.0
    } else if distance_km > 20.0 {
        1.5
    } else if distance_km > 10.0 {
        1.0
    } else if distance_km > 5.0 {
        0.7
    } else {
        0.3
    }
}

/// Target apoapsis band in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApoapsisBand {
    pub low_km: f64,
    pub high_km: f64,
}

impl ApoapsisBand {
    pub fn mid_km(&self) -> f64 {
        (self.low_km + self.high_km) / 2.0
    }

    pub fn contains(&self, apoapsis_km: f64) -> bool {
        apoapsis_km >= self.low_km && apoapsis_km <= self.high_km
    }
}

impl Default for ApoapsisBand {
    fn default() -> Self {
        Self { low_km: 210.0, high_km: 215.0 }
    }
}

/// Pitch clamps (deg above the horizon).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchLimits {
    pub min: f64,
    pub max: f64,
}

impl PitchLimits {
    pub fn clamp(&self, pitch: f64) -> f64 {
        pitch.max(self.min).min(self.max)
    }
}

impl Default for PitchLimits {
    fn default() -> Self {
        Self { min: -30.0, max: 10.0 }
    }
}

/// Which way the oscillator is pushing apoapsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Apoapsis above the band: pitch down until it falls to the lower edge.
    Lowering,
    /// Apoapsis below the band: pitch up until it reaches the upper edge.
    Raising,
}

/// Result of feeding one apoapsis sample to the oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscillatorStep {
    /// Command this pitch.
    Adjust(f64),
    /// Band edge crossed; mode changed, nothing to command this tick.
    Switched(Mode),
}

/// Two-state apoapsis oscillator with a cap on Lowering -> Raising flips.
#[derive(Debug, Clone)]
pub struct ApoapsisOscillator {
    pub band: ApoapsisBand,
    pub limits: PitchLimits,
    pub max_oscillations: u32,
    mode: Mode,
    pitch: f64,
    oscillations: u32,
}

impl ApoapsisOscillator {
    pub fn new(band: ApoapsisBand, limits: PitchLimits, initial_pitch: f64, max_oscillations: u32) -> Self {
        Self {
            band,
            limits,
            max_oscillations,
            mode: Mode::Lowering,
            pitch: initial_pitch,
            oscillations: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn oscillations(&self) -> u32 {
        self.oscillations
    }

    /// Oscillation budget used up.
    pub fn exhausted(&self) -> bool {
        self.oscillations >= self.max_oscillations
    }

    pub fn step(&mut self, apoapsis_km: f64) -> OscillatorStep {
        match self.mode {
            Mode::Lowering => {
                if apoapsis_km > self.band.low_km {
                    let step = pitch_step(apoapsis_km - self.band.low_km);
                    self.pitch = (self.pitch - step).max(self.limits.min);
                    OscillatorStep::Adjust(self.pitch)
                } else {
                    self.mode = Mode::Raising;
                    self.oscillations += 1;
                    self.pitch = self.limits.min + 5.0;
                    OscillatorStep::Switched(Mode::Raising)
                }
            }
            Mode::Raising => {
                if apoapsis_km < self.band.high_km {
                    let step = pitch_step(self.band.high_km - apoapsis_km);
                    self.pitch = (self.pitch + step).min(self.limits.max);
                    OscillatorStep::Adjust(self.pitch)
                } else {
                    self.mode = Mode::Lowering;
                    self.pitch = self.limits.max - 5.0;
                    OscillatorStep::Switched(Mode::Lowering)
                }
            }
        }
    }

    /// One-shot correction toward the band midpoint after the loop: +-2 deg
    /// when more than 5 km off, `None` when close enough.
    pub fn final_nudge(&mut self, apoapsis_km: f64) -> Option<f64> {
        let diff = apoapsis_km - self.band.mid_km();
        if diff.abs() <= 5.0 {
            return None;
        }
        self.pitch = if diff > 0.0 {
            (self.pitch - 2.0).max(self.limits.min)
        } else {
            (self.pitch + 2.0).min(self.limits.max)
        };
        Some(self.pitch)
    }
}

impl Default for ApoapsisOscillator {
    fn default() -> Self {
        Self::new(ApoapsisBand::default(), PitchLimits::default(), 90.0, 3)
    }
}
