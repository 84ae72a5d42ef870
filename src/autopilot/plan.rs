use crate::gnc::{ApoapsisBand, PitchLimits};

/// Parameters of the apoapsis steering phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SteerPlan {
    pub duration: f64, // s, total budget including the final hold
    pub band: ApoapsisBand,
    pub limits: PitchLimits,
    pub initial_pitch: f64,
    pub max_oscillations: u32,
    pub heading: f64,
    /// Heading drift that forces a re-command before steering starts.
    pub initial_heading_tolerance: f64,
    pub loop_heading_tolerance: f64,
    pub hold_heading_tolerance: f64,
    pub cadence: f64,     // s between samples
    pub nudge_settle: f64,
}

impl Default for SteerPlan {
    fn default() -> Self {
        Self {
            duration: 80.0,
            band: ApoapsisBand::default(),
            limits: PitchLimits::default(),
            initial_pitch: 90.0,
            max_oscillations: 3,
            heading: 90.0,
            initial_heading_tolerance: 2.0,
            loop_heading_tolerance: 1.0,
            hold_heading_tolerance: 0.5,
            cadence: 0.05,
            nudge_settle: 2.0,
        }
    }
}

/// Parameters of the circularization burn.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPlan {
    pub target_apoapsis: f64,  // m
    pub target_periapsis: f64, // m
    pub align_poll: f64,
    pub burn_poll: f64,
    /// Burn ends early once the estimated remaining delta-v drops to this.
    pub cutoff_delta_v: f64,
    pub settle: f64,
}

impl Default for OrbitPlan {
    fn default() -> Self {
        Self {
            target_apoapsis: 210_000.0,
            target_periapsis: 210_000.0,
            align_poll: 0.5,
            burn_poll: 0.1,
            cutoff_delta_v: 5.0,
            settle: 3.0,
        }
    }
}

/// Whole-ascent script for the "Luna-9" stack.
#[derive(Debug, Clone, PartialEq)]
pub struct AscentPlan {
    pub pre_ignition_wait: f64,
    pub post_ignition_wait: f64,
    /// Decouple stage whose solid fuel signals booster burnout.
    pub booster_decouple_stage: i32,
    pub booster_resource: String,
    pub booster_poll: f64,
    pub separation_settle: f64,
    pub steer: SteerPlan,
    pub coast_apoapsis: f64, // m
    pub coast_poll: f64,
    pub coast_timeout: Option<f64>,
    pub orbit_stage_events: u32,
    pub orbit_action_group: u32,
    pub orbit: OrbitPlan,
    pub payload_stage_events: u32,
}

impl Default for AscentPlan {
    fn default() -> Self {
        Self {
            pre_ignition_wait: 3.0,
            post_ignition_wait: 3.0,
            booster_decouple_stage: 12,
            booster_resource: "SolidFuel".into(),
            booster_poll: 0.5,
            separation_settle: 2.0,
            steer: SteerPlan::default(),
            coast_apoapsis: 200_000.0,
            coast_poll: 1.0,
            coast_timeout: None,
            orbit_stage_events: 2,
            orbit_action_group: 1,
            orbit: OrbitPlan::default(),
            payload_stage_events: 2,
        }
    }
}
