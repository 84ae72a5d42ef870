pub mod guidance;
pub mod apoapsis;
pub mod heading;
pub mod circularize;

pub use guidance::PitchProgram;
pub use apoapsis::{pitch_step, ApoapsisBand, ApoapsisOscillator, Mode, OscillatorStep, PitchLimits};
pub use heading::{heading_error, HeadingHold};
pub use circularize::{remaining_delta_v, BurnPlan, OrbitSnapshot, ISP_TO_EXHAUST, MAX_BURN_TIME};
