//! Boundary between the flight programs and the game.
//!
//! [`FlightLink`] is the set of telemetry getters and commands the autopilot
//! and the recorder need; the kRPC implementation lives in [`krpc`] behind
//! the `krpc` feature. [`Clock`] supplies wall time and sleeping so every
//! wait can run against a fake in tests.

pub mod clock;
pub mod poll;
#[cfg(feature = "krpc")]
pub mod krpc;
#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, WallClock};
pub use poll::{poll_until, PollOutcome};

use anyhow::Result;

/// Reference frame for the attitude autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttitudeFrame {
    /// Pitch/heading relative to the local horizon.
    Surface,
    /// Point along the burn vector of a maneuver node.
    ManeuverNode(NodeId),
}

/// Handle of a maneuver node created through the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Gravitating body the vessel orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyInfo {
    pub equatorial_radius: f64, // m
    pub mu: f64,                // m^3/s^2
}

/// Telemetry and commands for the active vessel.
///
/// Staging consumes the link and returns the handle for whatever vessel is
/// active afterwards, so a handle to the pre-staging vessel can never be used
/// again.
pub trait FlightLink: Sized {
    // -- telemetry ---------------------------------------------------------

    /// Game universal time (s).
    fn universal_time(&self) -> Result<f64>;
    fn surface_altitude(&self) -> Result<f64>;
    fn apoapsis_altitude(&self) -> Result<f64>;
    fn periapsis_altitude(&self) -> Result<f64>;
    fn time_to_apoapsis(&self) -> Result<f64>;
    fn semi_major_axis(&self) -> Result<f64>;
    fn body(&self) -> Result<BodyInfo>;
    /// Compass heading (deg).
    fn heading(&self) -> Result<f64>;
    /// Pitch above the horizon (deg).
    fn pitch(&self) -> Result<f64>;
    /// Speed relative to the body's rotating frame (m/s).
    fn speed(&self) -> Result<f64>;
    fn mass(&self) -> Result<f64>;
    fn available_thrust(&self) -> Result<f64>;
    fn specific_impulse(&self) -> Result<f64>;
    fn any_engine_active(&self) -> Result<bool>;
    /// Amount of `resource` in parts decoupled by `stage`, that stage only.
    fn resource_in_decouple_stage(&self, stage: i32, resource: &str) -> Result<f64>;

    // -- commands ----------------------------------------------------------

    fn set_throttle(&mut self, throttle: f64) -> Result<()>;
    fn set_sas(&mut self, enabled: bool) -> Result<()>;
    fn toggle_action_group(&mut self, group: u32) -> Result<()>;
    fn activate_next_stage(self) -> Result<Self>;

    fn engage_autopilot(&mut self, frame: AttitudeFrame) -> Result<()>;
    fn disengage_autopilot(&mut self) -> Result<()>;
    /// Block until the autopilot reports the attitude reached.
    fn wait_for_attitude(&mut self) -> Result<()>;
    fn set_target_roll(&mut self, roll: f64) -> Result<()>;
    fn set_pitch_and_heading(&mut self, pitch: f64, heading: f64) -> Result<()>;

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeId>;
    fn remove_maneuver_node(&mut self, node: NodeId) -> Result<()>;
}
