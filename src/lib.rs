//! Ascent tooling for a kRPC-controlled launcher: a scripted autopilot, a
//! telemetry recorder, and two Euler ascent models compared against the
//! recorded flight.

pub mod physics;
pub mod vehicle;
pub mod gnc;
pub mod sim;
pub mod link;
pub mod autopilot;
pub mod recorder;
pub mod io;
pub mod plot;
pub mod report;
