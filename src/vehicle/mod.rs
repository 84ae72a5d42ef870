pub mod stage;
pub mod launcher;

pub use stage::{Jettison, Propulsion};
pub use launcher::{presets, PlanarVehicle, PlanarVehicleBuilder, VerticalVehicle};
