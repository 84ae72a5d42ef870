pub mod atmosphere;
pub mod gravity;
pub mod aerodynamics;

pub use atmosphere::ExponentialAtmosphere;
pub use gravity::Body;
pub use aerodynamics::Aero;
