pub mod state;
pub mod event;
pub mod vertical;
pub mod planar;

pub use state::{PlanarState, SimConfig, VerticalState};
pub use event::{EventKind, SimEvent};
pub use vertical::{simulate_vertical, VerticalRun};
pub use planar::{simulate_planar, PlanarRun};
