pub mod api;
pub mod catalog;
pub mod core;
pub mod input;
pub mod nav;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::sim::{SimConfig, SimContext, Simulation};
pub use api::types::{BodyId, CommandOutcome, HostEvent};
pub use catalog::manifest::{BodyManifest, BodyParams, CatalogError};
pub use catalog::solar::solar_system;
pub use core::arena::BodyArena;
pub use core::atmosphere::AtmosphereShell;
pub use core::body::{CelestialBody, ROOT_SIM_RADIUS};
pub use core::orbit::orbit_step;
pub use core::time::FixedTimestep;
pub use core::transform::Transform;
pub use input::queue::CommandQueue;
pub use nav::autopilot::Navigator;
pub use nav::pose::ReferencePose;
pub use systems::lighting::{Binding, CylImage, Terminator, CYL_COLS, CYL_ROWS};
pub use systems::present::{BodyFrame, FrameSnapshot};
pub use systems::probe::ProbeHit;
