//! # N-Body Simulation Engine
//!
//! Runs the gravity simulation either on the host or as wgpu compute shaders,
//! one lane per body.

pub mod error;
pub mod gpu;
pub mod kernel;
pub mod params;
pub mod simulation;

pub use error::*;
pub use gpu::*;
pub use kernel::*;
pub use params::*;
pub use simulation::*;
