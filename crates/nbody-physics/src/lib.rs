//! # N-Body Physics
//!
//! Host-side core of the gravity simulation: structure-of-arrays body storage,
//! direct O(N²) force summation, semi-implicit Euler integration on a toroidal
//! domain, and the deterministic disc initializer.

pub mod bodies;
pub mod constants;
pub mod diagnostics;
pub mod forces;
pub mod initializer;
pub mod integrator;

pub use bodies::*;
pub use constants::*;
pub use forces::*;
pub use initializer::*;
pub use integrator::*;
