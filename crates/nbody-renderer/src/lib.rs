//! # N-Body Presentation
//!
//! Backend-agnostic side of drawing the simulation: sprite mapping, the frame
//! sink interface and frame pacing. Actual windowing and rasterization live
//! behind [`FrameSink`].

pub mod frame;
pub mod pacing;
pub mod sprite;

pub use frame::*;
pub use pacing::*;
pub use sprite::*;
