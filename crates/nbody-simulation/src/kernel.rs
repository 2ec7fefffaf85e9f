//! Kernel program source

use crate::error::{SimulationError, SimulationResult};
use std::borrow::Cow;
use std::path::PathBuf;

/// Entry point of the force kernel
pub const FORCE_ENTRY_POINT: &str = "compute_forces";
/// Entry point of the integration kernel
pub const INTEGRATE_ENTRY_POINT: &str = "integrate_bodies";

const EMBEDDED_SOURCE: &str = include_str!("shaders/nbody.wgsl");

/// Where the WGSL program comes from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KernelSource {
    /// The copy of `shaders/nbody.wgsl` compiled into the crate
    #[default]
    Embedded,
    /// A WGSL file read at setup time
    File(PathBuf),
    /// Inline program text
    Inline(String),
}

impl KernelSource {
    pub fn load(&self) -> SimulationResult<Cow<'_, str>> {
        match self {
            Self::Embedded => Ok(Cow::Borrowed(EMBEDDED_SOURCE)),
            Self::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| SimulationError::KernelRead {
                    path: path.clone(),
                    source,
                }),
            Self::Inline(text) => Ok(Cow::Borrowed(text.as_str())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => "embedded nbody.wgsl".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "inline source".to_string(),
        }
    }
}
