//! Errors from device setup and GPU steps

use std::path::PathBuf;
use thiserror::Error;

pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no compatible GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to read kernel source {}: {source}", path.display())]
    KernelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel program failed to build:\n{log}")]
    KernelBuild { log: String },

    #[error("{buffer} needs {size} bytes but the device allows at most {limit}")]
    BufferTooLarge {
        buffer: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("failed to allocate {buffer} ({size} bytes): {reason}")]
    Allocation {
        buffer: &'static str,
        size: u64,
        reason: String,
    },

    #[error("body store holds {store} bodies but the device mirrors were built for {device}")]
    BodyCountMismatch { store: usize, device: u32 },

    #[error("waiting for the GPU failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("reading results back from the GPU failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("GPU readback was dropped before it completed")]
    ReadbackAbandoned,
}
