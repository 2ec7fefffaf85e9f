//! Simulation engine with a per-run execution strategy

use crate::error::{SimulationError, SimulationResult};
use crate::gpu::GpuNBody;
use crate::kernel::KernelSource;
use crate::params::SimParams;
use nbody_physics::{compute_forces, integrate, seed, BodySoa};
use std::fmt;

/// How forces and integration are executed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Single host control flow
    Sequential,
    /// One GPU lane per body
    #[default]
    Parallel,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "CPU"),
            Self::Parallel => write!(f, "GPU"),
        }
    }
}

enum Backend {
    Sequential,
    Gpu(Box<GpuNBody>),
}

/// One independent simulation: body store, parameters and execution backend.
///
/// The backend is chosen once at construction. A parallel request whose device
/// setup fails runs sequentially for the rest of the run.
pub struct Simulation {
    store: BodySoa,
    params: SimParams,
    backend: Backend,
    frame: u64,
}

impl Simulation {
    /// Seed a disc of `body_count` bodies and pick a backend
    pub fn new(
        params: SimParams,
        body_count: usize,
        mode: ExecutionMode,
        kernel: &KernelSource,
    ) -> Self {
        let mut store = BodySoa::new(body_count);
        seed(
            &mut store,
            params.domain_width,
            params.domain_height,
            params.center_mass,
        );
        Self::from_store(store, params, mode, kernel)
    }

    /// Run a prepared store
    pub fn from_store(
        store: BodySoa,
        params: SimParams,
        mode: ExecutionMode,
        kernel: &KernelSource,
    ) -> Self {
        let backend = match mode {
            ExecutionMode::Sequential => Backend::Sequential,
            ExecutionMode::Parallel => match GpuNBody::setup_blocking(store.len(), kernel) {
                Ok(gpu) => Backend::Gpu(Box::new(gpu)),
                Err(err) => {
                    log::warn!("GPU setup failed: {err}");
                    log::warn!("Falling back to CPU simulation");
                    Backend::Sequential
                }
            },
        };

        let sim = Self {
            store,
            params,
            backend,
            frame: 0,
        };
        log::info!(
            "Using {} simulation with {} bodies",
            sim.mode(),
            sim.store.len()
        );
        sim
    }

    /// Use an orchestrator built elsewhere (e.g. on a shared device).
    ///
    /// `gpu` must have been built for exactly `store.len()` bodies.
    pub fn with_gpu(store: BodySoa, params: SimParams, gpu: GpuNBody) -> SimulationResult<Self> {
        if store.len() != gpu.body_count() as usize {
            return Err(SimulationError::BodyCountMismatch {
                store: store.len(),
                device: gpu.body_count(),
            });
        }

        Ok(Self {
            store,
            params,
            backend: Backend::Gpu(Box::new(gpu)),
            frame: 0,
        })
    }

    /// Advance every body by one time step
    pub fn step(&mut self) -> SimulationResult<()> {
        let params = &self.params;
        match &mut self.backend {
            Backend::Sequential => {
                compute_forces(&mut self.store, params.gravity, params.softening);
                integrate(
                    &mut self.store,
                    params.dt,
                    params.domain_width,
                    params.domain_height,
                );
            }
            Backend::Gpu(gpu) => gpu.step(&mut self.store, params)?,
        }

        self.frame += 1;
        Ok(())
    }

    /// The mode actually in use, after any fallback
    pub fn mode(&self) -> ExecutionMode {
        match self.backend {
            Backend::Sequential => ExecutionMode::Sequential,
            Backend::Gpu(_) => ExecutionMode::Parallel,
        }
    }

    pub fn bodies(&self) -> &BodySoa {
        &self.store
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Number of completed steps
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
