//! Simulation parameters and their GPU uniform mirror

use bytemuck::{Pod, Zeroable};
use nbody_physics::constants;

/// Parameters fixed for the lifetime of a run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub gravity: f32,
    pub softening: f32,
    pub dt: f32,
    pub domain_width: f32,
    pub domain_height: f32,
    /// Only used when seeding
    pub center_mass: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: constants::G,
            softening: constants::SOFTENING,
            dt: constants::DT,
            domain_width: constants::DOMAIN_WIDTH,
            domain_height: constants::DOMAIN_HEIGHT,
            center_mass: constants::CENTER_MASS,
        }
    }
}

/// Uniform block bound at binding 7 of both kernels (matches WGSL `SimParams`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuParams {
    pub body_count: u32,
    pub gravity: f32,
    pub softening: f32,
    pub dt: f32,
    pub domain_width: f32,
    pub domain_height: f32,
    // Pad to 32 bytes
    pub _padding: [f32; 2],
}

impl GpuParams {
    pub fn new(params: &SimParams, body_count: u32) -> Self {
        Self {
            body_count,
            gravity: params.gravity,
            softening: params.softening,
            dt: params.dt,
            domain_width: params.domain_width,
            domain_height: params.domain_height,
            _padding: [0.0; 2],
        }
    }
}
