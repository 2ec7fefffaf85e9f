//! Default constants for the gravity simulation
//!
//! Units are simulation units: lengths are in pixels of the default surface,
//! masses and time are dimensionless.

/// Gravitational constant
pub const G: f32 = 1.0;

/// Fixed integration time step
pub const DT: f32 = 0.1;

/// Softening length, prevents singularities as r -> 0
pub const SOFTENING: f32 = 0.1;

/// Default number of bodies (including the central mass)
pub const BODY_COUNT: usize = 1000;

/// Mass of body 0, the center of the disc
pub const CENTER_MASS: f32 = 1000.0;

/// Domain width; bodies wrap at ±DOMAIN_WIDTH / 2
pub const DOMAIN_WIDTH: f32 = 2560.0;

/// Domain height; bodies wrap at ±DOMAIN_HEIGHT / 2
pub const DOMAIN_HEIGHT: f32 = 1440.0;

/// Seed for the initial configuration
pub const SEED: u64 = 42;

/// Innermost orbit radius for seeded bodies
pub const MIN_ORBIT_RADIUS: f32 = 50.0;

/// Gap kept between the outermost orbit and the domain edge
pub const ORBIT_EDGE_MARGIN: f32 = 20.0;

/// Mass range for seeded orbiters
pub const ORBITER_MIN_MASS: f32 = 0.5;
pub const ORBITER_MAX_MASS: f32 = 10.0;
