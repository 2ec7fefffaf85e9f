//! Fixed-step semi-implicit Euler integration on a toroidal domain
//!
//! Mirrors `integrate_bodies` in nbody.wgsl.

use crate::bodies::BodySoa;

/// Wrap a coordinate into `[-extent / 2, extent / 2]`.
///
/// Single hard wrap: a body that overshoots by more than one extent in one
/// step is not folded back further.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    let half = extent * 0.5;
    let mut v = value;
    if v > half {
        v -= extent;
    }
    if v < -half {
        v += extent;
    }
    v
}

/// Advance every body by one step of `dt`.
///
/// Velocity is kicked with the current acceleration first, then the position
/// drifts with the new velocity. Positions wrap around the domain edges with
/// velocity unchanged.
pub fn integrate(store: &mut BodySoa, dt: f32, domain_width: f32, domain_height: f32) {
    let BodySoa {
        x,
        y,
        vx,
        vy,
        ax,
        ay,
        ..
    } = store;

    for i in 0..x.len() {
        vx[i] += ax[i] * dt;
        vy[i] += ay[i] * dt;

        x[i] = wrap(x[i] + vx[i] * dt, domain_width);
        y[i] = wrap(y[i] + vy[i] * dt, domain_height);
    }
}
