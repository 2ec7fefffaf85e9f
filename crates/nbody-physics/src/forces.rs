//! Direct-summation gravity
//!
//! NOTE: The GPU path runs the same math in `compute_forces` (nbody.wgsl).
//! Any change to the softening here has to be mirrored there, otherwise the
//! two execution paths drift apart.

use crate::bodies::BodySoa;

/// Softened inverse cube distance, Plummer form: 1 / (r² + ε²)^(3/2)
#[inline]
pub fn softened_inv_cube(dx: f32, dy: f32, eps: f32) -> f32 {
    let d2 = dx * dx + dy * dy + eps * eps;
    1.0 / (d2 * d2.sqrt())
}

/// Compute the acceleration of every body from every other body.
///
/// Resets `ax`/`ay`, then for each ordered pair (i, j), i != j, accumulates
/// `G * m[j] * (p[j] - p[i]) / (r² + ε²)^(3/2)` into body i. O(N²).
pub fn compute_forces(store: &mut BodySoa, g: f32, eps: f32) {
    let BodySoa {
        x, y, ax, ay, m, ..
    } = store;

    ax.fill(0.0);
    ay.fill(0.0);

    let n = m.len();
    for i in 0..n {
        let (xi, yi) = (x[i], y[i]);
        let mut acc_x = 0.0;
        let mut acc_y = 0.0;

        for j in 0..n {
            if i == j {
                continue;
            }

            let dx = x[j] - xi;
            let dy = y[j] - yi;
            let f = g * m[j] * softened_inv_cube(dx, dy, eps);

            acc_x += dx * f;
            acc_y += dy * f;
        }

        ax[i] = acc_x;
        ay[i] = acc_y;
    }
}
