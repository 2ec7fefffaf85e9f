//! Conservation diagnostics
//!
//! Accumulated in f64 so drift measurements are not dominated by summation
//! error over thousands of bodies.

use crate::bodies::BodySoa;
use glam::Vec2;

/// Total linear momentum, Σ m·v
pub fn total_momentum(store: &BodySoa) -> Vec2 {
    let (px, py) = (0..store.len()).fold((0.0f64, 0.0f64), |(px, py), i| {
        let m = store.m[i] as f64;
        (px + m * store.vx[i] as f64, py + m * store.vy[i] as f64)
    });
    Vec2::new(px as f32, py as f32)
}

/// Net force, Σ m·a. Zero (up to rounding) after a force pass.
pub fn net_force(store: &BodySoa) -> Vec2 {
    let (fx, fy) = (0..store.len()).fold((0.0f64, 0.0f64), |(fx, fy), i| {
        let m = store.m[i] as f64;
        (fx + m * store.ax[i] as f64, fy + m * store.ay[i] as f64)
    });
    Vec2::new(fx as f32, fy as f32)
}

pub fn kinetic_energy(store: &BodySoa) -> f64 {
    (0..store.len())
        .map(|i| {
            let v2 = (store.vx[i] as f64).powi(2) + (store.vy[i] as f64).powi(2);
            0.5 * store.m[i] as f64 * v2
        })
        .sum()
}

/// Softened potential energy, -Σ_{i<j} G·mi·mj / sqrt(r² + ε²)
pub fn potential_energy(store: &BodySoa, g: f32, eps: f32) -> f64 {
    let n = store.len();
    let eps2 = (eps as f64).powi(2);
    let mut total = 0.0;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = (store.x[j] - store.x[i]) as f64;
            let dy = (store.y[j] - store.y[i]) as f64;
            total -= g as f64 * store.m[i] as f64 * store.m[j] as f64
                / (dx * dx + dy * dy + eps2).sqrt();
        }
    }

    total
}

pub fn total_energy(store: &BodySoa, g: f32, eps: f32) -> f64 {
    kinetic_energy(store) + potential_energy(store, g, eps)
}
