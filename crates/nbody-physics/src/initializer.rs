//! Deterministic disc initialization
//!
//! One heavy body sits at the origin; every other body is placed on a circular
//! orbit around it with the speed that balances gravity at its radius.

use crate::bodies::BodySoa;
use crate::constants::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Speed of a circular orbit of radius `r` around mass `center_mass` (G = 1)
pub fn orbital_speed(center_mass: f32, r: f32) -> f32 {
    (G * center_mass / r).sqrt()
}

/// Seed `store` with the disc configuration.
///
/// Body 0 is the center. Orbiters get a uniform angle in [0, 2π), a uniform
/// radius in [50, min(w, h) / 2 - 20) and a uniform mass in [0.5, 10).
/// If the domain is too small for that radius band, orbiters sit at the
/// innermost radius. The sequence is seeded with [`SEED`], so repeated calls
/// produce identical stores.
pub fn seed(store: &mut BodySoa, domain_width: f32, domain_height: f32, center_mass: f32) {
    if store.is_empty() {
        return;
    }

    let mut rng = StdRng::seed_from_u64(SEED);
    let max_radius = domain_width.min(domain_height) / 2.0 - ORBIT_EDGE_MARGIN;

    store.x[0] = 0.0;
    store.y[0] = 0.0;
    store.vx[0] = 0.0;
    store.vy[0] = 0.0;
    store.ax[0] = 0.0;
    store.ay[0] = 0.0;
    store.m[0] = center_mass;

    for i in 1..store.len() {
        let angle = rng.random_range(0.0..TAU);
        let radius = if max_radius > MIN_ORBIT_RADIUS {
            rng.random_range(MIN_ORBIT_RADIUS..max_radius)
        } else {
            MIN_ORBIT_RADIUS
        };
        let mass = rng.random_range(ORBITER_MIN_MASS..ORBITER_MAX_MASS);

        let (sin, cos) = angle.sin_cos();
        let speed = orbital_speed(center_mass, radius);

        store.x[i] = radius * cos;
        store.y[i] = radius * sin;
        store.vx[i] = -speed * sin;
        store.vy[i] = speed * cos;
        store.ax[i] = 0.0;
        store.ay[i] = 0.0;
        store.m[i] = mass;
    }

    log::info!(
        "✓ Seeded {} bodies (center mass {}, orbit band {}..{})",
        store.len(),
        center_mass,
        MIN_ORBIT_RADIUS,
        max_radius.max(MIN_ORBIT_RADIUS)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> BodySoa {
        let mut store = BodySoa::new(n);
        seed(&mut store, DOMAIN_WIDTH, DOMAIN_HEIGHT, CENTER_MASS);
        store
    }

    #[test]
    fn seeding_is_bit_for_bit_reproducible() {
        let a = seeded(256);
        let b = seeded(256);

        let bits = |s: &BodySoa| -> Vec<u32> {
            [&s.x, &s.y, &s.vx, &s.vy, &s.ax, &s.ay, &s.m]
                .into_iter()
                .flatten()
                .map(|v| v.to_bits())
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn center_body_is_heavy_and_at_rest() {
        let store = seeded(10);
        assert_eq!(store.position(0), glam::Vec2::ZERO);
        assert_eq!(store.velocity(0), glam::Vec2::ZERO);
        assert_eq!(store.m[0], CENTER_MASS);
    }

    #[test]
    fn orbiters_fall_in_their_ranges() {
        let store = seeded(500);
        let max_radius = DOMAIN_WIDTH.min(DOMAIN_HEIGHT) / 2.0 - ORBIT_EDGE_MARGIN;

        for i in 1..store.len() {
            let r = store.position(i).length();
            assert!(r >= MIN_ORBIT_RADIUS - 1e-3 && r <= max_radius + 1e-3, "r = {r}");
            assert!((ORBITER_MIN_MASS..ORBITER_MAX_MASS).contains(&store.m[i]));
            assert_eq!((store.ax[i], store.ay[i]), (0.0, 0.0));
        }
    }

    #[test]
    fn orbiters_move_tangentially_at_circular_speed() {
        let store = seeded(100);
        for i in 1..store.len() {
            let p = store.position(i);
            let v = store.velocity(i);
            let expected = orbital_speed(CENTER_MASS, p.length());

            assert!(p.normalize().dot(v.normalize()).abs() < 1e-3);
            assert!((v.length() - expected).abs() / expected < 1e-3);
            // counter-clockwise
            assert!(p.perp_dot(v) > 0.0);
        }
    }

    #[test]
    fn tiny_domain_pins_orbits_to_inner_radius() {
        let mut store = BodySoa::new(5);
        seed(&mut store, 100.0, 100.0, CENTER_MASS);
        for i in 1..store.len() {
            assert!((store.position(i).length() - MIN_ORBIT_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn empty_store_is_left_alone() {
        let mut store = BodySoa::new(0);
        seed(&mut store, DOMAIN_WIDTH, DOMAIN_HEIGHT, CENTER_MASS);
        assert!(store.is_empty());
    }
}
