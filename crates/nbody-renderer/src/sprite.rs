//! Mass-to-appearance mapping and per-frame sprite batches

use glam::Vec2;
use nbody_physics::BodySoa;

/// Bodies heavier than this are drawn large
pub const LARGE_MASS_THRESHOLD: f32 = 50.0;
/// Mass at which the color gradient saturates
pub const COLOR_SATURATION_MASS: f32 = 10.0;

pub const LARGE_RADIUS: f32 = 6.0;
pub const SMALL_RADIUS: f32 = 2.0;

pub fn sprite_radius(mass: f32) -> f32 {
    if mass > LARGE_MASS_THRESHOLD {
        LARGE_RADIUS
    } else {
        SMALL_RADIUS
    }
}

/// Blue for light bodies, shading to red at [`COLOR_SATURATION_MASS`] and above
pub fn sprite_color(mass: f32) -> [u8; 3] {
    let norm = (mass / COLOR_SATURATION_MASS).clamp(0.0, 1.0);
    [(255.0 * norm) as u8, 50, (255.0 * (1.0 - norm)) as u8]
}

/// One filled circle, in screen space (origin top-left)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub center: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
}

/// Everything a frame sink needs to draw one frame
#[derive(Clone, Debug, Default)]
pub struct SpriteBatch {
    pub sprites: Vec<Sprite>,
}

impl SpriteBatch {
    /// Map every body to a sprite. Simulation space is centered on the surface.
    pub fn from_bodies(store: &BodySoa, surface_width: f32, surface_height: f32) -> Self {
        let origin = Vec2::new(surface_width / 2.0, surface_height / 2.0);
        let sprites = store
            .render_view()
            .map(|(x, y, m)| Sprite {
                center: origin + Vec2::new(x, y),
                radius: sprite_radius(m),
                color: sprite_color(m),
            })
            .collect();
        Self { sprites }
    }

    /// Refill in place, reusing the allocation
    pub fn update(&mut self, store: &BodySoa, surface_width: f32, surface_height: f32) {
        let origin = Vec2::new(surface_width / 2.0, surface_height / 2.0);
        self.sprites.clear();
        self.sprites.extend(store.render_view().map(|(x, y, m)| Sprite {
            center: origin + Vec2::new(x, y),
            radius: sprite_radius(m),
            color: sprite_color(m),
        }));
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
