//! Structure-of-arrays body storage

use glam::Vec2;

/// A single body, used to build scenarios and inspect individual entries.
///
/// The store itself never holds these; see [`BodySoa`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
}

impl Body {
    /// Create a body with zero acceleration
    pub fn new(position: Vec2, velocity: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            mass,
        }
    }
}

/// Fixed-size body store laid out as one array per attribute.
///
/// All arrays have the same length and index `i` refers to the same body in
/// every array. The length is set at construction and never changes.
/// Accelerations are only meaningful after a force pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodySoa {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub ax: Vec<f32>,
    pub ay: Vec<f32>,
    pub m: Vec<f32>,
}

impl BodySoa {
    /// Allocate storage for `capacity` bodies, zero-filled
    pub fn new(capacity: usize) -> Self {
        Self {
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            vx: vec![0.0; capacity],
            vy: vec![0.0; capacity],
            ax: vec![0.0; capacity],
            ay: vec![0.0; capacity],
            m: vec![0.0; capacity],
        }
    }

    pub fn from_bodies(bodies: &[Body]) -> Self {
        let mut store = Self::new(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            store.set_body(i, *body);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    /// Read body `i` as a value. Panics if `i` is out of range.
    pub fn body(&self, i: usize) -> Body {
        Body {
            position: self.position(i),
            velocity: self.velocity(i),
            acceleration: Vec2::new(self.ax[i], self.ay[i]),
            mass: self.m[i],
        }
    }

    /// Overwrite every attribute of body `i`. Panics if `i` is out of range.
    pub fn set_body(&mut self, i: usize, body: Body) {
        self.x[i] = body.position.x;
        self.y[i] = body.position.y;
        self.vx[i] = body.velocity.x;
        self.vy[i] = body.velocity.y;
        self.ax[i] = body.acceleration.x;
        self.ay[i] = body.acceleration.y;
        self.m[i] = body.mass;
    }

    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.x[i], self.y[i])
    }

    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vx[i], self.vy[i])
    }

    /// Iterate over `(x, y, m)` triples, the view a renderer needs
    pub fn render_view(&self) -> impl Iterator<Item = (f32, f32, f32)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.m)
            .map(|((&x, &y), &m)| (x, y, m))
    }
}
