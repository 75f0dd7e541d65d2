//! Per-blob simulation state.
//!
//! State is kept as parallel arrays, one entry per blob, laid out the way
//! the renderer consumes them:
//!
//! | Array | Components |
//! |-------|------------|
//! | `pos_rad` | x, y, radius |
//! | `color` | hue, saturation, value |
//! | `params` | corners, rotation, plumpness, warp |
//!
//! The remaining arrays (`velocity`, `hue_velocity`, `shape_velocity`)
//! never leave the simulation.

use glam::{Vec2, Vec3, Vec4};
use rand::Rng;

use crate::sampler::Sampler;

/// Angular rates driving the shape oscillator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapeVelocity {
    pub rotation: f32,
    pub warp: f32,
    pub plumpness: f32,
}

/// The full blob population.
///
/// The number of blobs is fixed at construction; no method adds or
/// removes entries.
#[derive(Clone, Debug)]
pub struct ParticleState {
    pub(crate) pos_rad: Vec<Vec3>,
    pub(crate) color: Vec<Vec3>,
    pub(crate) params: Vec<Vec4>,
    pub(crate) velocity: Vec<Vec2>,
    pub(crate) hue_velocity: Vec<f32>,
    pub(crate) shape_velocity: Vec<ShapeVelocity>,
}

/// Everything about one blob, used to build a population by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Blob {
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    /// Hue, saturation, value.
    pub color: Vec3,
    pub hue_velocity: f32,
    pub corners: f32,
    pub shape_velocity: ShapeVelocity,
}

impl ParticleState {
    /// Sample `count` blobs for a viewport of the given aspect ratio.
    ///
    /// Blobs start at rest; shape phases are filled in by the first tick.
    pub fn spawn<R: Rng + ?Sized>(
        count: u32,
        sampler: &Sampler,
        rng: &mut R,
        aspect_ratio: f32,
    ) -> Self {
        let blobs = (0..count).map(|_| {
            let position = sampler.position(rng, aspect_ratio);
            let radius = sampler.radius(rng);
            let color = sampler.color(rng);
            let corners = sampler.corner_count(rng);
            let hue_velocity = sampler.hue_velocity(rng);
            let shape_velocity = sampler.shape_velocity(rng);
            Blob {
                position,
                radius,
                velocity: Vec2::ZERO,
                color,
                hue_velocity,
                corners,
                shape_velocity,
            }
        });
        Self::from_blobs(blobs)
    }

    /// Build a population from explicit blobs.
    pub fn from_blobs(blobs: impl IntoIterator<Item = Blob>) -> Self {
        let blobs = blobs.into_iter();
        let (lower, _) = blobs.size_hint();
        let mut state = Self {
            pos_rad: Vec::with_capacity(lower),
            color: Vec::with_capacity(lower),
            params: Vec::with_capacity(lower),
            velocity: Vec::with_capacity(lower),
            hue_velocity: Vec::with_capacity(lower),
            shape_velocity: Vec::with_capacity(lower),
        };
        for b in blobs {
            state.pos_rad.push(b.position.extend(b.radius));
            state.color.push(b.color);
            state.params.push(Vec4::new(b.corners, 0.0, 1.0, 0.0));
            state.velocity.push(b.velocity);
            state.hue_velocity.push(b.hue_velocity);
            state.shape_velocity.push(b.shape_velocity);
        }
        state
    }

    /// Number of blobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pos_rad.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos_rad.is_empty()
    }

    pub fn pos_rad(&self) -> &[Vec3] {
        &self.pos_rad
    }

    pub fn color(&self) -> &[Vec3] {
        &self.color
    }

    pub fn params(&self) -> &[Vec4] {
        &self.params
    }

    pub fn velocity(&self) -> &[Vec2] {
        &self.velocity
    }

    pub fn hue_velocity(&self) -> &[f32] {
        &self.hue_velocity
    }

    pub fn shape_velocity(&self) -> &[ShapeVelocity] {
        &self.shape_velocity
    }

    /// Position of blob `i`.
    pub fn position(&self, i: usize) -> Vec2 {
        self.pos_rad[i].truncate()
    }

    /// Radius of blob `i`.
    pub fn radius(&self, i: usize) -> f32 {
        self.pos_rad[i].z
    }
}
