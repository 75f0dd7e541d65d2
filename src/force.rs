//! Boundary-biased random forces.
//!
//! Each step a blob is pushed by a uniform random force plus a bias
//! that keeps it inside the viewport. The bias on an axis is the
//! difference of the distances to the two edges, squared with its sign
//! kept:
//!
//! ```text
//! bias  = (hi - pos) - (pos - lo)
//! bias' = bias * |bias| * strictness
//! force = uniform(-strength, strength) + bias' * bias_strength
//! ```
//!
//! Near the center the bias is small next to the random term, so blobs
//! wander freely; towards an edge it grows quadratically and wins.

use glam::Vec2;
use rand::distributions::Uniform;
use rand::Rng;

use crate::config::BlobConfig;

/// Force generator for a `[0, aspect] x [0, 1]` viewport.
#[derive(Clone, Debug)]
pub struct ForceField {
    random: Uniform<f32>,
    strictness: f32,
    bias_strength: f32,
}

impl ForceField {
    /// Create a field with explicit magnitudes.
    ///
    /// `force_strength` must be positive.
    pub fn new(force_strength: f32, bias_strength: f32, strictness: f32) -> Self {
        Self {
            random: Uniform::new_inclusive(-force_strength, force_strength),
            strictness,
            bias_strength,
        }
    }

    pub fn from_config(config: &BlobConfig) -> Self {
        Self::new(
            config.force_strength,
            config.bias_strength(),
            config.boundary_strictness,
        )
    }

    /// Signed, squared boundary bias `bias'` on both axes, before
    /// `bias_strength` is applied.
    pub fn boundary_bias(&self, pos: Vec2, aspect_ratio: f32) -> Vec2 {
        let axis = |p: f32, lo: f32, hi: f32| {
            let near = p - lo;
            let far = hi - p;
            let bias = far - near;
            bias * bias.abs() * self.strictness
        };
        Vec2::new(axis(pos.x, 0.0, aspect_ratio), axis(pos.y, 0.0, 1.0))
    }

    /// Random plus bias force for a blob at `pos`.
    pub fn force<R: Rng + ?Sized>(&self, pos: Vec2, aspect_ratio: f32, rng: &mut R) -> Vec2 {
        let random = Vec2::new(rng.sample(self.random), rng.sample(self.random));
        random + self.boundary_bias(pos, aspect_ratio) * self.bias_strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn field() -> ForceField {
        ForceField::from_config(&BlobConfig::default())
    }

    #[test]
    fn test_center_has_no_bias() {
        let aspect = 16.0 / 9.0;
        let bias = field().boundary_bias(Vec2::new(aspect * 0.5, 0.5), aspect);
        assert!(bias.x.abs() < 1e-5);
        assert!(bias.y.abs() < 1e-5);
    }

    #[test]
    fn test_high_edge_pushes_back() {
        let bias = field().boundary_bias(Vec2::new(1.95, 0.98), 2.0);
        assert!(bias.x < 0.0);
        assert!(bias.y < 0.0);
    }

    #[test]
    fn test_low_edge_pushes_forward() {
        let bias = field().boundary_bias(Vec2::new(0.02, 0.01), 1.0);
        assert!(bias.x > 0.0);
        assert!(bias.y > 0.0);
    }

    #[test]
    fn test_bias_grows_quadratically() {
        let f = field();
        let near = f.boundary_bias(Vec2::new(0.6, 0.5), 1.0).x;
        let far = f.boundary_bias(Vec2::new(0.7, 0.5), 1.0).x;
        // bias = 1 - 2x: -0.2 then -0.4, squared ratio 4
        assert!((far / near - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_bias_keeps_sign_outside_viewport() {
        let bias = field().boundary_bias(Vec2::new(1.3, -0.2), 1.0);
        assert!(bias.x < 0.0);
        assert!(bias.y > 0.0);
    }

    #[test]
    fn test_random_force_bounded_at_center() {
        let f = field();
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..1000 {
            let force = f.force(Vec2::new(0.5, 0.5), 1.0, &mut rng);
            assert!(force.x.abs() <= 0.3 + 1e-6);
            assert!(force.y.abs() <= 0.3 + 1e-6);
        }
    }

    #[test]
    fn test_bias_dominates_near_edge() {
        let f = field();
        let mut rng = SmallRng::seed_from_u64(10);
        // bias = -1.9, bias' = -3.61 * 64, times 0.0015 is about -0.35
        for _ in 0..1000 {
            let force = f.force(Vec2::new(1.95, 0.5), 2.0, &mut rng);
            assert!(force.x < 0.0);
        }
    }
}
