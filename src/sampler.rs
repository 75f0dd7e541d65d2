//! Initial attribute sampling.
//!
//! A [`Sampler`] holds the distributions described by a [`BlobConfig`] and
//! draws every per-blob attribute from an injected RNG, so a fixed seed
//! reproduces the same population.
//!
//! Every draw is bounded: normals are clamped where a hard bound exists,
//! exponential and gamma draws are non-negative by construction.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, Normal};

use crate::config::{BlobConfig, Span};
use crate::error::ConfigError;
use crate::particle::ShapeVelocity;

/// Distributions for the initial blob population.
#[derive(Debug, Clone)]
pub struct Sampler {
    coords: Normal<f32>,
    radius: Normal<f32>,
    radius_bounds: Span,
    saturation: Exp<f32>,
    value: Exp<f32>,
    corners: Gamma<f32>,
    hue_speed: Gamma<f32>,
    shape_speed: Gamma<f32>,
    hue_velocity_factor: f32,
    rotation_speed_factor: f32,
    warp_speed_factor: f32,
    plumpness_speed_factor: f32,
}

fn invalid(what: &str, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(format!("{}: {}", what, e))
}

impl Sampler {
    /// Build the distributions, rejecting parameters they cannot represent.
    pub fn new(config: &BlobConfig) -> Result<Self, ConfigError> {
        let coords = Normal::new(0.5, config.position_deviation)
            .map_err(|e| invalid("position_deviation", e))?;
        let radius = Normal::new(config.avg_radius, config.radius_deviation)
            .map_err(|e| invalid("radius_deviation", e))?;
        let saturation =
            Exp::new(config.saturation_coeff).map_err(|e| invalid("saturation_coeff", e))?;
        let value = Exp::new(config.value_coeff).map_err(|e| invalid("value_coeff", e))?;

        let gamma = |what: &str, p: crate::config::GammaParams| {
            Gamma::new(p.shape, p.scale).map_err(|e| invalid(what, e))
        };

        Ok(Self {
            coords,
            radius,
            radius_bounds: Span::new(config.min_radius, config.max_radius),
            saturation,
            value,
            corners: gamma("corner_distribution", config.corner_distribution)?,
            hue_speed: gamma("hue_velocity_distribution", config.hue_velocity_distribution)?,
            shape_speed: gamma("shape_velocity_distribution", config.shape_velocity_distribution)?,
            hue_velocity_factor: config.hue_velocity_factor,
            rotation_speed_factor: config.rotation_speed_factor,
            warp_speed_factor: config.warp_speed_factor,
            plumpness_speed_factor: config.plumpness_speed_factor,
        })
    }

    /// Starting position around mid-viewport.
    ///
    /// Each axis is clamped to `[0, 1]` before x is stretched by the aspect
    /// ratio, so x always lands in `[0, aspect_ratio]`.
    pub fn position<R: Rng + ?Sized>(&self, rng: &mut R, aspect_ratio: f32) -> Vec2 {
        let x = self.coords.sample(rng).clamp(0.0, 1.0);
        let y = self.coords.sample(rng).clamp(0.0, 1.0);
        Vec2::new(x * aspect_ratio, y)
    }

    /// Radius within `[min_radius, max_radius]`.
    pub fn radius<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.radius
            .sample(rng)
            .clamp(self.radius_bounds.lo, self.radius_bounds.hi)
    }

    /// HSV color with uniform hue and saturation/value biased towards 1.
    pub fn color<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let hue = rng.gen::<f32>();
        let saturation = 1.0 - self.saturation.sample(rng).min(1.0);
        let value = 1.0 - self.value.sample(rng).min(1.0);
        Vec3::new(hue, saturation, value)
    }

    /// Corner count, at least four, skewed towards a few extra corners.
    pub fn corner_count<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        (4.0 + self.corners.sample(rng)).round()
    }

    /// Signed hue rate in hue turns per unit of virtual time.
    pub fn hue_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.hue_speed.sample(rng) * random_sign(rng) * self.hue_velocity_factor
    }

    /// Rotation, warp and plumpness rates, each with its own sign.
    pub fn shape_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeVelocity {
        let rotation = self.shape_speed.sample(rng) * random_sign(rng) * self.rotation_speed_factor;
        let warp = self.shape_speed.sample(rng) * random_sign(rng) * self.warp_speed_factor;
        let plumpness =
            self.shape_speed.sample(rng) * random_sign(rng) * self.plumpness_speed_factor;
        ShapeVelocity {
            rotation,
            warp,
            plumpness,
        }
    }
}

/// `-1.0` or `1.0` with equal probability.
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen::<bool>() {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sampler() -> Sampler {
        Sampler::new(&BlobConfig::default()).unwrap()
    }

    #[test]
    fn test_radius_within_bounds() {
        let mut config = BlobConfig::default();
        // Wide deviation so both clamps are exercised
        config.radius_deviation = 1.0;
        let sampler = Sampler::new(&config).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let r = sampler.radius(&mut rng);
            assert!(r >= config.min_radius && r <= config.max_radius, "radius {}", r);
        }
    }

    #[test]
    fn test_radius_three_sigma() {
        let sampler = sampler();
        let mut rng = SmallRng::seed_from_u64(2);
        let (lo, hi) = ((0.035f32 - 3.0 * 0.007).max(0.01), (0.035f32 + 3.0 * 0.007).min(0.5));
        let inside = (0..10_000)
            .map(|_| sampler.radius(&mut rng))
            .filter(|r| *r >= lo && *r <= hi)
            .count();
        assert!(inside >= 9_900, "only {} of 10000 within 3 sigma", inside);
    }

    #[test]
    fn test_position_clamped_before_aspect_scale() {
        let mut config = BlobConfig::default();
        config.position_deviation = 5.0;
        let sampler = Sampler::new(&config).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let aspect = 16.0 / 9.0;
        let mut hit_right_edge = false;
        for _ in 0..1000 {
            let p = sampler.position(&mut rng, aspect);
            assert!(p.x >= 0.0 && p.x <= aspect);
            assert!(p.y >= 0.0 && p.y <= 1.0);
            hit_right_edge |= p.x == aspect;
        }
        assert!(hit_right_edge, "clamped x should map onto the aspect edge");
    }

    #[test]
    fn test_color_ranges() {
        let sampler = sampler();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut sum_s = 0.0;
        for _ in 0..1000 {
            let c = sampler.color(&mut rng);
            assert!(c.x >= 0.0 && c.x < 1.0);
            assert!(c.y >= 0.0 && c.y <= 1.0);
            assert!(c.z >= 0.0 && c.z <= 1.0);
            sum_s += c.y;
        }
        // Mean of 1 - Exp(12) is about 0.92
        assert!(sum_s / 1000.0 > 0.85);
    }

    #[test]
    fn test_corner_count_is_integer_at_least_four() {
        let sampler = sampler();
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..1000 {
            let c = sampler.corner_count(&mut rng);
            assert!(c >= 4.0);
            assert_eq!(c, c.round());
        }
    }

    #[test]
    fn test_velocities_take_both_signs() {
        let sampler = sampler();
        let mut rng = SmallRng::seed_from_u64(6);
        let hues: Vec<f32> = (0..200).map(|_| sampler.hue_velocity(&mut rng)).collect();
        assert!(hues.iter().any(|v| *v > 0.0));
        assert!(hues.iter().any(|v| *v < 0.0));

        let shapes: Vec<ShapeVelocity> =
            (0..200).map(|_| sampler.shape_velocity(&mut rng)).collect();
        assert!(shapes.iter().any(|s| s.rotation > 0.0));
        assert!(shapes.iter().any(|s| s.rotation < 0.0));
        assert!(shapes.iter().all(|s| s.plumpness.is_finite() && s.warp.is_finite()));
    }

    #[test]
    fn test_same_seed_same_population() {
        let sampler = sampler();
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(sampler.color(&mut a), sampler.color(&mut b));
            assert_eq!(sampler.position(&mut a, 1.5), sampler.position(&mut b, 1.5));
        }
    }

    #[test]
    fn test_rejects_negative_deviation() {
        let mut config = BlobConfig::default();
        config.radius_deviation = -1.0;
        assert!(Sampler::new(&config).is_err());
    }
}
