//! Hue and shape oscillators.
//!
//! Hue is integrated step by step and wrapped; shape parameters are
//! recomputed from absolute virtual time each tick, so they stay periodic
//! and bounded no matter how irregular the steps are.

use glam::Vec4;

use crate::config::{BlobConfig, Span};
use crate::particle::ShapeVelocity;

/// Wrap a hue into `[0, 1)`.
///
/// Handles any number of wraps. The result is never exactly `1.0`, even
/// when a tiny negative hue rounds up.
pub fn wrap_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue - hue.floor();
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Advance a hue by `hue_velocity * dt` and wrap it.
#[inline]
pub fn advance_hue(hue: f32, hue_velocity: f32, dt: f32) -> f32 {
    wrap_hue(hue + hue_velocity * dt)
}

/// `cos(x)` mapped from `[-1, 1]` onto `[lo, hi]`.
#[inline]
pub fn cos_half_range(x: f32, lo: f32, hi: f32) -> f32 {
    0.5 * (x.cos() + 1.0) * (hi - lo) + lo
}

/// Computes rotation, plumpness and warp from virtual time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeOscillator {
    pub plumpness: Span,
    pub warp: Span,
}

impl Default for ShapeOscillator {
    fn default() -> Self {
        Self {
            plumpness: Span::new(0.7, 1.0),
            warp: Span::new(-0.2, 0.2),
        }
    }
}

impl ShapeOscillator {
    pub fn from_config(config: &BlobConfig) -> Self {
        Self {
            plumpness: config.plumpness_range,
            warp: config.warp_range,
        }
    }

    /// Fill the rotation, plumpness and warp slots of `params` for time `t`.
    ///
    /// The corner count in `params.x` is left alone.
    pub fn apply(&self, params: &mut Vec4, velocity: &ShapeVelocity, t: f32) {
        params.y = velocity.rotation * t;
        params.z = cos_half_range(velocity.plumpness * t, self.plumpness.lo, self.plumpness.hi);
        params.w = cos_half_range(velocity.warp * t, self.warp.lo, self.warp.hi);
    }
}
