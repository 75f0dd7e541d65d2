//! Position and velocity integration.
//!
//! Both friction policies share the same second-order update:
//!
//! ```text
//! position += velocity * dt + 0.5 * acceleration * dt²
//! velocity += acceleration * dt   (scaled under inertia clamping)
//! ```
//!
//! Position is advanced with the velocity from before the step.

use glam::Vec2;

use crate::config::FrictionPolicy;

/// Advances one blob at a time under a [`FrictionPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    policy: FrictionPolicy,
}

impl Integrator {
    pub fn new(policy: FrictionPolicy) -> Self {
        Self { policy }
    }

    /// Acceleration for the current velocity.
    ///
    /// `friction` is the runtime friction coefficient; only the cubic drag
    /// policy reads it.
    pub fn acceleration(&self, force: Vec2, velocity: Vec2, friction: f32) -> Vec2 {
        match self.policy {
            FrictionPolicy::CubicDrag => force - velocity * velocity.length_squared() * friction,
            FrictionPolicy::InertiaClamp { .. } => force,
        }
    }

    /// Velocity after adding `accel * dt`.
    ///
    /// Under inertia clamping the increment is scaled by
    /// `min(1, target² / speed²)` (1 at rest). Once a blob is at or above
    /// the target speed a step may turn it but not speed it up, so only
    /// the step that crosses the target can overshoot it.
    pub fn next_velocity(&self, velocity: Vec2, accel: Vec2, dt: f32) -> Vec2 {
        match self.policy {
            FrictionPolicy::CubicDrag => velocity + accel * dt,
            FrictionPolicy::InertiaClamp { target_max_speed } => {
                let target_sq = target_max_speed * target_max_speed;
                let speed_sq = velocity.length_squared();
                if speed_sq == 0.0 {
                    return velocity + accel * dt;
                }
                let scale = (target_sq / speed_sq).min(1.0);
                let next = velocity + accel * dt * scale;
                if speed_sq >= target_sq {
                    next.clamp_length_max(speed_sq.sqrt())
                } else {
                    next
                }
            }
        }
    }

    /// Advance `position` and `velocity` by `dt` under `force`.
    pub fn step(&self, position: &mut Vec2, velocity: &mut Vec2, force: Vec2, friction: f32, dt: f32) {
        let accel = self.acceleration(force, *velocity, friction);
        *position += *velocity * dt + 0.5 * accel * dt * dt;
        *velocity = self.next_velocity(*velocity, accel, dt);
    }
}
