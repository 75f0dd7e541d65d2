//! Startup configuration.
//!
//! Every tunable constant of the visualization lives in [`BlobConfig`].
//! Values are fixed once the simulation starts; the only runtime-mutable
//! knobs are the [`TunableParams`](crate::control::TunableParams) driven
//! by key presses, whose initial values come from here.
//!
//! Configs can be built in code:
//!
//! ```ignore
//! let config = BlobConfig::new()
//!     .with_particle_count(48)
//!     .with_friction_policy(FrictionPolicy::InertiaClamp { target_max_speed: 0.05 })
//!     .with_seed(7);
//! ```
//!
//! or loaded from JSON, where any missing field keeps its default:
//!
//! ```json
//! { "particle_count": 64, "friction_policy": { "kind": "cubic_drag" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// How velocity growth is held in check.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrictionPolicy {
    /// Drag opposing motion, proportional to the cube of speed and scaled
    /// by the runtime friction coefficient.
    CubicDrag,
    /// No drag term; the velocity increment is scaled down once speed
    /// passes `target_max_speed`.
    InertiaClamp { target_max_speed: f32 },
}

impl Default for FrictionPolicy {
    fn default() -> Self {
        FrictionPolicy::CubicDrag
    }
}

/// Shape and scale of a gamma distribution.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GammaParams {
    pub shape: f32,
    pub scale: f32,
}

impl GammaParams {
    pub const fn new(shape: f32, scale: f32) -> Self {
        Self { shape, scale }
    }
}

/// Closed interval `[lo, hi]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub lo: f32,
    pub hi: f32,
}

impl Span {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.lo && v <= self.hi
    }

    /// Both ends finite and `lo <= hi`.
    pub fn is_ordered(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo <= self.hi
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlobConfig {
    /// Number of blobs. Fixed for the lifetime of the process.
    pub particle_count: u32,
    /// RNG seed. `None` seeds from the wall clock.
    pub seed: Option<u64>,

    /// Standard deviation of the initial position around mid-viewport.
    pub position_deviation: f32,
    pub avg_radius: f32,
    pub radius_deviation: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Rate of the exponential that pulls saturation away from 1.
    pub saturation_coeff: f32,
    /// Rate of the exponential that pulls value away from 1.
    pub value_coeff: f32,
    /// Extra corners on top of the base four.
    pub corner_distribution: GammaParams,
    pub hue_velocity_distribution: GammaParams,
    /// Shared by rotation, warp and plumpness speeds.
    pub shape_velocity_distribution: GammaParams,
    pub hue_velocity_factor: f32,
    pub rotation_speed_factor: f32,
    pub warp_speed_factor: f32,
    pub plumpness_speed_factor: f32,

    /// Half-width of the uniform random force on each axis.
    /// Too small and blobs escape, too large and they oscillate.
    pub force_strength: f32,
    /// Boundary bias multiplier, relative to `force_strength`.
    pub bias_scale: f32,
    /// Larger values push blobs back towards center from farther away.
    pub boundary_strictness: f32,
    pub friction_policy: FrictionPolicy,
    pub initial_friction: f32,
    /// Geometric factor applied per friction key press.
    pub friction_step: f32,

    pub plumpness_range: Span,
    pub warp_range: Span,

    /// Field level below which a pixel is drawn black.
    pub initial_tail_critical_value: f32,
    pub sharpness_step: f32,
    /// Bound on key presses buffered between two ticks.
    pub command_queue_capacity: usize,

    /// Refresh rate used when the monitor does not report one.
    pub refresh_rate: f32,
    /// Virtual time starts at a random point in this range so blobs are
    /// not visibly in phase at startup.
    pub start_time: Span,

    pub fullscreen: bool,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            particle_count: 32,
            seed: None,

            position_deviation: 0.22,
            avg_radius: 0.035,
            radius_deviation: 0.007,
            min_radius: 0.01,
            max_radius: 0.5,
            saturation_coeff: 12.0,
            value_coeff: 14.0,
            corner_distribution: GammaParams::new(5.0, 0.28),
            hue_velocity_distribution: GammaParams::new(7.0, 2.0),
            shape_velocity_distribution: GammaParams::new(12.0, 0.4),
            hue_velocity_factor: 0.002,
            rotation_speed_factor: 0.10,
            warp_speed_factor: 0.10,
            plumpness_speed_factor: 0.03,

            force_strength: 0.3,
            bias_scale: 0.005,
            boundary_strictness: 64.0,
            friction_policy: FrictionPolicy::CubicDrag,
            initial_friction: 0.15,
            friction_step: 1.3,

            plumpness_range: Span::new(0.7, 1.0),
            warp_range: Span::new(-0.2, 0.2),

            initial_tail_critical_value: 0.10,
            sharpness_step: 0.05,
            command_queue_capacity: 256,

            refresh_rate: 60.0,
            start_time: Span::new(1000.0, 2000.0),

            fullscreen: true,
        }
    }
}

impl BlobConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: BlobConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the number of blobs.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Fix the RNG seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose how velocity growth is limited.
    pub fn with_friction_policy(mut self, policy: FrictionPolicy) -> Self {
        self.friction_policy = policy;
        self
    }

    /// Set the fallback refresh rate in Hz.
    pub fn with_refresh_rate(mut self, hz: f32) -> Self {
        self.refresh_rate = hz;
        self
    }

    /// Set the random and boundary force magnitudes.
    pub fn with_forces(mut self, force_strength: f32, bias_scale: f32, strictness: f32) -> Self {
        self.force_strength = force_strength;
        self.bias_scale = bias_scale;
        self.boundary_strictness = strictness;
        self
    }

    /// Run in a window instead of fullscreen.
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Absolute multiplier of the squared boundary bias.
    pub fn bias_strength(&self) -> f32 {
        self.bias_scale * self.force_strength
    }

    /// Check every value against its allowed range.
    ///
    /// Every float must be finite; NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, v)))
            }
        }

        fn non_negative(name: &str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be non-negative, got {}", name, v)))
            }
        }

        fn finite(name: &str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, v)))
            }
        }

        fn ordered(name: &str, span: Span) -> Result<(), ConfigError> {
            if span.is_ordered() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{} must be a finite range with lo <= hi, got [{}, {}]",
                    name, span.lo, span.hi
                )))
            }
        }

        if self.particle_count == 0 {
            return Err(ConfigError::Invalid("particle_count must be positive".into()));
        }
        if self.command_queue_capacity == 0 {
            return Err(ConfigError::Invalid("command_queue_capacity must be positive".into()));
        }

        positive("position_deviation", self.position_deviation)?;
        positive("avg_radius", self.avg_radius)?;
        positive("radius_deviation", self.radius_deviation)?;
        positive("min_radius", self.min_radius)?;
        positive("max_radius", self.max_radius)?;
        // Both bounds are finite here, so this comparison sees no NaN
        if self.max_radius < self.min_radius {
            return Err(ConfigError::Invalid(format!(
                "max_radius ({}) is smaller than min_radius ({})",
                self.max_radius, self.min_radius
            )));
        }
        positive("saturation_coeff", self.saturation_coeff)?;
        positive("value_coeff", self.value_coeff)?;

        for (name, g) in [
            ("corner_distribution", self.corner_distribution),
            ("hue_velocity_distribution", self.hue_velocity_distribution),
            ("shape_velocity_distribution", self.shape_velocity_distribution),
        ] {
            positive(&format!("{}.shape", name), g.shape)?;
            positive(&format!("{}.scale", name), g.scale)?;
        }
        finite("hue_velocity_factor", self.hue_velocity_factor)?;
        finite("rotation_speed_factor", self.rotation_speed_factor)?;
        finite("warp_speed_factor", self.warp_speed_factor)?;
        finite("plumpness_speed_factor", self.plumpness_speed_factor)?;

        positive("force_strength", self.force_strength)?;
        non_negative("bias_scale", self.bias_scale)?;
        non_negative("boundary_strictness", self.boundary_strictness)?;
        positive("initial_friction", self.initial_friction)?;
        positive("friction_step", self.friction_step)?;
        if let FrictionPolicy::InertiaClamp { target_max_speed } = self.friction_policy {
            positive("target_max_speed", target_max_speed)?;
        }

        ordered("plumpness_range", self.plumpness_range)?;
        ordered("warp_range", self.warp_range)?;

        if !Span::new(0.0, 1.0).contains(self.initial_tail_critical_value) {
            return Err(ConfigError::Invalid(format!(
                "initial_tail_critical_value must be within [0, 1], got {}",
                self.initial_tail_critical_value
            )));
        }
        non_negative("sharpness_step", self.sharpness_step)?;

        positive("refresh_rate", self.refresh_rate)?;
        ordered("start_time", self.start_time)?;

        Ok(())
    }
}
