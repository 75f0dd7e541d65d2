//! # blobdrift
//!
//! Soft, colored blobs drifting on a 2D plane. Each blob wanders under a
//! random force that is biased back toward the middle of the screen, cycles
//! its hue, and slowly morphs its outline. A fragment shader draws the
//! summed field of all blobs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use blobdrift::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = BlobConfig::new()
//!         .with_particle_count(48)
//!         .with_friction_policy(FrictionPolicy::InertiaClamp { target_max_speed: 0.05 });
//!     blobdrift::run(config)
//! }
//! ```
//!
//! ## Headless use
//!
//! The simulation does not need a window. [`FrameLoop`] publishes every
//! finished tick to any [`RenderSink`]:
//!
//! ```
//! use blobdrift::prelude::*;
//!
//! struct Count(usize);
//!
//! impl RenderSink for Count {
//!     type Error = ();
//!     fn publish(&mut self, frame: &RenderFrame<'_>) -> Result<(), ()> {
//!         self.0 = frame.len();
//!         Ok(())
//!     }
//! }
//!
//! let config = BlobConfig::new().with_seed(7).with_particle_count(8);
//! let (mut frame, _commands) = FrameLoop::new(&config, ViewportState::new(1.6), 60.0).unwrap();
//! let mut sink = Count(0);
//! frame.tick_with_delta(16_667.0, &mut sink).unwrap();
//! assert_eq!(sink.0, 8);
//! ```
//!
//! ## Controls
//!
//! See [`input`] for the default key bindings.

pub mod config;
pub mod control;
pub mod error;
pub mod force;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod integrator;
pub mod oscillator;
pub mod particle;
pub mod render;
pub mod sampler;
pub mod time;
pub mod viewport;
mod window;

pub use config::{BlobConfig, FrictionPolicy, GammaParams, Span};
pub use control::{Command, CommandBatch, CommandQueue, CommandSender, ControlSteps, TunableParams};
pub use error::{ConfigError, GpuError, SimulationError};
pub use force::ForceField;
pub use frame::FrameLoop;
pub use glam::{Vec2, Vec3, Vec4};
pub use integrator::Integrator;
pub use oscillator::ShapeOscillator;
pub use particle::{Blob, ParticleState, ShapeVelocity};
pub use render::{RenderFrame, RenderSink};
pub use sampler::Sampler;
pub use time::{SimulationClock, TimingMode};
pub use viewport::ViewportState;
pub use window::{run, App};

/// Common imports.
pub mod prelude {
    pub use crate::config::{BlobConfig, FrictionPolicy};
    pub use crate::control::Command;
    pub use crate::error::SimulationError;
    pub use crate::frame::FrameLoop;
    pub use crate::input::{KeyAction, KeyBindings};
    pub use crate::render::{RenderFrame, RenderSink};
    pub use crate::viewport::ViewportState;
    pub use crate::{Vec2, Vec3, Vec4};
}
