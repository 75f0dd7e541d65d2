//! One tick of the simulation.
//!
//! [`FrameLoop`] owns everything that changes over time and runs each tick
//! to completion before handing the result to a [`RenderSink`]:
//!
//! 1. drain queued commands and apply them to the tunable parameters
//! 2. advance the clock
//! 3. integrate every blob under its biased random force
//! 4. advance every hue
//! 5. recompute every shape from the new virtual time
//! 6. publish the arrays
//!
//! The sink only sees the arrays once every step above has run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::BlobConfig;
use crate::control::{CommandBatch, CommandQueue, CommandSender, ControlSteps, TunableParams};
use crate::error::ConfigError;
use crate::force::ForceField;
use crate::integrator::Integrator;
use crate::oscillator::{advance_hue, ShapeOscillator};
use crate::particle::ParticleState;
use crate::render::{RenderFrame, RenderSink};
use crate::sampler::Sampler;
use crate::time::{SimulationClock, TimingMode};
use crate::viewport::ViewportState;

/// The simulation core and its per-tick driver.
pub struct FrameLoop {
    particles: ParticleState,
    clock: SimulationClock,
    params: TunableParams,
    steps: ControlSteps,
    viewport: ViewportState,
    forces: ForceField,
    integrator: Integrator,
    shapes: ShapeOscillator,
    commands: CommandQueue,
    rng: SmallRng,
}

impl FrameLoop {
    /// Sample a population and set up the clock.
    ///
    /// Returns the loop together with the sender the input handler pushes
    /// commands into.
    pub fn new(
        config: &BlobConfig,
        viewport: ViewportState,
        refresh_rate: f32,
    ) -> Result<(Self, CommandSender), ConfigError> {
        config.validate()?;
        if !(refresh_rate.is_finite() && refresh_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "refresh rate must be positive, got {}",
                refresh_rate
            )));
        }

        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let start_time = rng.gen_range(config.start_time.lo..=config.start_time.hi);

        let sampler = Sampler::new(config)?;
        let particles =
            ParticleState::spawn(config.particle_count, &sampler, &mut rng, viewport.aspect_ratio());

        log::info!(
            "Spawned {} blobs (seed {}, refresh {:.1} Hz, t0 {:.1}, {:?})",
            particles.len(),
            seed,
            refresh_rate,
            start_time,
            config.friction_policy
        );

        let (sender, commands) = CommandQueue::bounded(config.command_queue_capacity);
        let frame = Self {
            particles,
            clock: SimulationClock::new(refresh_rate, start_time),
            params: TunableParams::from_config(config),
            steps: ControlSteps::from_config(config),
            viewport,
            forces: ForceField::from_config(config),
            integrator: Integrator::new(config.friction_policy),
            shapes: ShapeOscillator::from_config(config),
            commands,
            rng,
        };
        Ok((frame, sender))
    }

    /// Replace the sampled population, e.g. with a hand-built one.
    pub fn with_particles(mut self, particles: ParticleState) -> Self {
        self.particles = particles;
        self
    }

    /// Run a tick using the wall-clock time measured since the previous
    /// one, publish it, then start timing the next frame.
    ///
    /// The frame is marked even when the sink fails, so a failed present
    /// does not stretch the next step.
    pub fn tick<S: RenderSink>(&mut self, sink: &mut S) -> Result<f32, S::Error> {
        let step = self.run_tick(|clock, mode| clock.tick(mode));
        let published = self.publish(sink);
        self.clock.mark_frame();
        published.map(|()| step)
    }

    /// Run a tick for an explicit frame delta and publish it.
    pub fn tick_with_delta<S: RenderSink>(
        &mut self,
        frame_delta_us: f32,
        sink: &mut S,
    ) -> Result<f32, S::Error> {
        let step = self.simulate(frame_delta_us);
        self.publish(sink)?;
        Ok(step)
    }

    /// Apply commands and advance all state by one tick. Returns the step.
    pub fn simulate(&mut self, frame_delta_us: f32) -> f32 {
        self.run_tick(|clock, mode| clock.advance(mode, frame_delta_us))
    }

    fn run_tick(&mut self, advance: impl FnOnce(&mut SimulationClock, TimingMode) -> f32) -> f32 {
        let batch = self.commands.drain();
        self.apply_commands(&batch);

        let mode = TimingMode::from_limit_time(self.params.limit_time);
        let dt = advance(&mut self.clock, mode);

        self.move_blobs(dt);
        self.move_hues(dt);
        self.morph_shapes();
        dt
    }

    /// Hand the current arrays to `sink`.
    pub fn publish<S: RenderSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let frame = RenderFrame {
            pos_rad: self.particles.pos_rad(),
            color: self.particles.color(),
            params: self.particles.params(),
            aspect_ratio: self.viewport.take_changed(),
            tail_critical_value: self.params.tail_critical_value,
            draw: self.params.draw,
            limit_time: self.params.limit_time,
        };
        sink.publish(&frame)
    }

    fn apply_commands(&mut self, batch: &CommandBatch) {
        if batch.is_empty() {
            return;
        }
        batch.apply(&mut self.params, &self.steps);
        log::debug!("Applied {:?}, params now {:?}", batch, self.params);
    }

    fn move_blobs(&mut self, dt: f32) {
        let aspect = self.viewport.aspect_ratio();
        let friction = self.params.friction;
        let particles = &mut self.particles;
        for (pos_rad, velocity) in particles.pos_rad.iter_mut().zip(particles.velocity.iter_mut()) {
            let mut position = pos_rad.truncate();
            let force = self.forces.force(position, aspect, &mut self.rng);
            self.integrator.step(&mut position, velocity, force, friction, dt);
            pos_rad.x = position.x;
            pos_rad.y = position.y;
        }
    }

    fn move_hues(&mut self, dt: f32) {
        let particles = &mut self.particles;
        for (color, hue_velocity) in particles.color.iter_mut().zip(&particles.hue_velocity) {
            color.x = advance_hue(color.x, *hue_velocity, dt);
        }
    }

    fn morph_shapes(&mut self) {
        let t = self.clock.elapsed();
        let particles = &mut self.particles;
        for (params, velocity) in particles.params.iter_mut().zip(&particles.shape_velocity) {
            self.shapes.apply(params, velocity, t);
        }
    }

    pub fn particles(&self) -> &ParticleState {
        &self.particles
    }

    pub fn params(&self) -> &TunableParams {
        &self.params
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Forward a framebuffer resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
    }
}

fn wall_clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Blob;
    use glam::{Vec2, Vec3};

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        aspect_updates: Vec<f32>,
    }

    impl RenderSink for CountingSink {
        type Error = ();

        fn publish(&mut self, frame: &RenderFrame<'_>) -> Result<(), ()> {
            self.frames += 1;
            self.aspect_updates.extend(frame.aspect_ratio);
            Ok(())
        }
    }

    fn frame_loop(config: &BlobConfig) -> (FrameLoop, CommandSender) {
        FrameLoop::new(config, ViewportState::from_size(1600, 1000), 60.0).unwrap()
    }

    #[test]
    fn test_count_is_invariant() {
        let config = BlobConfig::new().with_seed(1).with_particle_count(20);
        let (mut fl, _tx) = frame_loop(&config);
        let mut sink = CountingSink::default();
        for _ in 0..100 {
            fl.tick_with_delta(16_667.0, &mut sink).unwrap();
            assert_eq!(fl.particles().len(), 20);
        }
        assert_eq!(sink.frames, 100);
    }

    #[test]
    fn test_aspect_published_once_per_change() {
        let config = BlobConfig::new().with_seed(2);
        let (mut fl, _tx) = frame_loop(&config);
        let mut sink = CountingSink::default();
        fl.tick_with_delta(16_000.0, &mut sink).unwrap();
        fl.tick_with_delta(16_000.0, &mut sink).unwrap();
        fl.resize(1000, 1000);
        fl.tick_with_delta(16_000.0, &mut sink).unwrap();
        assert_eq!(sink.aspect_updates, vec![1.6, 1.0]);
    }

    #[test]
    fn test_start_time_in_range() {
        for seed in 0..20 {
            let config = BlobConfig::new().with_seed(seed);
            let (fl, _tx) = frame_loop(&config);
            let t = fl.clock().elapsed();
            assert!((1000.0..=2000.0).contains(&t));
        }
    }

    #[test]
    fn test_commands_applied_before_step() {
        let config = BlobConfig::new().with_seed(3);
        let (mut fl, tx) = frame_loop(&config);
        let mut sink = CountingSink::default();
        tx.send(crate::control::Command::ToggleTimeLimit);
        let step = fl.tick_with_delta(0.0, &mut sink).unwrap();
        // Unlimited mode ignores the zero delta
        assert!(!fl.params().limit_time);
        assert!((step - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_zero_step_keeps_resting_blob() {
        let config = BlobConfig::new().with_seed(4);
        let (fl, _tx) = frame_loop(&config);
        let mut fl = fl.with_particles(ParticleState::from_blobs([Blob {
            position: Vec2::new(0.8, 0.5),
            radius: 0.03,
            color: Vec3::new(0.5, 1.0, 1.0),
            corners: 4.0,
            ..Default::default()
        }]));
        // Limited mode with zero measured time: zero step, nothing moves
        fl.simulate(0.0);
        assert_eq!(fl.particles().position(0), Vec2::new(0.8, 0.5));
    }

    struct FailingSink;

    impl RenderSink for FailingSink {
        type Error = &'static str;

        fn publish(&mut self, _frame: &RenderFrame<'_>) -> Result<(), Self::Error> {
            Err("surface lost")
        }
    }

    #[test]
    fn test_failed_publish_still_marks_frame() {
        let config = BlobConfig::new().with_seed(5);
        let (mut fl, _tx) = frame_loop(&config);
        std::thread::sleep(std::time::Duration::from_millis(3));

        assert_eq!(fl.tick(&mut FailingSink), Err("surface lost"));
        assert_eq!(fl.clock().tick_count(), 1);
        assert!(fl.clock().frame_delta() >= std::time::Duration::from_millis(3));

        // The next tick measures only the time since the failed one
        let mut sink = CountingSink::default();
        fl.tick(&mut sink).unwrap();
        assert!(fl.clock().frame_delta() < std::time::Duration::from_secs(1));
        assert_eq!(sink.frames, 1);
    }

    #[test]
    fn test_first_measured_tick_has_zero_step() {
        let config = BlobConfig::new().with_seed(6);
        let (mut fl, _tx) = frame_loop(&config);
        let t0 = fl.clock().elapsed();
        let mut sink = CountingSink::default();
        assert_eq!(fl.tick(&mut sink).unwrap(), 0.0);
        assert_eq!(fl.clock().elapsed(), t0);
    }

    #[test]
    fn test_rejects_non_finite_config() {
        let mut config = BlobConfig::new().with_seed(7);
        config.start_time.hi = f32::INFINITY;
        assert!(FrameLoop::new(&config, ViewportState::default(), 60.0).is_err());

        let config = BlobConfig::new().with_forces(0.3, 0.005, f32::INFINITY);
        assert!(FrameLoop::new(&config, ViewportState::default(), 60.0).is_err());
    }

    #[test]
    fn test_rejects_bad_refresh_rate() {
        let config = BlobConfig::new();
        assert!(FrameLoop::new(&config, ViewportState::default(), 0.0).is_err());
    }
}
