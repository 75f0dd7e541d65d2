//! Runtime controls.
//!
//! Key presses become [`Command`]s pushed into a bounded channel. The
//! frame loop drains the channel once per tick into a [`CommandBatch`]
//! and applies it to the [`TunableParams`] before any simulation math.
//!
//! A batch is applied in a fixed order with net counts, so the result of
//! a tick does not depend on the order in which distinct commands were
//! pressed. Repeated presses accumulate.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use crate::config::BlobConfig;

/// A discrete control action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Raise the tail critical value (sharper blob edges).
    Sharpen,
    /// Lower the tail critical value.
    Unsharpen,
    /// Toggle drawing. Simulation keeps running either way.
    ToggleDraw,
    /// Switch between measured and nominal frame timing.
    ToggleTimeLimit,
    /// Multiply friction by the friction step.
    MoreFriction,
    /// Divide friction by the friction step.
    LessFriction,
}

/// Parameters mutated by commands and read every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunableParams {
    /// Render threshold passed to the shader; always within `[0, 1]`.
    pub tail_critical_value: f32,
    pub friction: f32,
    pub draw: bool,
    pub limit_time: bool,
}

impl Default for TunableParams {
    fn default() -> Self {
        Self::from_config(&BlobConfig::default())
    }
}

impl TunableParams {
    pub fn from_config(config: &BlobConfig) -> Self {
        Self {
            tail_critical_value: config.initial_tail_critical_value,
            friction: config.initial_friction,
            draw: true,
            limit_time: true,
        }
    }
}

/// Step sizes applied by commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSteps {
    pub sharpness: f32,
    /// Geometric factor, e.g. `1.3`.
    pub friction: f32,
}

impl ControlSteps {
    pub fn from_config(config: &BlobConfig) -> Self {
        Self {
            sharpness: config.sharpness_step,
            friction: config.friction_step,
        }
    }
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self::from_config(&BlobConfig::default())
    }
}

/// Press counts gathered between two ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommandBatch {
    pub sharpen: u32,
    pub unsharpen: u32,
    pub toggle_draw: u32,
    pub toggle_time_limit: u32,
    pub more_friction: u32,
    pub less_friction: u32,
}

impl CommandBatch {
    pub fn push(&mut self, command: Command) {
        let slot = match command {
            Command::Sharpen => &mut self.sharpen,
            Command::Unsharpen => &mut self.unsharpen,
            Command::ToggleDraw => &mut self.toggle_draw,
            Command::ToggleTimeLimit => &mut self.toggle_time_limit,
            Command::MoreFriction => &mut self.more_friction,
            Command::LessFriction => &mut self.less_friction,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every counted press to `params`.
    pub fn apply(&self, params: &mut TunableParams, steps: &ControlSteps) {
        let net_sharpen = self.sharpen as f32 - self.unsharpen as f32;
        if net_sharpen != 0.0 {
            params.tail_critical_value =
                (params.tail_critical_value + net_sharpen * steps.sharpness).clamp(0.0, 1.0);
        }

        let net_friction = self.more_friction as i32 - self.less_friction as i32;
        if net_friction != 0 {
            params.friction *= steps.friction.powi(net_friction);
        }

        if self.toggle_draw % 2 == 1 {
            params.draw = !params.draw;
        }
        if self.toggle_time_limit % 2 == 1 {
            params.limit_time = !params.limit_time;
        }
    }
}

impl FromIterator<Command> for CommandBatch {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut batch = CommandBatch::default();
        for command in iter {
            batch.push(command);
        }
        batch
    }
}

/// Producer side of the command channel, held by the input handler.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: SyncSender<Command>,
}

impl CommandSender {
    /// Queue a command without blocking.
    ///
    /// Returns `false` if the queue is full or the frame loop is gone; the
    /// press is dropped in that case.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                log::warn!("Command queue full, dropping {:?}", command);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer side of the command channel, drained by the frame loop.
#[derive(Debug)]
pub struct CommandQueue {
    rx: Receiver<Command>,
}

impl CommandQueue {
    /// Create a channel holding at most `capacity` undrained commands.
    pub fn bounded(capacity: usize) -> (CommandSender, CommandQueue) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (CommandSender { tx }, CommandQueue { rx })
    }

    /// Take every queued command.
    pub fn drain(&self) -> CommandBatch {
        let mut batch = CommandBatch::default();
        loop {
            match self.rx.try_recv() {
                Ok(command) => batch.push(command),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TunableParams {
        TunableParams::default()
    }

    #[test]
    fn test_friction_step_round_trip() {
        let steps = ControlSteps::default();
        let mut p = params();
        let f = p.friction;

        CommandBatch::from_iter([Command::MoreFriction]).apply(&mut p, &steps);
        assert!((p.friction - f * 1.3).abs() < 1e-6);

        CommandBatch::from_iter([Command::LessFriction]).apply(&mut p, &steps);
        assert!((p.friction - f).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_presses_accumulate() {
        let steps = ControlSteps::default();
        let mut p = params();
        let f = p.friction;
        CommandBatch::from_iter([Command::MoreFriction; 3]).apply(&mut p, &steps);
        assert!((p.friction - f * 1.3f32.powi(3)).abs() < 1e-5);

        let t = p.tail_critical_value;
        CommandBatch::from_iter([Command::Sharpen; 2]).apply(&mut p, &steps);
        assert!((p.tail_critical_value - (t + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_clamped() {
        let steps = ControlSteps::default();
        let mut p = params();
        CommandBatch::from_iter([Command::Sharpen; 40]).apply(&mut p, &steps);
        assert_eq!(p.tail_critical_value, 1.0);
        CommandBatch::from_iter([Command::Unsharpen; 40]).apply(&mut p, &steps);
        assert_eq!(p.tail_critical_value, 0.0);
    }

    #[test]
    fn test_toggles_flip_per_press() {
        let steps = ControlSteps::default();
        let mut p = params();
        CommandBatch::from_iter([Command::ToggleDraw]).apply(&mut p, &steps);
        assert!(!p.draw);
        CommandBatch::from_iter([Command::ToggleDraw, Command::ToggleDraw]).apply(&mut p, &steps);
        assert!(!p.draw);
        CommandBatch::from_iter([Command::ToggleTimeLimit]).apply(&mut p, &steps);
        assert!(!p.limit_time);
    }

    #[test]
    fn test_order_does_not_matter() {
        let steps = ControlSteps::default();
        let forward = [
            Command::Sharpen,
            Command::MoreFriction,
            Command::ToggleDraw,
            Command::Unsharpen,
            Command::LessFriction,
            Command::MoreFriction,
        ];
        let mut backward = forward;
        backward.reverse();

        let mut a = params();
        let mut b = params();
        CommandBatch::from_iter(forward).apply(&mut a, &steps);
        CommandBatch::from_iter(backward).apply(&mut b, &steps);
        assert_eq!(a, b);
    }

    #[test]
    fn test_queue_drains_everything() {
        let (tx, queue) = CommandQueue::bounded(8);
        assert!(tx.send(Command::Sharpen));
        assert!(tx.send(Command::Sharpen));
        assert!(tx.send(Command::ToggleDraw));

        let batch = queue.drain();
        assert_eq!(batch.sharpen, 2);
        assert_eq!(batch.toggle_draw, 1);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (tx, queue) = CommandQueue::bounded(2);
        assert!(tx.send(Command::MoreFriction));
        assert!(tx.send(Command::MoreFriction));
        assert!(!tx.send(Command::MoreFriction));
        assert_eq!(queue.drain().more_friction, 2);
    }

    #[test]
    fn test_send_after_queue_dropped() {
        let (tx, queue) = CommandQueue::bounded(2);
        drop(queue);
        assert!(!tx.send(Command::Sharpen));
    }
}
