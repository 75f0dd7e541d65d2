//! The seam between the simulation and whatever draws it.

use glam::{Vec3, Vec4};

/// Read-only view of one finished tick.
///
/// All three arrays have one entry per blob and the same length on every
/// tick.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    /// x, y, radius.
    pub pos_rad: &'a [Vec3],
    /// hue, saturation, value.
    pub color: &'a [Vec3],
    /// corners, rotation, plumpness, warp.
    pub params: &'a [Vec4],
    /// Present only on ticks where the viewport aspect ratio changed.
    pub aspect_ratio: Option<f32>,
    pub tail_critical_value: f32,
    /// Render-only flag; the simulation advances either way.
    pub draw: bool,
    /// Whether frame timing is tied to the display.
    pub limit_time: bool,
}

impl RenderFrame<'_> {
    /// Number of blobs.
    pub fn len(&self) -> usize {
        self.pos_rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_rad.is_empty()
    }
}

/// Receives every finished tick.
///
/// Called once per tick, even when nothing visible changed.
pub trait RenderSink {
    type Error;

    fn publish(&mut self, frame: &RenderFrame<'_>) -> Result<(), Self::Error>;
}
