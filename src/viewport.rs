//! Viewport aspect ratio with a change flag.

/// Current aspect ratio and whether the renderer has seen it yet.
///
/// Single writer, single reader: the resize handler calls
/// [`resize`](Self::resize), the frame loop calls
/// [`take_changed`](Self::take_changed) once per tick. Both run on the
/// event-loop thread between polls, so a plain `bool` is enough. If resize
/// notifications ever arrive from another thread, this must become an
/// atomic flag paired with the ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    aspect_ratio: f32,
    dirty: bool,
}

impl ViewportState {
    /// Start with `aspect_ratio`, marked dirty so the first tick publishes it.
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio,
            dirty: true,
        }
    }

    /// Viewport of `width` x `height` pixels.
    ///
    /// A zero dimension (minimized window) falls back to a square.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(aspect_of(width, height))
    }

    /// Record a new framebuffer size and mark the ratio dirty.
    ///
    /// Zero-sized framebuffers are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect_ratio = aspect_of(width, height);
        self.dirty = true;
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The ratio if it changed since the last call, clearing the flag.
    pub fn take_changed(&mut self) -> Option<f32> {
        if self.dirty {
            self.dirty = false;
            Some(self.aspect_ratio)
        } else {
            None
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_dirty_once() {
        let mut vp = ViewportState::from_size(1920, 1080);
        assert_eq!(vp.take_changed(), Some(1920.0 / 1080.0));
        assert_eq!(vp.take_changed(), None);
    }

    #[test]
    fn test_resize_marks_dirty() {
        let mut vp = ViewportState::new(1.0);
        vp.take_changed();
        vp.resize(800, 400);
        assert!(vp.is_dirty());
        assert_eq!(vp.take_changed(), Some(2.0));
        assert!(!vp.is_dirty());
    }

    #[test]
    fn test_zero_size_ignored() {
        let mut vp = ViewportState::new(1.5);
        vp.take_changed();
        vp.resize(0, 600);
        assert!(!vp.is_dirty());
        assert_eq!(vp.aspect_ratio(), 1.5);
        assert_eq!(ViewportState::from_size(0, 0).aspect_ratio(), 1.0);
    }
}
