//! Ping-pong bookkeeping for the offscreen surfaces.

use std::fmt;

use crate::device::PostDevice;

/// Render surfaces addressed by the post pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SurfaceId {
    /// Surface A; receives the scene.
    Primary,
    /// Surface B.
    Secondary,
    /// Last frame's final image, read by feedback effects.
    Feedback,
    /// The swap-chain image.
    Display,
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SurfaceId::Primary => "A",
            SurfaceId::Secondary => "B",
            SurfaceId::Feedback => "feedback",
            SurfaceId::Display => "display",
        };
        f.write_str(s)
    }
}

/// Write/read pair for one invocation. Never the same surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingPong {
    pub write: SurfaceId,
    pub read: SurfaceId,
}

/// Alternates A and B by invocation index and tracks which one holds the
/// newest result.
#[derive(Debug, Clone)]
pub struct SurfaceRing {
    last_written: SurfaceId,
}

impl Default for SurfaceRing {
    fn default() -> Self {
        Self {
            last_written: SurfaceId::Primary,
        }
    }
}

impl SurfaceRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene pass has just filled the primary surface.
    pub fn begin_frame(&mut self) {
        self.last_written = SurfaceId::Primary;
    }

    /// Even indices write B and read A; odd indices write A and read B.
    pub fn acquire(&mut self, index: usize) -> PingPong {
        let pair = if index % 2 == 0 {
            PingPong {
                write: SurfaceId::Secondary,
                read: SurfaceId::Primary,
            }
        } else {
            PingPong {
                write: SurfaceId::Primary,
                read: SurfaceId::Secondary,
            }
        };
        self.last_written = pair.write;
        pair
    }

    /// Binds `pair` on the device: write as target, read as source.
    pub fn bind<D: PostDevice + ?Sized>(&self, device: &mut D, pair: PingPong) {
        device.bind_target(pair.write);
        device.bind_source(pair.read);
    }

    /// Re-issues the current draw into the display with unchanged state.
    pub fn present<D: PostDevice + ?Sized>(&self, device: &mut D) {
        device.bind_target(SurfaceId::Display);
        device.draw_quad();
    }

    /// Copies `last_written` into the feedback surface for the next frame.
    pub fn capture_feedback<D: PostDevice + ?Sized>(&self, device: &mut D, last_written: SurfaceId) {
        device.copy_surface(last_written, SurfaceId::Feedback);
    }

    #[inline]
    pub fn last_written(&self) -> SurfaceId {
        self.last_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::recording::{Op, RecordingDevice};

    #[test]
    fn parity_selects_the_pair() {
        let mut ring = SurfaceRing::new();
        for i in [0, 2, 4, 10] {
            let p = ring.acquire(i);
            assert_eq!(p, PingPong { write: SurfaceId::Secondary, read: SurfaceId::Primary });
        }
        for i in [1, 3, 7] {
            let p = ring.acquire(i);
            assert_eq!(p, PingPong { write: SurfaceId::Primary, read: SurfaceId::Secondary });
        }
    }

    #[test]
    fn never_reads_what_it_writes() {
        let mut ring = SurfaceRing::new();
        for i in 0..16 {
            let p = ring.acquire(i);
            assert_ne!(p.write, p.read);
            assert!(p.write != SurfaceId::Display && p.read != SurfaceId::Display);
        }
    }

    #[test]
    fn tracks_last_written() {
        let mut ring = SurfaceRing::new();
        assert_eq!(ring.last_written(), SurfaceId::Primary);
        ring.acquire(0);
        assert_eq!(ring.last_written(), SurfaceId::Secondary);
        ring.acquire(1);
        assert_eq!(ring.last_written(), SurfaceId::Primary);
        ring.acquire(2);
        ring.begin_frame();
        assert_eq!(ring.last_written(), SurfaceId::Primary);
    }

    #[test]
    fn present_draws_into_display() {
        let ring = SurfaceRing::new();
        let mut device = RecordingDevice::default();
        ring.present(&mut device);
        assert_eq!(device.ops, vec![Op::BindTarget(SurfaceId::Display), Op::Draw]);
    }

    #[test]
    fn feedback_copies_final_surface() {
        let ring = SurfaceRing::new();
        let mut device = RecordingDevice::default();
        ring.capture_feedback(&mut device, SurfaceId::Secondary);
        assert_eq!(device.ops, vec![Op::Copy { from: SurfaceId::Secondary, to: SurfaceId::Feedback }]);
    }
}
