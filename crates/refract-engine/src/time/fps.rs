/// Averaged timing produced by `FpsCounter` once per reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsReport {
    /// Mean frame time over the window, in seconds.
    pub avg_frame_time: f32,
    /// Frames per second rounded to the nearest integer.
    pub fps: u32,
}

impl FpsReport {
    /// Window-title friendly summary, e.g. `"Frame Time: 16.67ms, FPS: 60"`.
    pub fn title_suffix(&self) -> String {
        format!(
            "Frame Time: {:.2}ms, FPS: {}",
            self.avg_frame_time * 1000.0,
            self.fps
        )
    }
}

/// Accumulates frame times and reports an average once per `window` seconds.
///
/// `reset` drops the partial window, e.g. after a long stall.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    total: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new(window: f32) -> Self {
        debug_assert!(window > 0.0);
        Self {
            window,
            total: 0.0,
            frames: 0,
        }
    }

    /// Records one frame. Returns a report when the window has elapsed.
    pub fn record(&mut self, dt: f32) -> Option<FpsReport> {
        self.total += dt;
        self.frames += 1;

        if self.total <= self.window {
            return None;
        }

        let avg = self.total / self.frames as f32;
        let report = FpsReport {
            avg_frame_time: avg,
            fps: (1.0 / avg + 0.5) as u32,
        };
        self.reset();
        Some(report)
    }

    pub fn reset(&mut self) {
        self.total = 0.0;
        self.frames = 0;
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(0.5)
    }
}
