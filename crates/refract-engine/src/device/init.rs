/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// The offscreen post-process surfaces are sRGB, so the display should match.
    pub prefer_srgb: bool,

    /// Present mode used while the frame rate is locked to the display refresh.
    pub locked_present_mode: wgpu::PresentMode,

    /// Present mode used while the frame rate is unlocked.
    ///
    /// `AutoNoVsync` falls back to FIFO where tearing modes are unavailable.
    pub unlocked_present_mode: wgpu::PresentMode,

    /// Whether the surface starts in the locked present mode.
    pub start_locked: bool,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Present mode for the given frame-rate lock state.
    #[inline]
    pub fn present_mode(&self, locked: bool) -> wgpu::PresentMode {
        if locked {
            self.locked_present_mode
        } else {
            self.unlocked_present_mode
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            locked_present_mode: wgpu::PresentMode::Fifo,
            unlocked_present_mode: wgpu::PresentMode::AutoNoVsync,
            start_locked: true,
            alpha_mode: Some(wgpu::CompositeAlphaMode::Opaque),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_mode_follows_lock_state() {
        let init = GpuInit::default();
        assert_eq!(init.present_mode(true), wgpu::PresentMode::Fifo);
        assert_eq!(init.present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}
