/// An acquired swap-chain image plus the encoder recording into it.
///
/// Submit promptly: holding the surface texture blocks the next acquire.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the frame loop does after `begin_frame` failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated; the surface was reconfigured and the next frame may succeed.
    Reconfigured,
    SkipFrame,
    /// Out of memory; the app exits.
    Fatal,
}
