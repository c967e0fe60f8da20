use crate::device::{Blend, Geometry, PostDevice};
use crate::registry::{AuxTexture, ProgramId};
use crate::settings::PostSettings;
use crate::surfaces::SurfaceId;

/// One draw with the state that was current when it was issued.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub target: SurfaceId,
    pub source: Option<SurfaceId>,
    pub program: ProgramId,
    /// Procedural map bound next to the source, if the program reads one.
    pub aux: Option<AuxTexture>,
    pub geometry: Geometry,
    pub blend: Blend,
    /// Index into `WgpuPostDevice::uploads`; `None` before the first upload.
    pub settings: Option<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PostOp {
    Scene(SurfaceId),
    Draw(DrawCall),
    Copy { from: SurfaceId, to: SurfaceId },
}

/// `PostDevice` that records a frame for `PostRenderer::encode`.
///
/// Calls only touch CPU state. Every `upload_settings` keeps its own copy,
/// so each draw is encoded with exactly the payload it was issued with.
#[derive(Debug, Default)]
pub struct WgpuPostDevice {
    ops: Vec<PostOp>,
    uploads: Vec<PostSettings>,
    vsync: Option<bool>,

    target: Option<SurfaceId>,
    source: Option<SurfaceId>,
    program: Option<ProgramId>,
    aux: Option<AuxTexture>,
    geometry: Geometry,
    blend: Blend,
    settings: Option<usize>,
}

impl WgpuPostDevice {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ops(&self) -> &[PostOp] {
        &self.ops
    }

    #[inline]
    pub fn uploads(&self) -> &[PostSettings] {
        &self.uploads
    }

    /// The frame-lock state requested by the last `request_present`.
    #[inline]
    pub fn present_request(&self) -> Option<bool> {
        self.vsync
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.ops.iter().filter_map(|op| match op {
            PostOp::Draw(d) => Some(d),
            _ => None,
        })
    }
}

impl PostDevice for WgpuPostDevice {
    fn render_scene(&mut self, target: SurfaceId) {
        self.ops.push(PostOp::Scene(target));
    }

    fn bind_target(&mut self, target: SurfaceId) {
        self.target = Some(target);
    }

    fn bind_source(&mut self, source: SurfaceId) {
        self.source = Some(source);
    }

    fn unbind_source(&mut self) {
        self.source = None;
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn select_program(&mut self, program: ProgramId, textures: &'static [AuxTexture]) {
        self.program = Some(program);
        // Feedback is always bound in its own slot.
        self.aux = textures.iter().copied().find(|t| *t != AuxTexture::Feedback);
    }

    fn upload_settings(&mut self, settings: &PostSettings) {
        self.settings = Some(self.uploads.len());
        self.uploads.push(*settings);
    }

    fn draw_quad(&mut self) {
        let Some(target) = self.target else {
            log::warn!("draw without a bound target; dropped");
            return;
        };
        if self.source == Some(target) {
            log::warn!("draw reads its own target {target}; dropped");
            return;
        }

        self.ops.push(PostOp::Draw(DrawCall {
            target,
            source: self.source,
            program: self.program.unwrap_or(ProgramId::Copy),
            aux: self.aux,
            geometry: self.geometry,
            blend: self.blend,
            settings: self.settings,
        }));
    }

    fn copy_surface(&mut self, from: SurfaceId, to: SurfaceId) {
        self.ops.push(PostOp::Copy { from, to });
    }

    fn request_present(&mut self, vsync: bool) {
        self.vsync = Some(vsync);
    }
}
