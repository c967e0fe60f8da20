//! The device/surface service the conductor drives.
//!
//! [`PostDevice`] is the seam between frame orchestration and the GPU: the
//! conductor expresses a frame as a sequence of state changes and draws, and
//! the implementation (see `gpu::WgpuPostDevice`) turns them into passes.

use crate::registry::{AuxTexture, ProgramId};
use crate::settings::PostSettings;
use crate::surfaces::SurfaceId;

/// Colour blending for post-process draws.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Blend {
    #[default]
    Opaque,
    /// Straight alpha; area effects fade out towards their edges.
    Alpha,
}

/// Vertex stage for post-process draws. Both draw a 4-vertex triangle strip.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Geometry {
    /// Rectangle from the settings' area block.
    #[default]
    Quad,
    /// Four clip-space points from the settings' polygon block.
    Polygon,
}

/// Operations the frame conductor issues, in order, for one frame.
///
/// State set by `bind_*`, `set_*`, `select_program` and `upload_settings`
/// persists until changed; `draw_quad` uses whatever is current. Depth is
/// always tested against the scene depth buffer and never written.
pub trait PostDevice {
    /// Clears `target` and the depth buffer and draws the 3D scene into them.
    fn render_scene(&mut self, target: SurfaceId);

    fn bind_target(&mut self, target: SurfaceId);

    fn bind_source(&mut self, source: SurfaceId);

    /// Releases the source so the surface can be written next.
    fn unbind_source(&mut self);

    fn set_geometry(&mut self, geometry: Geometry);

    fn set_blend(&mut self, blend: Blend);

    fn select_program(&mut self, program: ProgramId, textures: &'static [AuxTexture]);

    fn upload_settings(&mut self, settings: &PostSettings);

    fn draw_quad(&mut self);

    fn copy_surface(&mut self, from: SurfaceId, to: SurfaceId);

    /// Ends the frame; `vsync` locks presentation to the display refresh.
    fn request_present(&mut self, vsync: bool);
}

#[cfg(test)]
pub(crate) mod recording {
    //! Test double that records every call and snapshots draw state.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Scene(SurfaceId),
        BindTarget(SurfaceId),
        BindSource(SurfaceId),
        UnbindSource,
        Geometry(Geometry),
        Blend(Blend),
        Program(ProgramId),
        Upload,
        Draw,
        Copy { from: SurfaceId, to: SurfaceId },
        Present { vsync: bool },
    }

    /// State in effect when a draw was issued.
    #[derive(Debug, Clone)]
    pub struct DrawRecord {
        pub target: Option<SurfaceId>,
        pub source: Option<SurfaceId>,
        pub program: Option<ProgramId>,
        pub textures: &'static [AuxTexture],
        pub geometry: Geometry,
        pub blend: Blend,
        pub settings: Option<PostSettings>,
    }

    #[derive(Debug, Default)]
    pub struct RecordingDevice {
        pub ops: Vec<Op>,
        pub draws: Vec<DrawRecord>,

        target: Option<SurfaceId>,
        source: Option<SurfaceId>,
        program: Option<ProgramId>,
        textures: &'static [AuxTexture],
        geometry: Geometry,
        blend: Blend,
        settings: Option<PostSettings>,
    }

    impl RecordingDevice {
        pub fn count(&self, op: &Op) -> usize {
            self.ops.iter().filter(|o| *o == op).count()
        }

        /// Draws whose target is not the display.
        pub fn offscreen_draws(&self) -> impl Iterator<Item = &DrawRecord> {
            self.draws.iter().filter(|d| d.target != Some(SurfaceId::Display))
        }
    }

    impl PostDevice for RecordingDevice {
        fn render_scene(&mut self, target: SurfaceId) {
            self.ops.push(Op::Scene(target));
        }

        fn bind_target(&mut self, target: SurfaceId) {
            self.target = Some(target);
            self.ops.push(Op::BindTarget(target));
        }

        fn bind_source(&mut self, source: SurfaceId) {
            self.source = Some(source);
            self.ops.push(Op::BindSource(source));
        }

        fn unbind_source(&mut self) {
            self.source = None;
            self.ops.push(Op::UnbindSource);
        }

        fn set_geometry(&mut self, geometry: Geometry) {
            self.geometry = geometry;
            self.ops.push(Op::Geometry(geometry));
        }

        fn set_blend(&mut self, blend: Blend) {
            self.blend = blend;
            self.ops.push(Op::Blend(blend));
        }

        fn select_program(&mut self, program: ProgramId, textures: &'static [AuxTexture]) {
            self.program = Some(program);
            self.textures = textures;
            self.ops.push(Op::Program(program));
        }

        fn upload_settings(&mut self, settings: &PostSettings) {
            self.settings = Some(*settings);
            self.ops.push(Op::Upload);
        }

        fn draw_quad(&mut self) {
            self.draws.push(DrawRecord {
                target: self.target,
                source: self.source,
                program: self.program,
                textures: self.textures,
                geometry: self.geometry,
                blend: self.blend,
                settings: self.settings,
            });
            self.ops.push(Op::Draw);
        }

        fn copy_surface(&mut self, from: SurfaceId, to: SurfaceId) {
            self.ops.push(Op::Copy { from, to });
        }

        fn request_present(&mut self, vsync: bool) {
            self.ops.push(Op::Present { vsync });
        }
    }
}
