//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and create them
//! lazily on first use, rebuilding when the target format changes.
//!
//! Convention:
//! - world space is left-handed, +Y up; clip depth is `[0, 1]`
//! - per-draw uniforms go through a `UniformArena` and are selected with a
//!   dynamic offset, so one submission can carry many distinct values

mod ctx;
mod scene;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene::{SceneRenderer, DEPTH_FORMAT};
pub use uniforms::UniformArena;
