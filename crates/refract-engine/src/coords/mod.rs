//! Coordinate and geometry types shared across the scene and post renderers.
//!
//! Two screen spaces are in use:
//! - pixels: origin top-left, +X right, +Y down, sized by `Viewport`
//! - normalized: the same axes scaled to `[0, 1]` (1 = full viewport)
//!
//! Post-process placement works in normalized space; shaders map it to NDC.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
