//! Perspective camera and the camera service the post pipeline consumes.
//!
//! Conventions: left-handed, +Y up, +Z forward, depth mapped to `[0, 1]`.
//! Screen space is in physical pixels with a top-left origin.

mod perspective;

pub use perspective::Camera;

use glam::{Mat4, Vec2, Vec3};

use crate::coords::Viewport;

/// Camera queries needed to place screen-space effects in the 3D scene.
pub trait CameraView {
    /// Projects a world point to `(pixel_x, pixel_y, view_distance)`.
    ///
    /// `view_distance` is the camera-space depth of the point; values at or
    /// below the near clip mean the point is not in front of the camera.
    fn project_to_screen(&self, world: Vec3, viewport: Viewport) -> Vec3;

    /// World-space extent covered by one pixel at `distance` from the camera.
    fn world_units_per_pixel(&self, distance: f32, viewport: Viewport) -> Vec2;

    fn near_clip(&self) -> f32;

    fn far_clip(&self) -> f32;

    fn view_projection(&self) -> Mat4;
}
