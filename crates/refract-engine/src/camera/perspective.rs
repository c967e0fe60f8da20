use glam::{EulerRot, Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::coords::Viewport;
use crate::input::{InputState, Key};

use super::CameraView;

/// Free-flying perspective camera.
///
/// Rotation is Euler angles in radians applied Z, then X, then Y (roll, pitch,
/// yaw), matching the scene's model matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,

    /// Horizontal field of view in radians.
    pub fov_x: f32,
    pub aspect_ratio: f32,
    pub near_clip: f32,
    pub far_clip: f32,

    /// World units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_x: std::f32::consts::FRAC_PI_3,
            aspect_ratio: 16.0 / 9.0,
            near_clip: 0.1,
            far_clip: 10_000.0,
            move_speed: 50.0,
            turn_speed: 2.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    /// Keeps the projection in step with the drawable size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_valid() {
            self.aspect_ratio = viewport.aspect();
        }
    }

    /// Vertical field of view derived from `fov_x` and the aspect ratio.
    pub fn fov_y(&self) -> f32 {
        2.0 * ((self.fov_x * 0.5).tan() / self.aspect_ratio).atan()
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y(), self.aspect_ratio, self.near_clip, self.far_clip)
    }

    /// Arrow keys turn, W/S move along the facing axis, A/D strafe.
    pub fn control(&mut self, dt: f32, input: &InputState) {
        let turn = self.turn_speed * dt;
        if input.key_down(Key::ArrowUp) {
            self.rotation.x -= turn;
        }
        if input.key_down(Key::ArrowDown) {
            self.rotation.x += turn;
        }
        if input.key_down(Key::ArrowLeft) {
            self.rotation.y -= turn;
        }
        if input.key_down(Key::ArrowRight) {
            self.rotation.y += turn;
        }

        let world = self.world_matrix();
        let right = world.x_axis.xyz();
        let forward = world.z_axis.xyz();
        let step = self.move_speed * dt;

        if input.key_down(Key::W) {
            self.position += forward * step;
        }
        if input.key_down(Key::S) {
            self.position -= forward * step;
        }
        if input.key_down(Key::D) {
            self.position += right * step;
        }
        if input.key_down(Key::A) {
            self.position -= right * step;
        }
    }
}

impl CameraView for Camera {
    fn project_to_screen(&self, world: Vec3, viewport: Viewport) -> Vec3 {
        let clip = self.view_projection() * world.extend(1.0);
        let w = clip.w;
        if w.abs() <= f32::EPSILON {
            return Vec3::new(0.0, 0.0, w);
        }

        let x = (clip.x / w + 1.0) * viewport.width * 0.5;
        let y = (1.0 - clip.y / w) * viewport.height * 0.5;
        Vec3::new(x, y, w)
    }

    fn world_units_per_pixel(&self, distance: f32, viewport: Viewport) -> Vec2 {
        // Extent of the view at the near plane, scaled out to `distance`.
        let width_at_near = 2.0 * self.near_clip * (self.fov_x * 0.5).tan();
        let height_at_near = width_at_near * viewport.height / viewport.width;
        let scale = distance / self.near_clip;

        Vec2::new(
            width_at_near * scale / viewport.width,
            height_at_near * scale / viewport.height,
        )
    }

    fn near_clip(&self) -> f32 {
        self.near_clip
    }

    fn far_clip(&self) -> f32 {
        self.far_clip
    }

    fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn camera_800x600() -> (Camera, Viewport) {
        let viewport = Viewport::new(800.0, 600.0);
        let mut camera = Camera::default();
        camera.set_viewport(viewport);
        (camera, viewport)
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn point_ahead_projects_to_centre() {
        let (camera, viewport) = camera_800x600();
        let p = camera.project_to_screen(Vec3::new(0.0, 0.0, 50.0), viewport);
        assert!(close(p.x, 400.0));
        assert!(close(p.y, 300.0));
        assert!(close(p.z, 50.0));
    }

    #[test]
    fn point_above_projects_towards_top() {
        let (camera, viewport) = camera_800x600();
        let p = camera.project_to_screen(Vec3::new(0.0, 5.0, 50.0), viewport);
        assert!(p.y < 300.0);
    }

    #[test]
    fn point_behind_has_negative_distance() {
        let (camera, viewport) = camera_800x600();
        let p = camera.project_to_screen(Vec3::new(0.0, 0.0, -10.0), viewport);
        assert!(p.z < camera.near_clip);
    }

    #[test]
    fn distance_follows_camera_position() {
        let (mut camera, viewport) = camera_800x600();
        camera.position = Vec3::new(0.0, 0.0, -20.0);
        let p = camera.project_to_screen(Vec3::ZERO, viewport);
        assert!(close(p.z, 20.0));
    }

    #[test]
    fn horizontal_fov_spans_viewport_width() {
        let (camera, viewport) = camera_800x600();
        // Point on the right edge of a 60 degree horizontal frustum.
        let d = 10.0;
        let x = d * (camera.fov_x * 0.5).tan();
        let p = camera.project_to_screen(Vec3::new(x, 0.0, d), viewport);
        assert!(close(p.x, 800.0));
    }

    // ── world_units_per_pixel ─────────────────────────────────────────────

    #[test]
    fn pixel_size_scales_linearly_with_distance() {
        let (camera, viewport) = camera_800x600();
        let a = camera.world_units_per_pixel(10.0, viewport);
        let b = camera.world_units_per_pixel(20.0, viewport);
        assert!(close(b.x, 2.0 * a.x));
        assert!(close(b.y, 2.0 * a.y));
    }

    #[test]
    fn pixel_size_matches_frustum_width() {
        let (camera, viewport) = camera_800x600();
        let d = 10.0;
        let per_px = camera.world_units_per_pixel(d, viewport);
        let frustum_width = 2.0 * d * (camera.fov_x * 0.5).tan();
        assert!(close(per_px.x * viewport.width, frustum_width));
        // Square pixels.
        assert!(close(per_px.x, per_px.y));
    }

    // ── control ───────────────────────────────────────────────────────────

    #[test]
    fn w_moves_along_facing_axis() {
        let mut camera = Camera::default();
        camera.rotation.y = std::f32::consts::FRAC_PI_2;

        let mut input = InputState::default();
        input.keys_down.insert(Key::W);
        camera.control(0.1, &input);

        // Facing +X after a quarter turn to the right.
        assert!(close(camera.position.x, 5.0));
        assert!(close(camera.position.z, 0.0));
    }

    #[test]
    fn arrows_turn() {
        let mut camera = Camera::default();
        let mut input = InputState::default();
        input.keys_down.insert(Key::ArrowRight);
        input.keys_down.insert(Key::ArrowUp);
        camera.control(0.5, &input);
        assert!(close(camera.rotation.y, 1.0));
        assert!(close(camera.rotation.x, -1.0));
    }
}
