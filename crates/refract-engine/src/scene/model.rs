use glam::{EulerRot, Mat4, Vec3};

use crate::paint::Color;

use super::MeshId;

/// A mesh placed in the world.
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: MeshId,
    pub position: Vec3,
    /// Euler angles in radians, applied Z, X, then Y.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub colour: Color,
    /// Emissive models skip lighting (used for light markers).
    pub emissive: bool,
}

impl Model {
    pub fn new(mesh: MeshId) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            colour: Color::WHITE,
            emissive: false,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn coloured(mut self, colour: Color) -> Self {
        self.colour = colour;
        self
    }

    pub fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            glam::Quat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z),
            self.position,
        )
    }
}
