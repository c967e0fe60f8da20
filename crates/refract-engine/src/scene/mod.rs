//! 3D scene content rendered before post-processing.
//!
//! CPU-side only: meshes are plain vertex/index arrays, models reference meshes
//! by id. `render::SceneRenderer` owns the GPU copies.

mod light;
mod mesh;
mod model;

pub use light::Light;
pub use mesh::{MeshData, MeshId, MeshVertex};
pub use model::Model;

use crate::paint::Color;

/// Everything the scene pass draws, plus global lighting terms.
#[derive(Debug, Clone)]
pub struct Scene {
    meshes: Vec<MeshData>,
    pub models: Vec<Model>,
    pub lights: Vec<Light>,
    pub ambient: Color,
    pub specular_power: f32,
    /// Clear colour of the scene surface.
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            meshes: Vec::new(),
            models: Vec::new(),
            lights: Vec::new(),
            ambient: Color::rgb(0.3, 0.3, 0.4),
            specular_power: 256.0,
            background: Color::rgb(0.3, 0.3, 0.4),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_model(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id.0)
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn ids_are_insertion_order() {
        let mut scene = Scene::new();
        let cube = scene.add_mesh(MeshData::cube());
        let ground = scene.add_mesh(MeshData::plane(100.0));
        assert_eq!(cube, MeshId(0));
        assert_eq!(ground, MeshId(1));
        assert_eq!(scene.mesh(ground).map(|m| m.indices.len()), Some(6));
        assert!(scene.mesh(MeshId(7)).is_none());
    }

    #[test]
    fn models_reference_meshes() {
        let mut scene = Scene::new();
        let cube = scene.add_mesh(MeshData::cube());
        let idx = scene.add_model(Model::new(cube).at(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(scene.models[idx].mesh, cube);
    }
}
