use bytemuck::{Pod, Zeroable};

/// Index into `Scene` meshes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub usize);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list, clockwise front faces (left-handed).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Unit cube centred on the origin, flat normals per face.
    pub fn cube() -> Self {
        let p = 0.5f32;
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([1.0, 0.0, 0.0], [[p, -p, -p], [p, p, -p], [p, p, p], [p, -p, p]]),
            ([-1.0, 0.0, 0.0], [[-p, -p, p], [-p, p, p], [-p, p, -p], [-p, -p, -p]]),
            ([0.0, 1.0, 0.0], [[-p, p, -p], [-p, p, p], [p, p, p], [p, p, -p]]),
            ([0.0, -1.0, 0.0], [[-p, -p, p], [-p, -p, -p], [p, -p, -p], [p, -p, p]]),
            ([0.0, 0.0, 1.0], [[p, -p, p], [p, p, p], [-p, p, p], [-p, -p, p]]),
            ([0.0, 0.0, -1.0], [[-p, -p, -p], [-p, p, -p], [p, p, -p], [p, -p, -p]]),
        ];

        let mut mesh = MeshData::default();
        for (normal, corners) in faces {
            let base = mesh.vertices.len() as u16;
            mesh.vertices
                .extend(corners.iter().map(|&pos| MeshVertex { pos, normal }));
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Square XZ plane of half-size `extent`, facing +Y.
    pub fn plane(extent: f32) -> Self {
        let s = extent;
        let normal = [0.0, 1.0, 0.0];
        let vertices = [[-s, 0.0, -s], [-s, 0.0, s], [s, 0.0, s], [s, 0.0, -s]]
            .into_iter()
            .map(|pos| MeshVertex { pos, normal })
            .collect();

        Self {
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn v(a: [f32; 3]) -> Vec3 {
        Vec3::from_array(a)
    }

    /// Every triangle must be clockwise when viewed from its normal side.
    fn assert_front_faces_clockwise(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            let winding = (v(b.pos) - v(a.pos)).cross(v(c.pos) - v(a.pos));
            // Left-handed: clockwise seen from outside gives a cross product along the normal.
            assert!(winding.dot(v(a.normal)) > 0.0, "triangle {tri:?} winds the wrong way");
        }
    }

    #[test]
    fn cube_has_six_quads() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }

    #[test]
    fn cube_winding_matches_normals() {
        assert_front_faces_clockwise(&MeshData::cube());
    }

    #[test]
    fn plane_faces_up() {
        let plane = MeshData::plane(10.0);
        assert!(plane.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0] && v.pos[1] == 0.0));
        assert_front_faces_clockwise(&plane);
    }
}
