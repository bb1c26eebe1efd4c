use glam::{DVec3, Vec2};

/// Triangle-strip mesh with parallel per-vertex attribute arrays.
///
/// `vertices` and `normals` hold 3 floats per vertex, `uvs` holds 2. The
/// vertex order is the strip order and must not be rearranged.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
}

impl SurfaceMesh {
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
        }
    }

    pub fn push(&mut self, position: DVec3, normal: DVec3, uv: Vec2) {
        self.vertices
            .extend_from_slice(&[position.x as f32, position.y as f32, position.z as f32]);
        self.normals
            .extend_from_slice(&[normal.x as f32, normal.y as f32, normal.z as f32]);
        self.uvs.extend_from_slice(&[uv.x, uv.y]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn uv(&self, index: usize) -> Vec2 {
        Vec2::new(self.uvs[index * 2], self.uvs[index * 2 + 1])
    }

    pub fn position(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }
}
