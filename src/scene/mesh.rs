use glam::{Vec2, Vec3};

use super::Mesh;
use crate::gl::VertexArrayId;

/// Owned indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Object-space positions.
    pub positions: Vec<Vec3>,
    /// Object-space normals (empty when not needed).
    pub normals: Vec<Vec3>,
    /// Texture coordinates (empty when not needed).
    pub tex_coords: Vec<Vec2>,
    /// Triangle list indices.
    pub triangles: Vec<u16>,
    /// Host-uploaded vertex array object, if any.
    pub vertex_array: Option<VertexArrayId>,
}

impl IndexedMesh {
    /// Unit quad in the XY plane facing +Z: four vertices, two triangles.
    ///
    /// Texture v runs from 0 at the bottom edge to 1 at the top.
    #[must_use]
    pub fn quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            tex_coords: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            triangles: vec![0, 1, 2, 0, 2, 3],
            vertex_array: None,
        }
    }

    /// Attach a vertex array object the host uploaded for this mesh.
    #[must_use]
    pub fn with_vertex_array(mut self, vertex_array: VertexArrayId) -> Self {
        self.vertex_array = Some(vertex_array);
        self
    }

    /// Number of triangles in the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

impl Mesh for IndexedMesh {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    fn triangles(&self) -> &[u16] {
        &self.triangles
    }

    fn vertex_array(&self) -> Option<VertexArrayId> {
        self.vertex_array
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles_over_four_vertices() {
        let quad = IndexedMesh::quad();
        assert_eq!(quad.positions.len(), 4);
        assert_eq!(quad.tex_coords.len(), 4);
        assert_eq!(quad.triangle_count(), 2);
        assert!(quad.triangles.iter().all(|&i| usize::from(i) < 4));
    }
}
