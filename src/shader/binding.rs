//! Vertex attribute binding: one interface, two strategies.

use super::descriptor::VertexAttribute;
use crate::gl::{DrawMode, GlApi, VertexArrayId};
use crate::options::BindingStrategy;
use crate::scene::Mesh;

/// How the geometry of the current draw ended up bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundGeometry {
    VertexArray(VertexArrayId),
    ClientArrays,
}

impl BoundGeometry {
    pub(crate) const fn strategy(self) -> BindingStrategy {
        match self {
            Self::VertexArray(_) => BindingStrategy::VertexArray,
            Self::ClientArrays => BindingStrategy::ClientArrays,
        }
    }
}

fn attribute_data(mesh: &dyn Mesh, attribute: VertexAttribute) -> &[f32] {
    match attribute {
        VertexAttribute::Position => bytemuck::cast_slice(mesh.positions()),
        VertexAttribute::Normal => bytemuck::cast_slice(mesh.normals()),
        VertexAttribute::TexCoord => bytemuck::cast_slice(mesh.tex_coords()),
    }
}

/// Bind `mesh` for the current program.
///
/// Returns `None` from the vertex-array strategy when the mesh has no vertex
/// array; the caller decides whether to fall back.
pub(crate) fn bind_vertex_array<A: GlApi + ?Sized>(
    api: &A,
    mesh: &dyn Mesh,
) -> Option<BoundGeometry> {
    let vertex_array = mesh.vertex_array()?;
    api.bind_vertex_array(Some(vertex_array));
    Some(BoundGeometry::VertexArray(vertex_array))
}

/// Feed every resolved attribute from the mesh's arrays.
pub(crate) fn bind_client_arrays<A: GlApi + ?Sized>(
    api: &A,
    mesh: &dyn Mesh,
    attributes: &[(VertexAttribute, Option<u32>)],
) -> BoundGeometry {
    for &(attribute, location) in attributes {
        let Some(location) = location else {
            continue;
        };
        api.client_attrib_array(
            location,
            attribute.components(),
            attribute_data(mesh, attribute),
        );
    }
    BoundGeometry::ClientArrays
}

/// Issue the indexed triangle draw for `geometry`; returns the index count.
///
/// The vertex array is unbound again afterwards so later client-array draws
/// cannot write into it.
pub(crate) fn draw_triangles<A: GlApi + ?Sized>(
    api: &A,
    mesh: &dyn Mesh,
    geometry: BoundGeometry,
) -> usize {
    let indices = mesh.triangles();
    match geometry {
        BoundGeometry::VertexArray(_) => {
            api.draw_elements_bound(DrawMode::Triangles, indices.len());
            api.bind_vertex_array(None);
        }
        BoundGeometry::ClientArrays => {
            api.draw_elements_client(DrawMode::Triangles, indices);
        }
    }
    indices.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, RecordingGl};
    use crate::scene::IndexedMesh;

    #[test]
    fn client_arrays_skip_unresolved_locations() {
        let gl = RecordingGl::new();
        let quad = IndexedMesh::quad();
        let attributes = [
            (VertexAttribute::Position, Some(0)),
            (VertexAttribute::Normal, None),
            (VertexAttribute::TexCoord, Some(1)),
        ];

        let bound = bind_client_arrays(&gl, &quad, &attributes);

        assert_eq!(bound, BoundGeometry::ClientArrays);
        assert_eq!(
            gl.calls(),
            [
                GlCall::ClientAttribArray {
                    location: 0,
                    components: 3,
                    len: 12,
                },
                GlCall::ClientAttribArray {
                    location: 1,
                    components: 2,
                    len: 8,
                },
            ]
        );
    }

    #[test]
    fn mesh_without_vertex_array_does_not_bind_one() {
        let gl = RecordingGl::new();
        assert_eq!(bind_vertex_array(&gl, &IndexedMesh::quad()), None);
        assert!(gl.calls().is_empty());
    }
}
