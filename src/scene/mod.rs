//! Scene-graph collaborators consumed by the shader variants.
//!
//! The variants only read through the traits here. [`IndexedMesh`],
//! [`PropertyMaterial`], [`TextureRef`] and [`DrawItem`] are plain
//! implementations for hosts without their own scene types, and for tests.

mod draw_item;
mod material;
mod mesh;

use glam::{Vec2, Vec3};

pub use draw_item::DrawItem;
pub use material::{PropertyMaterial, TextureRef};
pub use mesh::IndexedMesh;

use crate::gl::{TextureId, TextureTarget, VertexArrayId};

/// Material key of the texture every variant samples.
pub const MAIN_TEXTURE: &str = "main_texture";
/// Material key of the RGB tint.
pub const COLOR: &str = "color";
/// Material key of the opacity scalar.
pub const OPACITY: &str = "opacity";

/// A GPU texture as seen by a sampler.
pub trait Texture {
    /// Binding point the texture was created for.
    fn target(&self) -> TextureTarget;
    /// GL texture object.
    fn id(&self) -> TextureId;
}

/// Read-only material property bag.
pub trait Material {
    /// Texture stored under `key`.
    fn texture(&self, key: &str) -> Option<&dyn Texture>;
    /// Three-component vector stored under `key`.
    fn vec3(&self, key: &str) -> Option<Vec3>;
    /// Scalar stored under `key`.
    fn float(&self, key: &str) -> Option<f32>;
}

/// Indexed triangle geometry.
///
/// Per-vertex arrays are parallel: element `i` of each describes vertex `i`.
/// Arrays a mesh does not carry are empty.
pub trait Mesh {
    /// Object-space positions.
    fn positions(&self) -> &[Vec3];
    /// Object-space normals.
    fn normals(&self) -> &[Vec3];
    /// Texture coordinates.
    fn tex_coords(&self) -> &[Vec2];
    /// Triangle list, three indices per triangle.
    fn triangles(&self) -> &[u16];
    /// Vertex array object with this mesh's attributes and element buffer
    /// already uploaded, if the host prepared one. Attributes must sit at
    /// [`VertexAttribute::location`](crate::shader::VertexAttribute::location).
    fn vertex_array(&self) -> Option<VertexArrayId> {
        None
    }
}

/// Everything one draw item contributes besides its transforms.
pub trait RenderData {
    /// Geometry to draw.
    fn mesh(&self) -> &dyn Mesh;
    /// Material supplying texture, tint and opacity.
    fn material(&self) -> &dyn Material;
}
