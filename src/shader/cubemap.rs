//! Cube map sampled along the object-space direction of each vertex.
//!
//! GL cube map lookups use a left-handed frame (+z points into the screen)
//! while the rest of the engine is right-handed. Source images arrive already
//! flipped vertically by the bitmap loader, so only z needs negating.

use std::rc::Rc;

use glam::Mat4;

use super::descriptor::{
    UniformSlot, VariantDescriptor, VariantKind, VertexAttribute,
};
use super::uniforms::{DrawTransforms, ExtraUniform};
use super::variant::{DrawReport, ShaderVariant};
use crate::error::ShaderError;
use crate::gl::names::gl_name;
use crate::gl::{GlApi, TextureTarget};
use crate::options::ShaderOptions;
use crate::scene::RenderData;

#[rustfmt::skip]
const VERTEX_SHADER: &str = concat!(
    "attribute vec4 ", gl_name!(a_position), ";\n",
    "uniform mat4 ", gl_name!(u_model), ";\n",
    "uniform mat4 ", gl_name!(u_mvp), ";\n",
    "varying vec3 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  ", gl_name!(v_tex_coord), " = normalize((", gl_name!(u_model), " * ",
    gl_name!(a_position), ").xyz);\n",
    "  ", gl_name!(v_tex_coord), ".z = -", gl_name!(v_tex_coord), ".z;\n",
    "  gl_Position = ", gl_name!(u_mvp), " * ", gl_name!(a_position), ";\n",
    "}\n",
);

#[rustfmt::skip]
const FRAGMENT_SHADER: &str = concat!(
    "precision highp float;\n",
    "uniform samplerCube ", gl_name!(u_texture), ";\n",
    "uniform vec3 ", gl_name!(u_color), ";\n",
    "uniform float ", gl_name!(u_opacity), ";\n",
    "varying vec3 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  vec4 color = textureCube(", gl_name!(u_texture), ", ",
    gl_name!(v_tex_coord), ");\n",
    "  gl_FragColor = vec4(color.rgb * ", gl_name!(u_color), " * ",
    gl_name!(u_opacity), ", color.a * ", gl_name!(u_opacity), ");\n",
    "}\n",
);

/// Descriptor of the cube map variant.
pub static DESCRIPTOR: VariantDescriptor = VariantDescriptor {
    kind: VariantKind::Cubemap,
    vertex_source: VERTEX_SHADER,
    fragment_source: FRAGMENT_SHADER,
    required_target: TextureTarget::CubeMap,
    attributes: &[VertexAttribute::Position],
    uniforms: &[
        UniformSlot::Model,
        UniformSlot::ModelViewProjection,
        UniformSlot::Texture,
        UniformSlot::Color,
        UniformSlot::Opacity,
    ],
};

/// Unlit cube map shader.
pub struct CubemapShader<A: GlApi + ?Sized> {
    variant: ShaderVariant<A>,
}

impl<A: GlApi + ?Sized> CubemapShader<A> {
    /// Build the program.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Link`] if the program cannot be built.
    pub fn new(api: Rc<A>, options: &ShaderOptions) -> Result<Self, ShaderError> {
        ShaderVariant::new(api, &DESCRIPTOR, options).map(|variant| Self { variant })
    }

    /// Draw `render_data`, whose main texture must be a cube map.
    ///
    /// # Errors
    ///
    /// See [`ShaderVariant::draw`].
    pub fn render<R: RenderData + ?Sized>(
        &self,
        model: &Mat4,
        mvp: &Mat4,
        render_data: &R,
    ) -> Result<DrawReport, ShaderError> {
        let transforms = DrawTransforms {
            model: *model,
            model_view_projection: *mvp,
            ..DrawTransforms::default()
        };
        self.variant.draw(&transforms, ExtraUniform::None, render_data)
    }

    /// Release the program. Idempotent.
    pub fn recycle(&mut self) {
        self.variant.recycle();
    }

    /// The underlying generic variant.
    #[must_use]
    pub fn variant(&self) -> &ShaderVariant<A> {
        &self.variant
    }
}
