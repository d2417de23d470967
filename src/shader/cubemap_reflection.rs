//! Cube map sampled along the view ray reflected about the surface normal.
//!
//! The reflected ray is taken back to world space with the inverse view
//! matrix, then z is negated for the cube map's left-handed lookup frame
//! (same convention as [`super::cubemap`]).

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
    "attribute vec3 ", gl_name!(a_normal), ";\n",
    "uniform mat4 ", gl_name!(u_mv), ";\n",
    "uniform mat4 ", gl_name!(u_mv_it), ";\n",
    "uniform mat4 ", gl_name!(u_mvp), ";\n",
    "uniform mat4 ", gl_name!(u_view_i), ";\n",
    "varying vec3 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  vec4 viewspace_position4 = ", gl_name!(u_mv), " * ",
    gl_name!(a_position), ";\n",
    "  vec3 viewspace_position = viewspace_position4.xyz / viewspace_position4.w;\n",
    "  vec3 viewspace_normal = (", gl_name!(u_mv_it), " * vec4(",
    gl_name!(a_normal), ", 1.0)).xyz;\n",
    "  vec3 reflected = reflect(viewspace_position, normalize(viewspace_normal));\n",
    "  ", gl_name!(v_tex_coord), " = (", gl_name!(u_view_i),
    " * vec4(reflected, 1.0)).xyz;\n",
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

/// Descriptor of the reflective cube map variant.
pub static DESCRIPTOR: VariantDescriptor = VariantDescriptor {
    kind: VariantKind::CubemapReflection,
    vertex_source: VERTEX_SHADER,
    fragment_source: FRAGMENT_SHADER,
    required_target: TextureTarget::CubeMap,
    attributes: &[VertexAttribute::Position, VertexAttribute::Normal],
    uniforms: &[
        UniformSlot::ModelView,
        UniformSlot::ModelViewInverseTranspose,
        UniformSlot::ModelViewProjection,
        UniformSlot::ViewInverse,
        UniformSlot::Texture,
        UniformSlot::Color,
        UniformSlot::Opacity,
    ],
};

/// Unlit reflective cube map shader.
pub struct CubemapReflectionShader<A: GlApi + ?Sized> {
    variant: ShaderVariant<A>,
}

impl<A: GlApi + ?Sized> CubemapReflectionShader<A> {
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
        mv: &Mat4,
        mv_it: &Mat4,
        view_inverse: &Mat4,
        mvp: &Mat4,
        render_data: &R,
    ) -> Result<DrawReport, ShaderError> {
        let transforms = DrawTransforms {
            model_view: *mv,
            model_view_inverse_transpose: *mv_it,
            view_inverse: *view_inverse,
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
