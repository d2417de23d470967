//! Top/bottom stereo frames: the upper half of the texture is the left eye,
//! the lower half the right eye.

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
    "attribute vec2 ", gl_name!(a_tex_coord), ";\n",
    "uniform mat4 ", gl_name!(u_mvp), ";\n",
    "varying vec2 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  ", gl_name!(v_tex_coord), " = ", gl_name!(a_tex_coord), ";\n",
    "  gl_Position = ", gl_name!(u_mvp), " * ", gl_name!(a_position), ";\n",
    "}\n",
);

#[rustfmt::skip]
const FRAGMENT_SHADER: &str = concat!(
    "precision highp float;\n",
    "uniform sampler2D ", gl_name!(u_texture), ";\n",
    "uniform vec3 ", gl_name!(u_color), ";\n",
    "uniform float ", gl_name!(u_opacity), ";\n",
    "uniform int ", gl_name!(u_right), ";\n",
    "varying vec2 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  vec2 tex_coord = vec2(", gl_name!(v_tex_coord), ".x, 0.5 * (",
    gl_name!(v_tex_coord), ".y + float(", gl_name!(u_right), ")));\n",
    "  vec4 color = texture2D(", gl_name!(u_texture), ", tex_coord);\n",
    "  gl_FragColor = vec4(color.rgb * ", gl_name!(u_color), " * ",
    gl_name!(u_opacity), ", color.a * ", gl_name!(u_opacity), ");\n",
    "}\n",
);

/// Descriptor of the vertical stereo variant.
pub static DESCRIPTOR: VariantDescriptor = VariantDescriptor {
    kind: VariantKind::VerticalStereo,
    vertex_source: VERTEX_SHADER,
    fragment_source: FRAGMENT_SHADER,
    required_target: TextureTarget::Texture2D,
    attributes: &[VertexAttribute::Position, VertexAttribute::TexCoord],
    uniforms: &[
        UniformSlot::ModelViewProjection,
        UniformSlot::Texture,
        UniformSlot::Color,
        UniformSlot::Opacity,
        UniformSlot::Right,
    ],
};

/// Unlit shader selecting one eye of a vertically stacked stereo texture.
pub struct VerticalStereoShader<A: GlApi + ?Sized> {
    variant: ShaderVariant<A>,
}

impl<A: GlApi + ?Sized> VerticalStereoShader<A> {
    /// Build the program.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Link`] if the program cannot be built.
    pub fn new(api: Rc<A>, options: &ShaderOptions) -> Result<Self, ShaderError> {
        ShaderVariant::new(api, &DESCRIPTOR, options).map(|variant| Self { variant })
    }

    /// Draw `render_data` for one eye. `right == false` samples the top half.
    ///
    /// # Errors
    ///
    /// See [`ShaderVariant::draw`].
    pub fn render<R: RenderData + ?Sized>(
        &self,
        mvp: &Mat4,
        render_data: &R,
        right: bool,
    ) -> Result<DrawReport, ShaderError> {
        let transforms = DrawTransforms {
            model_view_projection: *mvp,
            ..DrawTransforms::default()
        };
        self.variant
            .draw(&transforms, ExtraUniform::Right(right), render_data)
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
