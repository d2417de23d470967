//! External (OES) textures such as camera or video frames.

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
    "#extension GL_OES_EGL_image_external : require\n",
    "precision mediump float;\n",
    "uniform samplerExternalOES ", gl_name!(u_texture), ";\n",
    "uniform vec3 ", gl_name!(u_color), ";\n",
    "uniform float ", gl_name!(u_opacity), ";\n",
    "varying vec2 ", gl_name!(v_tex_coord), ";\n",
    "void main() {\n",
    "  vec4 color = texture2D(", gl_name!(u_texture), ", ",
    gl_name!(v_tex_coord), ");\n",
    "  gl_FragColor = vec4(color.rgb * ", gl_name!(u_color), " * ",
    gl_name!(u_opacity), ", color.a * ", gl_name!(u_opacity), ");\n",
    "}\n",
);

/// Descriptor of the external texture variant.
pub static DESCRIPTOR: VariantDescriptor = VariantDescriptor {
    kind: VariantKind::Oes,
    vertex_source: VERTEX_SHADER,
    fragment_source: FRAGMENT_SHADER,
    required_target: TextureTarget::ExternalOes,
    attributes: &[VertexAttribute::Position, VertexAttribute::TexCoord],
    uniforms: &[
        UniformSlot::ModelViewProjection,
        UniformSlot::Texture,
        UniformSlot::Color,
        UniformSlot::Opacity,
    ],
};

/// Unlit shader for `GL_TEXTURE_EXTERNAL_OES` textures.
pub struct OesShader<A: GlApi + ?Sized> {
    variant: ShaderVariant<A>,
}

impl<A: GlApi + ?Sized> OesShader<A> {
    /// Build the program.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Link`] if the program cannot be built, which
    /// includes drivers without `GL_OES_EGL_image_external`.
    pub fn new(api: Rc<A>, options: &ShaderOptions) -> Result<Self, ShaderError> {
        ShaderVariant::new(api, &DESCRIPTOR, options).map(|variant| Self { variant })
    }

    /// Draw `render_data`, whose main texture must be external.
    ///
    /// # Errors
    ///
    /// See [`ShaderVariant::draw`].
    pub fn render<R: RenderData + ?Sized>(
        &self,
        mvp: &Mat4,
        render_data: &R,
    ) -> Result<DrawReport, ShaderError> {
        let transforms = DrawTransforms {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, LinkStage, RecordingGl, ShaderStage};
    use crate::test_util;

    #[test]
    fn fragment_source_requires_extension() {
        assert!(FRAGMENT_SHADER
            .starts_with("#extension GL_OES_EGL_image_external : require\n"));
        assert!(FRAGMENT_SHADER.contains("samplerExternalOES u_texture;"));
    }

    #[test]
    fn binds_external_target() {
        let gl = Rc::new(RecordingGl::new());
        let shader = OesShader::new(Rc::clone(&gl), &ShaderOptions::default())
            .unwrap();
        gl.clear_calls();
        let fixture = test_util::quad_fixture(TextureTarget::ExternalOes);

        let report = shader.render(&Mat4::IDENTITY, &fixture.item()).unwrap();

        assert_eq!(report.index_count, 6);
        assert!(gl.calls().contains(&GlCall::BindTexture {
            target: TextureTarget::ExternalOes,
            texture: Some(fixture.texture.id),
        }));
    }

    #[test]
    fn rejects_cube_map() {
        let gl = Rc::new(RecordingGl::new());
        let shader = OesShader::new(Rc::clone(&gl), &ShaderOptions::default())
            .unwrap();
        let fixture = test_util::quad_fixture(TextureTarget::CubeMap);

        let err = shader
            .render(&Mat4::IDENTITY, &fixture.item())
            .err()
            .unwrap();

        assert_eq!(
            err.to_string(),
            "OesShader::render : texture with wrong target \
             (expected GL_TEXTURE_EXTERNAL_OES, got GL_TEXTURE_CUBE_MAP)"
        );
    }

    #[test]
    fn compile_failure_leaks_nothing() {
        let gl = Rc::new(RecordingGl::new());
        gl.fail_compile(ShaderStage::Fragment);

        let err = OesShader::new(Rc::clone(&gl), &ShaderOptions::default())
            .err()
            .unwrap();

        match err {
            ShaderError::Link { variant, error } => {
                assert_eq!(variant, VariantKind::Oes);
                assert_eq!(error.stage, LinkStage::Compile(ShaderStage::Fragment));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_shaders(), 0);
    }
}
