use std::fmt;

use crate::gl::{names, TextureTarget};

/// The four fixed unlit shader configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Cube map sampled by object direction (skyboxes, environment shells).
    Cubemap,
    /// Cube map sampled by view reflection (mirror-like surfaces).
    CubemapReflection,
    /// External OES texture (camera or video stream).
    Oes,
    /// 2D texture holding a top/bottom stereo pair.
    VerticalStereo,
}

impl VariantKind {
    /// All variants, in library order.
    pub const ALL: [Self; 4] = [
        Self::Cubemap,
        Self::CubemapReflection,
        Self::Oes,
        Self::VerticalStereo,
    ];

    /// Name used in logs and error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cubemap => "CubemapShader",
            Self::CubemapReflection => "CubemapReflectionShader",
            Self::Oes => "OesShader",
            Self::VerticalStereo => "VerticalStereoShader",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A per-vertex input a variant reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    /// `a_position`, three floats.
    Position,
    /// `a_normal`, three floats.
    Normal,
    /// `a_tex_coord`, two floats.
    TexCoord,
}

impl VertexAttribute {
    /// Identifier in the shader source.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => names::A_POSITION,
            Self::Normal => names::A_NORMAL,
            Self::TexCoord => names::A_TEX_COORD,
        }
    }

    /// Location bound before every link. Fixed across variants, so one
    /// vertex array object serves all of them.
    #[must_use]
    pub const fn location(self) -> u32 {
        match self {
            Self::Position => 0,
            Self::TexCoord => 1,
            Self::Normal => 2,
        }
    }

    /// Floats per vertex.
    #[must_use]
    pub const fn components(self) -> i32 {
        match self {
            Self::Position | Self::Normal => 3,
            Self::TexCoord => 2,
        }
    }
}

/// A per-draw input a variant reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    /// `u_model`
    Model,
    /// `u_mv`
    ModelView,
    /// `u_mv_it`
    ModelViewInverseTranspose,
    /// `u_mvp`
    ModelViewProjection,
    /// `u_view_i`
    ViewInverse,
    /// `u_texture`, the main texture's sampler.
    Texture,
    /// `u_color`
    Color,
    /// `u_opacity`
    Opacity,
    /// `u_right`, the stereo eye selector.
    Right,
}

impl UniformSlot {
    /// Identifier in the shader source.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Model => names::U_MODEL,
            Self::ModelView => names::U_MV,
            Self::ModelViewInverseTranspose => names::U_MV_IT,
            Self::ModelViewProjection => names::U_MVP,
            Self::ViewInverse => names::U_VIEW_I,
            Self::Texture => names::U_TEXTURE,
            Self::Color => names::U_COLOR,
            Self::Opacity => names::U_OPACITY,
            Self::Right => names::U_RIGHT,
        }
    }
}

/// Everything that distinguishes one variant from another.
#[derive(Debug)]
pub struct VariantDescriptor {
    /// Which variant this describes.
    pub kind: VariantKind,
    /// GLSL ES vertex stage.
    pub vertex_source: &'static str,
    /// GLSL ES fragment stage.
    pub fragment_source: &'static str,
    /// The only texture target the variant accepts.
    pub required_target: TextureTarget,
    /// Vertex inputs, bound in this order.
    pub attributes: &'static [VertexAttribute],
    /// Uniforms, uploaded in this order.
    pub uniforms: &'static [UniformSlot],
}
