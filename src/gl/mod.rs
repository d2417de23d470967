//! GL ES command surface used by the shader variants.
//!
//! [`GlApi`] is the narrow set of calls the variants issue. Handles are
//! opaque non-zero ids, so a recycled program can never alias GL's reserved
//! `0` name.

pub mod error_check;
/// `glow`-backed implementation of [`GlApi`].
#[cfg(all(feature = "gles", not(target_arch = "wasm32")))]
pub mod glow_backend;
pub mod names;
mod program;
/// Call-recording [`GlApi`] implementation for tests and headless runs.
pub mod recording;

use std::fmt;
use std::num::NonZeroU32;

use glam::{Mat4, Vec3};

pub use program::{GlProgram, LinkError, LinkStage};
pub use recording::{DrawCall, GlCall, IndexSource, RecordingGl};

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wrap a raw, non-zero GL object name.
            #[must_use]
            pub const fn new(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            /// The raw GL object name.
            #[must_use]
            pub const fn get(self) -> NonZeroU32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

gl_handle!(
    /// A shader object (one compiled stage).
    ShaderId
);
gl_handle!(
    /// A linked program object.
    ProgramId
);
gl_handle!(
    /// A texture object.
    TextureId
);
gl_handle!(
    /// A vertex array object holding attribute and element-buffer bindings.
    VertexArrayId
);

/// A resolved uniform location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Texture binding point a sampler reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// `GL_TEXTURE_2D`
    Texture2D,
    /// `GL_TEXTURE_CUBE_MAP`
    CubeMap,
    /// `GL_TEXTURE_EXTERNAL_OES`, for camera and video streams.
    ExternalOes,
}

impl TextureTarget {
    /// The GL enum value for this target.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Texture2D => 0x0DE1,
            Self::CubeMap => 0x8513,
            Self::ExternalOes => 0x8D65,
        }
    }
}

impl fmt::Display for TextureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Texture2D => "GL_TEXTURE_2D",
            Self::CubeMap => "GL_TEXTURE_CUBE_MAP",
            Self::ExternalOes => "GL_TEXTURE_EXTERNAL_OES",
        })
    }
}

/// Programmable pipeline stage of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `GL_VERTEX_SHADER`
    Vertex,
    /// `GL_FRAGMENT_SHADER`
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// Primitive topology for element draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DrawMode {
    /// `GL_TRIANGLES`: independent triangles, three indices each.
    Triangles,
}

/// A value returned by `glGetError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlErrorCode {
    /// `GL_INVALID_ENUM`
    InvalidEnum,
    /// `GL_INVALID_VALUE`
    InvalidValue,
    /// `GL_INVALID_OPERATION`
    InvalidOperation,
    /// `GL_INVALID_FRAMEBUFFER_OPERATION`
    InvalidFramebufferOperation,
    /// `GL_OUT_OF_MEMORY`
    OutOfMemory,
    /// Any other non-zero code (vendor extensions, context loss).
    Other(u32),
}

impl GlErrorCode {
    /// Map a raw `glGetError` value. `GL_NO_ERROR` maps to `None`.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => None,
            0x0500 => Some(Self::InvalidEnum),
            0x0501 => Some(Self::InvalidValue),
            0x0502 => Some(Self::InvalidOperation),
            0x0506 => Some(Self::InvalidFramebufferOperation),
            0x0505 => Some(Self::OutOfMemory),
            other => Some(Self::Other(other)),
        }
    }

    /// The raw GL enum value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::InvalidEnum => 0x0500,
            Self::InvalidValue => 0x0501,
            Self::InvalidOperation => 0x0502,
            Self::InvalidFramebufferOperation => 0x0506,
            Self::OutOfMemory => 0x0505,
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for GlErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnum => f.write_str("GL_INVALID_ENUM"),
            Self::InvalidValue => f.write_str("GL_INVALID_VALUE"),
            Self::InvalidOperation => f.write_str("GL_INVALID_OPERATION"),
            Self::InvalidFramebufferOperation => {
                f.write_str("GL_INVALID_FRAMEBUFFER_OPERATION")
            }
            Self::OutOfMemory => f.write_str("GL_OUT_OF_MEMORY"),
            Self::Other(raw) => write!(f, "GL error 0x{raw:04X}"),
        }
    }
}

/// The GL ES calls issued by shader construction and rendering.
///
/// Methods take `&self`: a GL context is a single-threaded state machine and
/// implementations keep any bookkeeping behind interior mutability. Every
/// call must happen on the thread that owns the context.
pub trait GlApi {
    /// Create an empty shader object for `stage`.
    ///
    /// # Errors
    ///
    /// Returns the driver's message when no object could be allocated.
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    /// Replace the source of `shader`.
    fn shader_source(&self, shader: ShaderId, source: &str);
    /// Compile `shader`'s current source.
    fn compile_shader(&self, shader: ShaderId);
    /// Whether the last compile of `shader` succeeded.
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    /// The compiler log for `shader`.
    fn shader_info_log(&self, shader: ShaderId) -> String;
    /// Release `shader`.
    fn delete_shader(&self, shader: ShaderId);

    /// Create an empty program object.
    ///
    /// # Errors
    ///
    /// Returns the driver's message when no object could be allocated.
    fn create_program(&self) -> Result<ProgramId, String>;
    /// Attach a compiled shader to `program`.
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    /// Detach a shader from `program`.
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    /// Bind attribute `name` to `location`; takes effect at the next link
    /// of `program`.
    fn bind_attrib_location(&self, program: ProgramId, location: u32, name: &str);
    /// Link `program` from its attached shaders.
    fn link_program(&self, program: ProgramId);
    /// Whether the last link of `program` succeeded.
    fn program_link_status(&self, program: ProgramId) -> bool;
    /// The linker log for `program`.
    fn program_info_log(&self, program: ProgramId) -> String;
    /// Release `program`.
    fn delete_program(&self, program: ProgramId);

    /// Location of an active vertex attribute, `None` if the linker dropped
    /// or never saw it.
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32>;
    /// Location of an active uniform, `None` if absent.
    fn uniform_location(
        &self,
        program: ProgramId,
        name: &str,
    ) -> Option<UniformLocation>;

    /// Make `program` current (`None` unbinds).
    fn use_program(&self, program: Option<ProgramId>);
    /// Upload a column-major 4x4 matrix.
    fn uniform_matrix4(&self, location: UniformLocation, value: &Mat4);
    /// Upload an integer (also used for sampler units and flags).
    fn uniform_1i(&self, location: UniformLocation, value: i32);
    /// Upload a float.
    fn uniform_1f(&self, location: UniformLocation, value: f32);
    /// Upload a three-component float vector.
    fn uniform_3f(&self, location: UniformLocation, value: Vec3);

    /// Select texture unit `unit` (0-based, i.e. `GL_TEXTURE0 + unit`).
    fn active_texture(&self, unit: u32);
    /// Bind `texture` to `target` on the active unit.
    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>);

    /// Bind a vertex array object (`None` unbinds).
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>);
    /// Feed tightly packed float data to attribute `location` for the next
    /// draw, `components` floats per vertex, and enable the attribute.
    fn client_attrib_array(&self, location: u32, components: i32, data: &[f32]);
    /// Draw `count` unsigned-short indices from the element buffer of the
    /// bound vertex array.
    fn draw_elements_bound(&self, mode: DrawMode, count: usize);
    /// Draw from an index list supplied with the call.
    fn draw_elements_client(&self, mode: DrawMode, indices: &[u16]);

    /// Pop the oldest pending error flag, `None` once clear.
    fn get_error(&self) -> Option<GlErrorCode>;
}
