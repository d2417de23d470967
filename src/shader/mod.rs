//! Unlit shader variants.
//!
//! Every variant is a [`ShaderVariant`] built from a static
//! [`VariantDescriptor`]; the typed wrappers ([`CubemapShader`],
//! [`CubemapReflectionShader`], [`OesShader`], [`VerticalStereoShader`]) only
//! add the `render` signature that names the matrices each one needs.
//! [`ShaderLibrary`] builds all four and routes a [`DrawRequest`].
//!
//! A draw always runs the same steps: check the main texture's target, use
//! the program, bind vertex data, upload uniforms, draw indexed triangles,
//! then drain GL errors.

mod binding;
pub mod cubemap;
pub mod cubemap_reflection;
mod descriptor;
mod library;
pub mod oes;
pub mod stage;
mod uniforms;
mod variant;
pub mod vertical_stereo;

pub use cubemap::CubemapShader;
pub use cubemap_reflection::CubemapReflectionShader;
pub use descriptor::{UniformSlot, VariantDescriptor, VariantKind, VertexAttribute};
pub use library::{DrawRequest, ShaderLibrary};
pub use oes::OesShader;
pub use uniforms::{DrawTransforms, ExtraUniform};
pub use variant::{DrawReport, ShaderVariant};
pub use vertical_stereo::VerticalStereoShader;
