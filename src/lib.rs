// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Fixed-function-style unlit shader variants for a mobile VR renderer.
//!
//! Each variant owns one compiled GL ES program, checks the texture target it
//! is handed, binds transforms, the texture unit and material uniforms, then
//! issues a single indexed triangle draw.
//!
//! # Key entry points
//!
//! - [`shader::ShaderVariant`] - the generic variant, driven by a
//!   [`shader::VariantDescriptor`]
//! - [`shader::CubemapShader`], [`shader::CubemapReflectionShader`],
//!   [`shader::OesShader`], [`shader::VerticalStereoShader`] - typed
//!   per-variant `render` entry points
//! - [`shader::ShaderLibrary`] - one instance of every variant plus
//!   [`shader::DrawRequest`] dispatch
//! - [`options::ShaderOptions`] - binding strategy, texture unit and GL error
//!   reporting, loadable from TOML
//!
//! # Architecture
//!
//! All GL traffic goes through the [`gl::GlApi`] trait. [`gl::RecordingGl`]
//! records every call and backs the test suite; the `gles` feature adds a
//! `glow` implementation for real contexts. Scene collaborators (mesh,
//! material, texture, render data) are traits in [`scene`] with simple
//! concrete implementations alongside.
//!
//! Everything here runs on the thread that owns the GL context. The context
//! handle is shared as `Rc`, so variants are neither `Send` nor `Sync`.

pub mod error;
pub mod gl;
pub mod options;
pub mod scene;
pub mod shader;

#[cfg(test)]
mod test_util;

pub use error::ShaderError;
