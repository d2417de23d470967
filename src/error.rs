//! Crate-level error types.

use std::fmt;

use crate::gl::{LinkError, TextureTarget};
use crate::shader::VariantKind;

/// Errors produced by shader construction, rendering and option loading.
#[derive(Debug)]
pub enum ShaderError {
    /// Program creation, compilation or linking failed while building a
    /// variant.
    Link {
        /// Variant whose program failed.
        variant: VariantKind,
        /// Failure reported by the program wrapper.
        error: LinkError,
    },
    /// The material's main texture has a target the variant cannot sample.
    InvalidTextureTarget {
        /// Variant that rejected the draw.
        variant: VariantKind,
        /// Target the variant samples.
        expected: TextureTarget,
        /// Target of the texture it was handed.
        actual: TextureTarget,
    },
    /// The material carries no main texture.
    MissingTexture {
        /// Variant that rejected the draw.
        variant: VariantKind,
    },
    /// `render` was called after the variant released its program.
    Recycled {
        /// Variant that was recycled.
        variant: VariantKind,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML/JSON options parsing or serialization failure.
    OptionsParse(String),
    /// An option value outside its documented range.
    InvalidOptions(String),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link { variant, error } => {
                write!(f, "{variant}: program build failed: {error}")
            }
            Self::InvalidTextureTarget {
                variant,
                expected,
                actual,
            } => write!(
                f,
                "{variant}::render : texture with wrong target (expected \
                 {expected}, got {actual})"
            ),
            Self::MissingTexture { variant } => {
                write!(f, "{variant}::render : material has no main texture")
            }
            Self::Recycled { variant } => {
                write!(f, "{variant}::render : program already recycled")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Link { error, .. } => Some(error),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ShaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{LinkStage, ShaderStage};

    #[test]
    fn wrong_target_message_names_both_targets() {
        let err = ShaderError::InvalidTextureTarget {
            variant: VariantKind::Cubemap,
            expected: TextureTarget::CubeMap,
            actual: TextureTarget::Texture2D,
        };
        let msg = err.to_string();
        assert!(msg.contains("wrong target"));
        assert!(msg.contains("GL_TEXTURE_CUBE_MAP"));
        assert!(msg.contains("GL_TEXTURE_2D"));
    }

    #[test]
    fn link_error_is_the_source() {
        let err = ShaderError::Link {
            variant: VariantKind::Oes,
            error: LinkError::new(
                LinkStage::Compile(ShaderStage::Fragment),
                "0:1: extension not supported",
            ),
        };
        let source = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(source.contains("extension not supported"));
    }
}
