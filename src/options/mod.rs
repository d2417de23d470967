//! Shader configuration with TOML support.
//!
//! Options are fixed for a variant's lifetime: they are read once when the
//! variant is built. Every sub-struct uses `#[serde(default)]` so partial
//! files (e.g. only `[debug]`) work.

mod binding;
mod debug;

use std::path::Path;

pub use binding::{BindingOptions, BindingStrategy, MAX_TEXTURE_UNIT};
pub use debug::{DebugOptions, MAX_REPORTED_ERRORS_RANGE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ShaderError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ShaderOptions {
    /// How vertex data and textures reach the program.
    pub binding: BindingOptions,
    /// GL error reporting.
    pub debug: DebugOptions,
}

impl ShaderOptions {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ShaderOptions)
    }

    /// The JSON Schema as pretty-printed text, for tooling.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::OptionsParse`] if serialization fails.
    pub fn json_schema_string() -> Result<String, ShaderError> {
        serde_json::to_string_pretty(&Self::json_schema())
            .map_err(|e| ShaderError::OptionsParse(e.to_string()))
    }

    /// Check every value against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::InvalidOptions`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), ShaderError> {
        if self.binding.texture_unit > MAX_TEXTURE_UNIT {
            return Err(ShaderError::InvalidOptions(format!(
                "binding.texture_unit = {} exceeds {MAX_TEXTURE_UNIT}",
                self.binding.texture_unit
            )));
        }
        if !MAX_REPORTED_ERRORS_RANGE.contains(&self.debug.max_reported_errors)
        {
            return Err(ShaderError::InvalidOptions(format!(
                "debug.max_reported_errors = {} outside {}..={}",
                self.debug.max_reported_errors,
                MAX_REPORTED_ERRORS_RANGE.start(),
                MAX_REPORTED_ERRORS_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::OptionsParse`] on malformed TOML and
    /// [`ShaderError::InvalidOptions`] for out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self, ShaderError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| ShaderError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Io`] if the file cannot be read, otherwise
    /// whatever [`from_toml_str`](Self::from_toml_str) returns.
    pub fn load(path: &Path) -> Result<Self, ShaderError> {
        let content = std::fs::read_to_string(path).map_err(ShaderError::Io)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("Loaded shader options from '{}'", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::OptionsParse`] if serialization fails and
    /// [`ShaderError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ShaderError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShaderError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ShaderError::Io)?;
        }
        std::fs::write(path, content).map_err(ShaderError::Io)
    }
}
