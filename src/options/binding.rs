use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a variant hands vertex data to its program.
///
/// Both strategies produce the same draw; they differ only in where the
/// attribute and index data live.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BindingStrategy {
    /// Bind the mesh's prepared vertex array object (GL ES 3). Meshes
    /// without one fall back to client arrays.
    #[default]
    VertexArray,
    /// Pass attribute and index arrays with every draw (GL ES 2).
    ClientArrays,
}

/// Highest texture unit GL ES guarantees a fragment shader can sample.
pub const MAX_TEXTURE_UNIT: u32 = 31;

/// Vertex and texture binding options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Binding", inline)]
#[serde(default)]
pub struct BindingOptions {
    /// Vertex attribute binding strategy.
    #[schemars(title = "Strategy")]
    pub strategy: BindingStrategy,
    /// Texture unit the main texture is bound to; the sampler uniform is
    /// set to the same index.
    #[schemars(title = "Texture Unit", range(max = 31))]
    pub texture_unit: u32,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            strategy: BindingStrategy::VertexArray,
            texture_unit: 0,
        }
    }
}
