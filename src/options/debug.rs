use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bounds of [`DebugOptions::max_reported_errors`].
pub const MAX_REPORTED_ERRORS_RANGE: RangeInclusive<usize> = 1..=64;

/// GL error reporting after each draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Drain and log `glGetError` after every draw.
    #[schemars(title = "Check GL Errors")]
    pub check_gl_errors: bool,
    /// Upper bound on error codes drained per draw.
    #[schemars(title = "Max Reported Errors", range(min = 1, max = 64))]
    pub max_reported_errors: usize,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            check_gl_errors: true,
            max_reported_errors: 16,
        }
    }
}
