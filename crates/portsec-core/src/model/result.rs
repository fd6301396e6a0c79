use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Outcome of every command-executing session operation.
///
/// Always produced, never an error: failures arrive as `success: false`
/// with a readable `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
}

impl ExecutionResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    /// Failure result carrying any partial sequence output ahead of the
    /// error message.
    pub fn from_error(err: &CoreError) -> Self {
        match err.partial_output() {
            Some(partial) => Self::failure(format!("{partial}\n{err}")),
            None => Self::failure(err.to_string()),
        }
    }
}
