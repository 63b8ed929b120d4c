//! Error types for argument mapping

use atomflow_atom::ArgumentError;
use thiserror::Error;

/// Errors raised while mapping one call site
#[derive(Debug, Clone, Error)]
pub enum MapError {
    /// E-MAP-001: an argument record could not be interpreted
    #[error("malformed argument {position} in call to `{call}`: {source}")]
    MalformedArgument {
        call: String,
        position: usize,
        #[source]
        source: ArgumentError,
    },

    /// E-MAP-002: the call site does not name the callee it is mapped to
    #[error("call site `{call}` does not target `{callee}`")]
    CalleeMismatch { call: String, callee: String },
}

impl MapError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            MapError::MalformedArgument { .. } => "E-MAP-001",
            MapError::CalleeMismatch { .. } => "E-MAP-002",
        }
    }
}
