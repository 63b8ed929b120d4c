//! Error types for atom loading and argument validation

use std::path::PathBuf;
use thiserror::Error;

/// A call argument whose raw record cannot be turned into an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("argument has no node type")]
    MissingNodeType,

    #[error("member expression without object/property: `{code}`")]
    IncompleteMember { code: String },

    #[error("identifier argument without a name")]
    MissingName,

    #[error("call expression without callee: `{code}`")]
    MissingCallee { code: String },

    #[error("spread element without a source: `{code}`")]
    MissingSpreadSource { code: String },
}

impl ArgumentError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            ArgumentError::MissingNodeType => "E-ARG-001",
            ArgumentError::IncompleteMember { .. } => "E-ARG-002",
            ArgumentError::MissingName => "E-ARG-003",
            ArgumentError::MissingCallee { .. } => "E-ARG-004",
            ArgumentError::MissingSpreadSource { .. } => "E-ARG-005",
        }
    }
}

/// Errors from reading atom JSON produced by the parser
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid atom JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("duplicate atom id: {id}")]
    DuplicateId { id: String },
}
