//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::path::NodePath;

/// Domain errors represent malformed addressing or malformed construction input.
///
/// All of them are detected before any node is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("path {path} out of range at depth {depth}: index {index}, {len} node(s) there")]
    PathOutOfRange {
        path: NodePath,
        depth: usize,
        index: usize,
        len: usize,
    },

    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("node handle does not belong to this tree")]
    StaleNode,

    #[error("internal tree operation failed: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
