//! Engine Errors
//!
//! Single error type shared by all layers.

use serde::{Deserialize, Serialize};

/// Common result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level errors
///
/// `InvalidInput` is always rejected before any network dispatch.
/// `Network`/`Server` mean the remote call itself failed; the optimistic
/// change that triggered it has been rolled back when the caller sees one.
/// `Conflict` marks state that was superseded by a newer intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Network(String),
    Server(String),
    Internal(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(msg) => write!(f, "Not found: {}", msg),
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            EngineError::Network(msg) => write!(f, "Network error: {}", msg),
            EngineError::Server(msg) => write!(f, "Server error: {}", msg),
            EngineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
