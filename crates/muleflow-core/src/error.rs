//! Error types for muleflow.

use thiserror::Error;

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur around the analysis engine.
///
/// The analysis core itself is total: `analyze` never fails. These errors
/// belong to the collaborator-facing surfaces — input validation performed
/// by parsers, configuration loading, and report serialization.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A transaction row failed validation and was rejected by the caller.
    #[error("Invalid input row: {0}")]
    InvalidInputRow(String),

    /// No transactions survived parsing; there is nothing to analyze.
    #[error("Empty analysis: no valid transactions")]
    EmptyAnalysis,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    /// Create an invalid-input-row error.
    #[must_use]
    pub fn invalid_row(msg: impl Into<String>) -> Self {
        EngineError::InvalidInputRow(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::ConfigError(msg.into())
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        EngineError::SerializationError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::InternalError(msg.into())
    }

    /// Returns true if this error is recoverable by skipping the offending
    /// input and continuing.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidInputRow(_))
    }
}
