//! Error types for dynalias
//!
//! Provides unified error handling across the crate.
//!
//! Only structural problems are errors. Records that merely cannot be
//! interpreted (unmapped pointee, empty allocation) are absorbed by the engine
//! and show up in its statistics instead.

use crate::config::ConfigError;
use crate::features::context::ContextError;
use thiserror::Error;

/// Main error type for dynalias operations
#[derive(Debug, Error)]
pub enum DynAliasError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record framing or decoding failed; nothing after `index` can be trusted
    #[error("Malformed trace record #{index}: {message}")]
    Malformed { index: u64, message: String },

    /// Enter/Return nesting is broken
    #[error("Trace record #{index}: {source}")]
    Structural {
        index: u64,
        #[source]
        source: ContextError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Identifier table could not be loaded
    #[error("ID table error: {0}")]
    IdTable(String),

    /// Report or table (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DynAliasError {
    /// Create a malformed-record error
    pub fn malformed(index: u64, message: impl Into<String>) -> Self {
        DynAliasError::Malformed {
            index,
            message: message.into(),
        }
    }

    /// Index of the offending trace record, if the error is tied to one
    pub fn record_index(&self) -> Option<u64> {
        match self {
            DynAliasError::Malformed { index, .. } | DynAliasError::Structural { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// Whether the error means the trace itself is corrupt
    pub fn is_trace_corruption(&self) -> bool {
        self.record_index().is_some()
    }
}

impl From<serde_json::Error> for DynAliasError {
    fn from(e: serde_json::Error) -> Self {
        DynAliasError::Serialization(e.to_string())
    }
}

/// Result type alias for dynalias operations
pub type Result<T> = std::result::Result<T, DynAliasError>;
