//! Error types for the bricklens library.
//!
//! Structured error types that preserve context and enable proper error
//! propagation through the clustering and statistics engines. All error
//! conditions here are recoverable by the caller (retry with a different
//! pool, attribute, or configuration); none are process-fatal.

use std::io;

use thiserror::Error;

/// Main result type for bricklens operations.
pub type Result<T> = std::result::Result<T, BricklensError>;

/// Comprehensive error type for all bricklens operations.
#[derive(Error, Debug)]
pub enum BricklensError {
    /// I/O related errors (file operations, export, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Catalog ingestion errors (malformed rows, out-of-bounds values)
    #[error("Ingestion error: {message}")]
    Ingest {
        /// Error description
        message: String,
        /// CSV row where the error occurred (1-based, excluding header)
        row: Option<usize>,
    },

    /// Mathematical computation errors
    #[error("Mathematical error: {message}")]
    Math {
        /// Error description
        message: String,
        /// Context of the mathematical operation
        context: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data (empty pools, unknown set ids, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl BricklensError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new ingestion error
    pub fn ingest(message: impl Into<String>) -> Self {
        Self::Ingest {
            message: message.into(),
            row: None,
        }
    }

    /// Create a new ingestion error with row context
    pub fn ingest_at_row(message: impl Into<String>, row: usize) -> Self {
        Self::Ingest {
            message: message.into(),
            row: Some(row),
        }
    }

    /// Create a new mathematical error
    pub fn math(message: impl Into<String>) -> Self {
        Self::Math {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new mathematical error with context
    pub fn math_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Math {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }
}

// Implement From traits for common error types
impl From<io::Error> for BricklensError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_yaml::Error> for BricklensError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for BricklensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<csv::Error> for BricklensError {
    fn from(err: csv::Error) -> Self {
        Self::Ingest {
            message: format!("CSV processing failed: {err}"),
            row: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BricklensError::validation("pool is empty");
        assert_eq!(err.to_string(), "Validation error: pool is empty");

        let err = BricklensError::config_field("must be positive", "clustering.items_per_cluster");
        assert_eq!(err.to_string(), "Configuration error: must be positive");
    }

    #[test]
    fn test_ingest_error_row_context() {
        let err = BricklensError::ingest_at_row("bad price", 42);
        match err {
            BricklensError::Ingest { row, .. } => assert_eq!(row, Some(42)),
            _ => panic!("expected ingest error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: BricklensError = io_err.into();
        assert!(matches!(err, BricklensError::Io { .. }));
    }
}
