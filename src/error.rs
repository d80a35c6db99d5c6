//! Error types for dnode ingestion, validation and storage.

use crate::record::Field;
use thiserror::Error;

/// A raw field value failed its coercion or validator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Text fields must decode as UTF-8. Paths never produce this.
    #[error("field `{field}` is not valid UTF-8: {source}")]
    Encoding {
        field: Field,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("field `{field}` is not a non-negative integer: {raw:?}")]
    InvalidInteger { field: Field, raw: String },

    #[error("field `{field}` is not a number: {raw:?}")]
    InvalidFloat { field: Field, raw: String },

    #[error("field `{field}` must be finite, got {value}")]
    NotFinite { field: Field, value: f64 },

    #[error("field `{field}` contains a NUL byte at offset {offset}")]
    NulByte { field: Field, offset: usize },

    #[error("required field `{field}` cannot be absent")]
    Missing { field: Field },
}

impl ValidationError {
    /// The field whose value was rejected.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Encoding { field, .. }
            | ValidationError::InvalidInteger { field, .. }
            | ValidationError::InvalidFloat { field, .. }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::NulByte { field, .. }
            | ValidationError::Missing { field } => *field,
        }
    }
}

/// The line sequence broke the boundary/property ordering contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("line {line}: property line with no open record")]
    PropertyBeforeBoundary { line: usize },

    #[error("line {line}: malformed boundary line: {reason}")]
    MalformedBoundary { line: usize, reason: String },

    #[error("line {line}: malformed property line: {reason}")]
    MalformedProperty { line: usize, reason: String },
}

/// Errors surfaced while turning a line sequence into records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("line {line}: {source}")]
    Validation {
        line: usize,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Line number the error refers to, when it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            IngestError::Validation { line, .. } => Some(*line),
            IngestError::Protocol(ProtocolError::PropertyBeforeBoundary { line })
            | IngestError::Protocol(ProtocolError::MalformedBoundary { line, .. })
            | IngestError::Protocol(ProtocolError::MalformedProperty { line, .. }) => Some(*line),
            IngestError::Io(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("corrupt store entry: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level error for the pipeline, configuration and CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
