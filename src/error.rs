//! Error types for schema loading, conversion and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or building a schema definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Definition errors (exit code 2)
    #[error("invalid schema definition at {path}: {message}")]
    InvalidDefinition { path: String, message: String },

    #[error("unknown type \"{name}\" at {path}")]
    UnknownType { path: String, name: String },

    #[error("array schema at {path} has no items schema")]
    MissingItems { path: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchemaError::FileNotFound { .. } | SchemaError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            SchemaError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while converting identifier strings into native ObjectIds.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid ObjectId {value:?} at {path}: {source}")]
    InvalidObjectId {
        path: String,
        value: String,
        #[source]
        source: ObjectIdError,
    },

    /// An ObjectId location holds something other than a hex string, a
    /// native ObjectId, or null. Null is not an error: it passes through.
    #[error("expected ObjectId or hex string at {path}, got {actual}")]
    UnexpectedType { path: String, actual: String },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Errors parsing the textual form of an ObjectId.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    #[error("expected 24 hex characters, got {length}")]
    InvalidLength { length: usize },

    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<Violation> },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Schema(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }

    /// Violations reported by the validator, empty for schema errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidateError::Invalid { errors } => errors,
            ValidateError::Schema(_) => &[],
        }
    }
}

/// Single validation violation with path context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
