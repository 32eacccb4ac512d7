//! Configuration store error types

use std::path::PathBuf;

use confstore_format::FormatError;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Lookup of an absent key
    #[error("Unknown configuration key: {key}")]
    KeyNotFound { key: String },

    /// Empty key or a value rejected by the store's own rules
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A caller-supplied validator rejected a value or its key was missing
    #[error("Validation failed for key {key}: {message}")]
    ValidationFailed { key: String, message: String },

    /// File extension does not select a persistence format
    #[error("Unsupported config file format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// A configuration document or backup could not be read or written
    #[error("Failed to {operation} configuration file {path}: {source}")]
    IoError {
        path: PathBuf,
        operation: IoOperation,
        source: std::io::Error,
    },

    /// Configuration document could not be parsed or encoded
    #[error("Failed to process {path} as {format}: {message}")]
    ParseError {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Unknown environment preset
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// Codec failure
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// What the store was doing with a file when IO failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    /// Loading a full or partial document
    Read,
    /// Saving a full or partial document
    Write,
    /// Writing a JSON backup
    Backup,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IoOperation::Read => "load",
            IoOperation::Write => "save",
            IoOperation::Backup => "back up",
        })
    }
}

impl StoreError {
    pub fn key_not_found(key: impl Into<String>) -> Self {
        StoreError::KeyNotFound { key: key.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn validation_failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::ValidationFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(path: PathBuf, extension: impl Into<String>) -> Self {
        StoreError::UnsupportedFormat {
            path,
            extension: extension.into(),
        }
    }

    pub fn io_error(path: PathBuf, operation: IoOperation, source: std::io::Error) -> Self {
        StoreError::IoError {
            path,
            operation,
            source,
        }
    }

    pub fn parse_error(
        path: PathBuf,
        format: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StoreError::ParseError {
            path,
            format: format.into(),
            message: message.into(),
        }
    }

    /// Whether this is a missing-key error
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, StoreError::KeyNotFound { .. })
    }
}
