//! Format error types

use thiserror::Error;

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors raised while encoding or decoding a value tree
#[derive(Debug, Error)]
pub enum FormatError {
    /// Unknown format name or no codec registered for a format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Encoded output was not valid UTF-8
    #[error("Encoded output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// NaN or infinite float in output that has no spelling for it
    #[error("Cannot encode non-finite float at '{path}' as JSON")]
    NonFiniteFloat { path: String },

    /// Writing encoded output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Create an unsupported format error
    pub fn unsupported(name: impl Into<String>) -> Self {
        FormatError::UnsupportedFormat(name.into())
    }

    pub fn non_finite(path: impl Into<String>) -> Self {
        FormatError::NonFiniteFloat { path: path.into() }
    }
}
