//! Error types for domainqa.
//!
//! Library crates use [`DomainQaError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Answer quality problems are not errors; see [`crate::quality`].

use std::path::PathBuf;

/// Top-level error type for all domainqa operations.
#[derive(Debug, thiserror::Error)]
pub enum DomainQaError {
    /// Configuration loading or adapter construction error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input validation error (malformed request or draft file).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The external retrieval/generation service failed.
    #[error("generation error: {0}")]
    Generation(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON/TOML (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DomainQaError>;

impl DomainQaError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for DomainQaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DomainQaError::config("key_concepts must not be empty");
        assert_eq!(err.to_string(), "config error: key_concepts must not be empty");

        let err = DomainQaError::Generation("upstream timed out".into());
        assert!(err.to_string().contains("upstream timed out"));
    }

    #[test]
    fn json_errors_convert() {
        let err: DomainQaError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DomainQaError::Serialization(_)));
    }
}
