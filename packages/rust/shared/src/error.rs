//! Error types for PassageForge.
//!
//! Library crates use [`PassageForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all PassageForge operations.
#[derive(Debug, thiserror::Error)]
pub enum PassageForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Data validation error (missing question, empty input, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// PDF-to-markdown conversion error (external converter subprocess).
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Embedding service error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vector store error (upsert or query).
    #[error("vector store error: {0}")]
    VectorStore(String),

    /// Generative model error.
    #[error("generation error: {0}")]
    Generation(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PassageForgeError>;

impl PassageForgeError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PassageForgeError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = PassageForgeError::validation("question is required");
        assert!(err.to_string().contains("question is required"));
    }

    #[test]
    fn boundary_errors_carry_context() {
        let err = PassageForgeError::Embedding("docs1 unit 3: HTTP 503".into());
        assert!(err.to_string().contains("docs1 unit 3"));
    }
}
