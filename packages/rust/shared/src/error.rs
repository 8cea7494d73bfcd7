//! Error types for shiftscope.
//!
//! Library crates use [`ShiftscopeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all shiftscope operations.
#[derive(Debug, thiserror::Error)]
pub enum ShiftscopeError {
    /// Configuration loading or validation error. Raised before any
    /// fetching starts; never produces partial artifacts.
    #[error("config error: {message}")]
    Config { message: String },

    /// Remote API error after retries are exhausted, or a non-retryable
    /// client-side rejection.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A single-conversation run targeted an id the remote API does not know.
    #[error("conversation {id} not found")]
    NotFound { id: String },

    /// Response payload could not be decoded into the expected shape.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad date range, unknown team name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Artifact rendering/encoding error.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShiftscopeError>;

impl ShiftscopeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a fetch error from any displayable message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a render error from any displayable message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
