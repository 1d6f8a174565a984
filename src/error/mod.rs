//! Error types and handlers for identity and catalog operations

pub mod handlers;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublishError>;

#[derive(Debug, Error)]
pub enum PublishError {
    /// Transport level failures (connect, timeout, interrupted body)
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status returned by a service
    #[error("HTTP error during {context} (status {status}): {message}")]
    Http {
        status: u16,
        context: String,
        message: String,
    },
    /// Disk artifact and other file errors
    #[error("IO error at {}: {message}", .path.display())]
    Io { message: String, path: PathBuf },
    /// Response bodies that don't match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
    /// Invalid configuration values
    #[error("Validation error: {0}")]
    Validation(String),
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PublishError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        PublishError::Io {
            message: err.to_string(),
            path: path.into(),
        }
    }

    /// Status code carried by an HTTP failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io {
            message: err.to_string(),
            path: PathBuf::new(),
        }
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Network(err.to_string())
    }
}

impl From<url::ParseError> for PublishError {
    fn from(err: url::ParseError) -> Self {
        PublishError::Validation(err.to_string())
    }
}
