//! Error types for helpdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for helpdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while editing, parsing or generating documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Invocation preconditions were not met (no selection, empty prompt).
    #[error("{0}")]
    Validation(String),

    /// The generation service rejected the request as unauthenticated.
    #[error("Not authenticated")]
    Auth,

    /// The generation service answered with a non-success status.
    #[error("Generation service error ({status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Message from the `{error}` body, or the raw body
        message: String,
    },

    /// Network failure while sending the request or reading the stream.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The generation request did not finish within the configured timeout.
    #[error("Generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// A document violates a structural invariant.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A color string could not be parsed as hex RGB.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An image operation was applied to a node that is not an image.
    #[error("Node is not an image: {0}")]
    NotAnImage(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether this error is reported to the user as a generic failure.
    pub fn is_transport_like(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Timeout(_) | Error::Cancelled | Error::Service { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("no text selected");
        assert_eq!(err.to_string(), "no text selected");

        let err = Error::Service {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Generation service error (500): boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_transport_like() {
        assert!(Error::Transport("reset".into()).is_transport_like());
        assert!(Error::Cancelled.is_transport_like());
        assert!(!Error::Auth.is_transport_like());
        assert!(!Error::validation("x").is_transport_like());
    }
}
