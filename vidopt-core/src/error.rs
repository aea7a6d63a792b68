//! Error types for the vidopt library.
//!
//! The frame boundary has a deliberately narrow taxonomy: callers either hand
//! over a well-formed 3-channel raster or get [`Error::InvalidInput`] back.

use thiserror::Error;

/// Main error type for the vidopt library.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied buffer could not be marshaled into a raster frame.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two frames that must share a shape do not.
    #[error("Dimension mismatch: reference {reference}, distorted {distorted}")]
    DimensionMismatch {
        reference: String,
        distorted: String,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Check if this error was raised at the marshaling boundary.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Result type alias for vidopt operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("Input array must be 3-dimensional");
        assert_eq!(
            err.to_string(),
            "Invalid input: Input array must be 3-dimensional"
        );

        let err = Error::DimensionMismatch {
            reference: "64x64".into(),
            distorted: "32x32".into(),
        };
        assert!(err.to_string().contains("64x64"));
    }

    #[test]
    fn test_is_invalid_input() {
        assert!(Error::invalid_input("bad").is_invalid_input());
        assert!(!Error::Config("bad".into()).is_invalid_input());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
