//! Error types for image output.
//!
//! Encoders report every failure through one error kind,
//! [`ImageWriterError`], which carries a human-readable message. The save
//! functions add [`IoError::UnknownFormat`] for filenames whose type cannot
//! be resolved.

use std::io;
use thiserror::Error;

/// Result type for save and encode operations.
pub type IoResult<T> = Result<T, IoError>;

/// Failure raised by an encoder: unsupported pixel format, invalid palette
/// or options, or an I/O error while writing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ImageWriterError {
    message: String,
}

impl ImageWriterError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message passed to [`ImageWriterError::new`].
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for ImageWriterError {
    fn from(err: io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors returned by the save functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// No type was given and none could be derived from the filename.
    #[error("could not deduce image type from filename '{filename}'")]
    UnknownFormat {
        /// The filename that failed to resolve
        filename: String,
    },

    /// The encoder failed.
    #[error(transparent)]
    Encode(#[from] ImageWriterError),
}

impl From<io::Error> for IoError {
    fn from(err: io::Error) -> Self {
        IoError::Encode(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_error_message() {
        let err = ImageWriterError::new("bad palette");
        assert_eq!(err.message(), "bad palette");
        assert_eq!(IoError::from(err).to_string(), "bad palette");
    }

    #[test]
    fn test_io_error_becomes_encode() {
        let err = IoError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(err, IoError::Encode(ref e) if e.message() == "denied"));
    }
}
