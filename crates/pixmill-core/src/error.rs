//! Error types for pixmill-core operations.
//!
//! Only *recoverable* conditions are represented here. Passing out-of-bounds
//! coordinates to the pixel accessors is a programming error and is caught by
//! debug assertions (and slice bounds checks) instead.
//!
//! # Usage
//!
//! ```rust
//! use pixmill_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, w: u32, h: u32) -> Result<()> {
//!     if x + w > 64 || y + h > 64 {
//!         return Err(Error::out_of_range(x, y, w, h, (64, 64)));
//!     }
//!     Ok(())
//! }
//! assert!(check(60, 0, 8, 8).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by image buffer, view and comparison operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A requested view or rectangle is not contained in the source image.
    #[error("region ({x}, {y}, {width}x{height}) out of range for image {image_width}x{image_height}")]
    OutOfRange {
        /// Region X origin
        x: u32,
        /// Region Y origin
        y: u32,
        /// Region width
        width: u32,
        /// Region height
        height: u32,
        /// Source image width
        image_width: u32,
        /// Source image height
        image_height: u32,
    },

    /// Two images that must share a shape do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// Pixel data does not match the declared dimensions.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Two type-erased images carry different pixel formats.
    #[error("pixel format mismatch: expected {expected}, got {got}")]
    FormatMismatch {
        /// Format of the first operand
        expected: &'static str,
        /// Format of the second operand
        got: &'static str,
    },
}

impl Error {
    /// Creates an [`Error::OutOfRange`] error.
    #[inline]
    pub fn out_of_range(x: u32, y: u32, width: u32, height: u32, image: (u32, u32)) -> Self {
        Self::OutOfRange {
            x,
            y,
            width,
            height,
            image_width: image.0,
            image_height: image.1,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::FormatMismatch`] error.
    #[inline]
    pub fn format_mismatch(expected: &'static str, got: &'static str) -> Self {
        Self::FormatMismatch { expected, got }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
