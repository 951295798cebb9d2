//! # pixmill-core
//!
//! Core raster types shared by the pixmill crates.
//!
//! - [`PixelType`] and the format markers [`Rgba8`], [`Gray8`], [`Gray16`],
//!   [`Gray32f`] - per-format numeric semantics
//! - [`get_pixel`] / [`set_pixel`] - typed pixel accessor with a single
//!   round-and-clamp conversion policy
//! - [`Image`], [`ImageView`], [`ImageViewMut`] - buffer and windows onto it
//! - [`AnyImage`], [`AnyView`] - closed type-erased wrappers
//! - [`alpha`] - premultiplied/straight state transitions
//! - [`Color`], [`Rect`] - small value types
//!
//! ## Crate Structure
//!
//! ```text
//! pixmill-core (this crate)
//!    ^
//!    +-- pixmill-ops (compositing, fill, compare)
//!    +-- pixmill-io  (format dispatch and encoders)
//! ```
//!
//! Buffers are not internally synchronized. Mutating one buffer from
//! several threads requires external locking, which the borrow checker
//! already demands.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod access;
pub mod alpha;
pub mod any;
pub mod color;
pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use access::{get_pixel, set_pixel, PixelBuffer, PixelBufferMut};
pub use alpha::{demultiply_alpha, premultiply_alpha, set_premultiplied_alpha};
pub use any::{AnyImage, AnyPixelValue, AnyView};
pub use color::Color;
pub use error::*;
pub use image::*;
pub use pixel::{
    pack_rgba, unpack_rgba, Gray16, Gray32f, Gray8, PixelConvert, PixelKind, PixelType, Rgba8,
    Sample,
};
pub use rect::*;

/// Prelude module for convenient imports.
///
/// ```
/// use pixmill_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::access::{get_pixel, set_pixel, PixelBuffer, PixelBufferMut};
    pub use crate::alpha::{demultiply_alpha, premultiply_alpha, set_premultiplied_alpha};
    pub use crate::any::{AnyImage, AnyPixelValue, AnyView};
    pub use crate::color::Color;
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, ImageView, ImageViewMut};
    pub use crate::pixel::{Gray16, Gray32f, Gray8, PixelConvert, PixelKind, PixelType, Rgba8};
    pub use crate::rect::Rect;
}
