//! # pixmill-ops
//!
//! Raster operations over [`pixmill_core`] images.
//!
//! # Modules
//!
//! - [`composite`] - SVG compositing operators, per pixel and per image
//! - [`alpha`] - opacity, luminance-to-alpha and color-key masks
//! - [`region`] - fill, clipped blits, views and the debug border
//! - [`compare`] - pixel difference counting and solid-color detection
//!
//! # Example
//!
//! ```rust
//! use pixmill_core::{Color, Image, Rgba8};
//! use pixmill_ops::{composite::composite_pixel, region::fill_color, CompOp};
//!
//! let mut canvas: Image<Rgba8> = Image::new(16, 16);
//! canvas.set_premultiplied(true);
//! fill_color(&mut canvas, Color::rgb(255, 255, 255));
//!
//! // Anti-aliased edge pixel: 40% coverage of opaque black.
//! composite_pixel(&mut canvas, CompOp::SrcOver, 3, 4, 0xff000000, 0.4, 1.0);
//! assert_eq!(canvas.pixel(3, 4), [153, 153, 153, 255]);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - use rayon for fills, comparison and solid checks

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod alpha;
pub mod compare;
pub mod composite;
pub mod region;

pub use error::{OpsError, OpsResult};
pub use composite::CompOp;
