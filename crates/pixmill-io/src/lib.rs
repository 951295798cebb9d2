//! # pixmill-io
//!
//! Image output for pixmill: resolves a type string or filename to an
//! encoder and writes images to files, byte buffers or streams.
//!
//! # Architecture
//!
//! - [`sniff`] - [`type_from_filename`] and [`guess_type`]
//! - [`FormatSpec`] - parsed type strings such as `png24` or `jpeg:quality=70`
//! - [`ImageEncoder`] - the per-format encoder capability
//! - [`EncoderRegistry`] - name to encoder table, global or user-built
//! - [`save_to_file`] / [`save_to_bytes`] / [`save_to_stream`] - dispatch
//!
//! # Quick Start
//!
//! ```rust
//! use pixmill_core::{Image, Rgba8};
//! use pixmill_io::{save_to_bytes, type_from_filename};
//!
//! let img: Image<Rgba8> = Image::filled(8, 8, [0, 128, 255, 255]);
//! let ty = type_from_filename("Tile.PNG").unwrap();
//! # #[cfg(feature = "png")]
//! let bytes = save_to_bytes(&img, ty).unwrap();
//! # #[cfg(feature = "png")]
//! assert_eq!(&bytes[1..4], b"PNG");
//! ```
//!
//! # Supported Formats
//!
//! | Format | Type strings            | Pixel formats              | Palette |
//! |--------|-------------------------|----------------------------|---------|
//! | PNG    | `png`, `png24`, `png32` | Rgba8, Gray8, Gray16       | Yes     |
//! | JPEG   | `jpeg`, `jpeg85`, `jpg` | Rgba8, Gray8, Gray16       | No      |
//! | TIFF   | `tiff`, `tif`           | all                        | No      |
//! | WebP   | `webp`                  | Rgba8, Gray8, Gray16       | No      |
//!
//! PDF, SVG and PostScript are recognised by the sniffer but have no
//! built-in encoder; register one on an [`EncoderRegistry`].
//!
//! # Feature Flags
//!
//! - `png` - PNG encoder (default)
//! - `jpeg` - JPEG encoder (default)
//! - `tiff` - TIFF encoder (default)
//! - `webp` - lossless WebP encoder via the `image` crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod encoder;
mod error;
mod format;
mod palette;
mod registry;
mod save;
pub mod sniff;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

#[cfg(feature = "tiff")]
pub mod tiff;

#[cfg(feature = "webp")]
pub mod webp;

pub use encoder::{gray16_to_gray8, straight_rgba, unsupported_pixel_kind, ImageEncoder};
pub use error::{ImageWriterError, IoError, IoResult};
pub use format::FormatSpec;
pub use palette::{RgbaPalette, MAX_PALETTE_SIZE};
pub use registry::EncoderRegistry;
pub use save::{
    save_to_bytes, save_to_bytes_with_palette, save_to_file, save_to_file_as,
    save_to_file_with_palette, save_to_stream, save_to_stream_with_palette, view_to_bytes,
    write_view_raw,
};
pub use sniff::{guess_type, type_from_filename};
