//! The encoder capability.
//!
//! An [`ImageEncoder`] turns a type-erased view into bytes for one file
//! format. The registry picks the encoder from the type string's format
//! name; the encoder reads any further options from the [`FormatSpec`].

use crate::{FormatSpec, ImageWriterError, RgbaPalette};
use pixmill_core::alpha::demultiply_alpha;
use pixmill_core::{AnyView, Image, ImageView, PixelKind, Rgba8};
use std::io::Write;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Encodes images into one file format.
///
/// Implement this to plug a format (PDF, SVG, PostScript, ...) into an
/// [`EncoderRegistry`](crate::EncoderRegistry).
///
/// ```rust
/// use std::io::Write;
/// use pixmill_core::AnyView;
/// use pixmill_io::{FormatSpec, ImageEncoder, ImageWriterError, RgbaPalette};
///
/// /// Writes the image size as text.
/// struct SizeEncoder;
///
/// impl ImageEncoder for SizeEncoder {
///     fn name(&self) -> &'static str {
///         "size"
///     }
///
///     fn encode(
///         &self,
///         view: &AnyView<'_>,
///         _spec: &FormatSpec,
///         _palette: Option<&RgbaPalette>,
///         out: &mut dyn Write,
///     ) -> Result<(), ImageWriterError> {
///         write!(out, "{}x{}", view.width(), view.height())?;
///         Ok(())
///     }
/// }
/// ```
pub trait ImageEncoder: Send + Sync {
    /// Canonical format name this encoder is registered under.
    fn name(&self) -> &'static str;

    /// Whether [`encode`](Self::encode) accepts a palette.
    fn supports_palette(&self) -> bool {
        false
    }

    /// Writes `view` to `out`.
    ///
    /// `palette` is only passed when [`supports_palette`](Self::supports_palette)
    /// returns `true`.
    ///
    /// # Errors
    ///
    /// Any failure, including unsupported pixel formats and write errors.
    fn encode(
        &self,
        view: &AnyView<'_>,
        spec: &FormatSpec,
        palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> Result<(), ImageWriterError>;
}

/// Error for a pixel format an encoder cannot write.
pub fn unsupported_pixel_kind(encoder: &str, kind: PixelKind) -> ImageWriterError {
    ImageWriterError::new(format!("{encoder} encoder does not support {kind} images"))
}

/// Copies an RGBA8 view into a contiguous straight-alpha image.
///
/// Encoders write straight alpha; premultiplied input is demultiplied on
/// the copy and the source is left untouched.
pub fn straight_rgba(view: &ImageView<'_, Rgba8>) -> Image<Rgba8> {
    let mut image = view.to_image();
    if demultiply_alpha(&mut image) {
        debug!(
            width = image.width(),
            height = image.height(),
            "demultiplied premultiplied input for encoding"
        );
    }
    image
}

/// Reduces a 16-bit sample to 8 bits with rounding.
#[inline]
pub fn gray16_to_gray8(v: u16) -> u8 {
    ((v as u32 + 128) / 257) as u8
}

/// Drops the alpha channel of packed RGBA bytes.
pub fn rgba_to_rgb(rgba: &[[u8; 4]]) -> Vec<u8> {
    rgba.iter().flat_map(|px| [px[0], px[1], px[2]]).collect()
}
