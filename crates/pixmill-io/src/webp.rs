//! WebP output via the `image` crate.
//!
//! The encoder is lossless only; quality options are ignored.

use crate::encoder::{gray16_to_gray8, straight_rgba, unsupported_pixel_kind};
use crate::{FormatSpec, ImageEncoder, ImageWriterError, RgbaPalette};
use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use pixmill_core::AnyView;
use std::io::Write;
use tracing::trace;

/// Lossless WebP encoder, registered as `webp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpEncoder;

impl ImageEncoder for WebpEncoder {
    fn name(&self) -> &'static str {
        "webp"
    }

    fn encode(
        &self,
        view: &AnyView<'_>,
        _spec: &FormatSpec,
        _palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> Result<(), ImageWriterError> {
        let (width, height) = view.dimensions();
        let (color, data) = match view {
            AnyView::Rgba8(v) => (ExtendedColorType::Rgba8, straight_rgba(v).as_bytes().to_vec()),
            AnyView::Gray8(v) => (ExtendedColorType::L8, v.to_image().into_data()),
            AnyView::Gray16(v) => (
                ExtendedColorType::L8,
                v.to_image().data().iter().map(|&s| gray16_to_gray8(s)).collect(),
            ),
            AnyView::Gray32f(_) => return Err(unsupported_pixel_kind("webp", view.kind())),
        };
        trace!(width, height, "webp encode");

        WebPEncoder::new_lossless(out)
            .encode(&data, width, height, color)
            .map_err(|e| ImageWriterError::new(format!("webp encoder: {e}")))
    }
}
