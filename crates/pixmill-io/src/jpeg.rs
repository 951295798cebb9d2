//! JPEG output via `jpeg-encoder`.
//!
//! Quality comes from the `quality` option or the digits of the format
//! word (`jpeg85`), defaulting to [`DEFAULT_QUALITY`]. RGBA input is
//! written as RGB with the alpha channel discarded; Gray16 is reduced to
//! 8 bits.

use crate::encoder::{gray16_to_gray8, rgba_to_rgb, straight_rgba, unsupported_pixel_kind};
use crate::{FormatSpec, ImageEncoder, ImageWriterError, RgbaPalette};
use jpeg_encoder::{ColorType, Encoder};
use pixmill_core::AnyView;
use std::io::Write;
use tracing::trace;

/// Quality used when the type string does not set one.
pub const DEFAULT_QUALITY: u8 = 90;

/// JPEG encoder, registered as `jpeg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn encode(
        &self,
        view: &AnyView<'_>,
        spec: &FormatSpec,
        _palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> Result<(), ImageWriterError> {
        let quality = quality(spec)?;
        let (width, height) = view.dimensions();
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(ImageWriterError::new(format!(
                    "jpeg encoder: {width}x{height} exceeds the 65535 pixel limit"
                )));
            }
        };

        let (color, data) = match view {
            AnyView::Rgba8(v) => (ColorType::Rgb, rgba_to_rgb(straight_rgba(v).data())),
            AnyView::Gray8(v) => (ColorType::Luma, v.to_image().into_data()),
            AnyView::Gray16(v) => (
                ColorType::Luma,
                v.to_image().data().iter().map(|&s| gray16_to_gray8(s)).collect(),
            ),
            AnyView::Gray32f(_) => return Err(unsupported_pixel_kind("jpeg", view.kind())),
        };
        trace!(width, height, quality, "jpeg encode");

        let encoder = Encoder::new(out, quality);
        encoder
            .encode(&data, w, h, color)
            .map_err(|e: jpeg_encoder::EncodingError| ImageWriterError::new(format!("jpeg encoder: {e}")))
    }
}

/// Resolves the quality setting, 1 to 100.
fn quality(spec: &FormatSpec) -> Result<u8, ImageWriterError> {
    let quality = match spec.parsed_option::<u32>("quality")? {
        Some(q) => q,
        None => spec.variant_number().unwrap_or(DEFAULT_QUALITY as u32),
    };
    if !(1..=100).contains(&quality) {
        return Err(ImageWriterError::new(format!(
            "jpeg quality {quality} out of range 1-100 in '{spec}'"
        )));
    }
    Ok(quality as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmill_core::{AnyImage, Gray32f, Image, PixelKind, Rgba8};

    fn encode(view: AnyView<'_>, type_string: &str) -> Result<Vec<u8>, ImageWriterError> {
        let mut out = Vec::new();
        JpegEncoder.encode(&view, &FormatSpec::parse(type_string), None, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_quality_resolution() {
        assert_eq!(quality(&FormatSpec::parse("jpeg")).unwrap(), DEFAULT_QUALITY);
        assert_eq!(quality(&FormatSpec::parse("jpeg85")).unwrap(), 85);
        assert_eq!(quality(&FormatSpec::parse("jpeg85:quality=40")).unwrap(), 40);
        assert!(quality(&FormatSpec::parse("jpeg0")).is_err());
        assert!(quality(&FormatSpec::parse("jpeg:quality=101")).is_err());
        assert!(quality(&FormatSpec::parse("jpeg:quality=good")).is_err());
    }

    #[test]
    fn test_writes_jfif() {
        let img: Image<Rgba8> = Image::filled(8, 8, [200, 30, 30, 255]);
        let bytes = encode((&img).into(), "jpeg").unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_quality_changes_size() {
        let mut img: Image<Rgba8> = Image::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                img.set_pixel(x, y, [(x * 8) as u8, (y * 8) as u8, ((x ^ y) * 8) as u8, 255]);
            }
        }
        let low = encode((&img).into(), "jpeg10").unwrap();
        let high = encode((&img).into(), "jpeg100").unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_gray_and_rejections() {
        let gray = AnyImage::new(PixelKind::Gray16, 4, 4);
        assert!(encode(gray.as_view(), "jpg").is_ok());

        let float = AnyImage::from(Image::<Gray32f>::new(1, 1));
        assert!(encode(float.as_view(), "jpeg").is_err());
    }
}
