//! PNG output.
//!
//! # Features
//!
//! - RGBA8 as RGBA (`png`, `png32`) or RGB (`png24`, or option `alpha=false`)
//! - Indexed color with `PLTE`/`tRNS` when a palette is supplied
//! - Gray8 and Gray16 as 8/16-bit grayscale
//! - Compression via option `compression=fast|default|best`
//!
//! Gray32f has no PNG representation and is rejected.

use crate::encoder::{rgba_to_rgb, straight_rgba, unsupported_pixel_kind};
use crate::{FormatSpec, ImageEncoder, ImageWriterError, RgbaPalette};
use pixmill_core::AnyView;
use std::io::Write;
use tracing::trace;

/// PNG encoder, registered as `png`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn name(&self) -> &'static str {
        "png"
    }

    fn supports_palette(&self) -> bool {
        true
    }

    fn encode(
        &self,
        view: &AnyView<'_>,
        spec: &FormatSpec,
        palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> Result<(), ImageWriterError> {
        let (width, height) = view.dimensions();
        let compression = compression(spec)?;

        let (color, depth, data, palette) = match (view, palette) {
            (AnyView::Rgba8(v), Some(palette)) => {
                let image = straight_rgba(v);
                let indices = palette.map_pixels(image.data());
                (png::ColorType::Indexed, png::BitDepth::Eight, indices, Some(palette))
            }
            (AnyView::Rgba8(v), None) => {
                let image = straight_rgba(v);
                if keeps_alpha(spec)? {
                    let bytes = image.as_bytes().to_vec();
                    (png::ColorType::Rgba, png::BitDepth::Eight, bytes, None)
                } else {
                    (png::ColorType::Rgb, png::BitDepth::Eight, rgba_to_rgb(image.data()), None)
                }
            }
            (AnyView::Gray8(v), None) => {
                let bytes = v.to_image().into_data();
                (png::ColorType::Grayscale, png::BitDepth::Eight, bytes, None)
            }
            (AnyView::Gray16(v), None) => {
                let bytes = v
                    .to_image()
                    .data()
                    .iter()
                    .flat_map(|s| s.to_be_bytes())
                    .collect();
                (png::ColorType::Grayscale, png::BitDepth::Sixteen, bytes, None)
            }
            (AnyView::Gray8(_) | AnyView::Gray16(_), Some(_)) => {
                return Err(ImageWriterError::new(format!(
                    "png encoder cannot apply a palette to {} images",
                    view.kind()
                )));
            }
            (AnyView::Gray32f(_), _) => return Err(unsupported_pixel_kind("png", view.kind())),
        };
        trace!(width, height, ?color, ?depth, "png encode");

        let mut encoder = png::Encoder::new(out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_compression(compression);
        if let Some(palette) = palette {
            encoder.set_palette(palette.rgb_bytes());
            if palette.has_alpha() {
                encoder.set_trns(palette.alpha_bytes());
            }
        }

        let mut writer = encoder.write_header().map_err(encode_error)?;
        writer.write_image_data(&data).map_err(encode_error)?;
        writer.finish().map_err(encode_error)
    }
}

fn keeps_alpha(spec: &FormatSpec) -> Result<bool, ImageWriterError> {
    if let Some(alpha) = spec.flag("alpha")? {
        return Ok(alpha);
    }
    Ok(spec.variant_number() != Some(24))
}

fn compression(spec: &FormatSpec) -> Result<png::Compression, ImageWriterError> {
    match spec.option("compression") {
        None | Some("default") => Ok(png::Compression::default()),
        Some("fast") => Ok(png::Compression::Fast),
        Some("best") => Ok(png::Compression::High),
        Some(other) => Err(ImageWriterError::new(format!(
            "invalid png compression '{other}', expected fast, default or best"
        ))),
    }
}

fn encode_error(err: png::EncodingError) -> ImageWriterError {
    ImageWriterError::new(format!("png encoder: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmill_core::{AnyImage, Gray16, Gray32f, Image, PixelKind, Rgba8};
    use std::io::Cursor;

    fn encode(view: AnyView<'_>, type_string: &str, palette: Option<&RgbaPalette>) -> Result<Vec<u8>, ImageWriterError> {
        let mut out = Vec::new();
        PngEncoder.encode(&view, &FormatSpec::parse(type_string), palette, &mut out)?;
        Ok(out)
    }

    fn decode(bytes: &[u8]) -> (png::ColorType, png::BitDepth, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let info = reader.info();
        let (color, depth) = (info.color_type, info.bit_depth);
        let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
        let frame = reader.next_frame(&mut buf).unwrap();
        buf.truncate(frame.buffer_size());
        (color, depth, buf)
    }

    #[test]
    fn test_rgba_roundtrip() {
        let mut img: Image<Rgba8> = Image::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                img.set_pixel(x, y, [(x * 60) as u8, (y * 80) as u8, 7, 200]);
            }
        }
        let bytes = encode((&img).into(), "png", None).unwrap();
        let (color, depth, data) = decode(&bytes);
        assert_eq!((color, depth), (png::ColorType::Rgba, png::BitDepth::Eight));
        assert_eq!(data, img.as_bytes());
    }

    #[test]
    fn test_png24_drops_alpha() {
        let img: Image<Rgba8> = Image::filled(2, 2, [1, 2, 3, 4]);
        let (color, _, data) = decode(&encode((&img).into(), "png24", None).unwrap());
        assert_eq!(color, png::ColorType::Rgb);
        assert_eq!(data, [1, 2, 3].repeat(4));

        let (color, _, _) = decode(&encode((&img).into(), "png:alpha=off", None).unwrap());
        assert_eq!(color, png::ColorType::Rgb);
    }

    #[test]
    fn test_gray16_big_endian() {
        let img: Image<Gray16> = Image::filled(1, 1, 0x1234);
        let (color, depth, data) = decode(&encode((&img).into(), "png", None).unwrap());
        assert_eq!((color, depth), (png::ColorType::Grayscale, png::BitDepth::Sixteen));
        assert_eq!(data, [0x12, 0x34]);
    }

    #[test]
    fn test_indexed_output() {
        let img: Image<Rgba8> = Image::filled(3, 1, [250, 5, 5, 255]);
        let palette = RgbaPalette::from_rgba_bytes(&[0, 0, 0, 0, 255, 0, 0, 255]).unwrap();
        let bytes = encode((&img).into(), "png8", Some(&palette)).unwrap();

        let reader = png::Decoder::new(Cursor::new(&bytes[..])).read_info().unwrap();
        let info = reader.info();
        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.palette.as_deref(), Some(&[0, 0, 0, 255, 0, 0][..]));
        assert_eq!(info.trns.as_deref(), Some(&[0, 255][..]));
    }

    #[test]
    fn test_rejections() {
        let float = AnyImage::from(Image::<Gray32f>::new(1, 1));
        assert!(encode(float.as_view(), "png", None).is_err());

        let gray = AnyImage::new(PixelKind::Gray8, 1, 1);
        let palette = RgbaPalette::from_rgb_bytes(&[0, 0, 0]).unwrap();
        assert!(encode(gray.as_view(), "png", Some(&palette)).is_err());

        let rgba = AnyImage::new(PixelKind::Rgba8, 1, 1);
        assert!(encode(rgba.as_view(), "png:compression=max", None).is_err());
    }
}
