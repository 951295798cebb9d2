//! TIFF output.
//!
//! Every pixel format maps to a native TIFF layout, so nothing is lost:
//!
//! | Pixel format | TIFF color type |
//! |--------------|-----------------|
//! | Rgba8        | RGBA8 (RGB8 with `alpha=false`) |
//! | Gray8        | Gray8           |
//! | Gray16       | Gray16          |
//! | Gray32f      | Gray32Float     |
//!
//! The TIFF writer needs to seek, so the file is assembled in memory and
//! then copied to the output stream.

use crate::encoder::{rgba_to_rgb, straight_rgba};
use crate::{FormatSpec, ImageEncoder, ImageWriterError, RgbaPalette};
use pixmill_core::AnyView;
use std::io::{Cursor, Write};
use tiff::encoder::{colortype, TiffEncoder as Writer};
use tracing::trace;

/// TIFF encoder, registered as `tiff`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffEncoder;

impl ImageEncoder for TiffEncoder {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn encode(
        &self,
        view: &AnyView<'_>,
        spec: &FormatSpec,
        _palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> Result<(), ImageWriterError> {
        let (width, height) = view.dimensions();
        trace!(width, height, pixel_format = view.kind().name(), "tiff encode");

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = Writer::new(&mut buffer).map_err(encode_error)?;
            match view {
                AnyView::Rgba8(v) => {
                    let image = straight_rgba(v);
                    if spec.flag("alpha")?.unwrap_or(true) {
                        writer.write_image::<colortype::RGBA8>(width, height, image.as_bytes())
                    } else {
                        let rgb = rgba_to_rgb(image.data());
                        writer.write_image::<colortype::RGB8>(width, height, &rgb)
                    }
                }
                AnyView::Gray8(v) => {
                    writer.write_image::<colortype::Gray8>(width, height, v.to_image().data())
                }
                AnyView::Gray16(v) => {
                    writer.write_image::<colortype::Gray16>(width, height, v.to_image().data())
                }
                AnyView::Gray32f(v) => {
                    writer.write_image::<colortype::Gray32Float>(width, height, v.to_image().data())
                }
            }
            .map_err(encode_error)?;
        }

        out.write_all(buffer.get_ref())?;
        Ok(())
    }
}

fn encode_error(err: tiff::TiffError) -> ImageWriterError {
    ImageWriterError::new(format!("tiff encoder: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pixmill_core::{Gray32f, Image, Rgba8};
    use tiff::decoder::{Decoder, DecodingResult};

    fn encode(view: AnyView<'_>, type_string: &str) -> Vec<u8> {
        let mut out = Vec::new();
        TiffEncoder
            .encode(&view, &FormatSpec::parse(type_string), None, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_rgba_roundtrip() {
        let img: Image<Rgba8> = Image::filled(3, 2, [9, 8, 7, 6]);
        let bytes = encode((&img).into(), "tiff");
        assert!(bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*"));

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (3, 2));
        match decoder.read_image().unwrap() {
            DecodingResult::U8(data) => assert_eq!(data, img.as_bytes()),
            _ => panic!("expected 8-bit samples"),
        }
    }

    #[test]
    fn test_gray32f_roundtrip() {
        let mut img: Image<Gray32f> = Image::new(2, 2);
        img.set_pixel(1, 1, 0.75);
        img.set_pixel(0, 1, -2.5);
        let bytes = encode((&img).into(), "tif");

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        match decoder.read_image().unwrap() {
            DecodingResult::F32(data) => {
                assert_relative_eq!(data[3], 0.75);
                assert_relative_eq!(data[2], -2.5);
            }
            _ => panic!("expected float samples"),
        }
    }

    #[test]
    fn test_drop_alpha() {
        let img: Image<Rgba8> = Image::filled(1, 1, [1, 2, 3, 255]);
        let bytes = encode((&img).into(), "tiff:alpha=false");
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        match decoder.read_image().unwrap() {
            DecodingResult::U8(data) => assert_eq!(data, vec![1, 2, 3]),
            _ => panic!("expected 8-bit samples"),
        }
    }
}
