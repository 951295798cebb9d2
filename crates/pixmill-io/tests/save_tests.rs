//! Save dispatch tests: filename resolution, type strings, palettes,
//! custom encoders and file output.

use pixmill_core::prelude::*;
use pixmill_io::{
    save_to_bytes, save_to_file, save_to_file_as, save_to_stream, view_to_bytes, EncoderRegistry,
    FormatSpec, ImageEncoder, ImageWriterError, IoError, RgbaPalette,
};
use std::io::Write;

fn sample_rgba() -> Image<Rgba8> {
    let mut img: Image<Rgba8> = Image::new(16, 8);
    for y in 0..8 {
        for x in 0..16 {
            img.set_pixel(x, y, [(x * 16) as u8, (y * 32) as u8, 90, 255]);
        }
    }
    img
}

#[test]
fn unknown_extension_fails_before_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.bmp");
    let err = save_to_file(&sample_rgba(), &path).unwrap_err();
    assert!(matches!(err, IoError::UnknownFormat { .. }));
    assert!(!path.exists());
}

#[test]
fn recognised_but_unregistered_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.svg");
    let err = save_to_file(&sample_rgba(), &path).unwrap_err();
    match err {
        IoError::Encode(e) => assert_eq!(e.message(), "unknown file type: svg"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn views_save_like_images() {
    let img = sample_rgba();
    let view = img.view(Rect::new(4, 2, 8, 4)).unwrap();
    assert_eq!(view_to_bytes(view), view_to_bytes(&view.to_image()));

    let any = AnyImage::from(img.clone());
    let any_view = any.view(Rect::new(4, 2, 8, 4)).unwrap();
    assert_eq!(view_to_bytes(any_view), view_to_bytes(view));
}

struct Ppm;

impl ImageEncoder for Ppm {
    fn name(&self) -> &'static str {
        "ppm"
    }

    fn encode(
        &self,
        view: &AnyView<'_>,
        _spec: &FormatSpec,
        _palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> std::result::Result<(), ImageWriterError> {
        let AnyView::Rgba8(v) = view else {
            return Err(ImageWriterError::new("ppm needs rgba8"));
        };
        write!(out, "P6\n{} {}\n255\n", v.width(), v.height())?;
        for y in 0..v.height() {
            for px in v.row(y) {
                out.write_all(&px[..3])?;
            }
        }
        Ok(())
    }
}

#[test]
fn custom_registry_encoder() {
    let mut registry = EncoderRegistry::with_builtin();
    registry.register(Ppm);

    let img: Image<Rgba8> = Image::filled(2, 1, [1, 2, 3, 4]);
    let bytes = registry.encode_to_vec(&(&img).into(), "ppm", None).unwrap();
    assert_eq!(bytes, b"P6\n2 1\n255\n\x01\x02\x03\x01\x02\x03");

    let gray = AnyImage::new(PixelKind::Gray8, 1, 1);
    let err = registry.encode_to_vec(&gray.as_view(), "ppm", None).unwrap_err();
    assert_eq!(err.to_string(), "ppm needs rgba8");

    assert!(!EncoderRegistry::global().supports("ppm"));
}

#[cfg(feature = "png")]
mod png_output {
    use super::*;
    use pixmill_io::save_to_file_with_palette;
    use std::io::Cursor;

    #[test]
    fn save_by_extension_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MAP.PNG");
        save_to_file(&sample_rgba(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn explicit_type_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.dat");
        save_to_file_as(&sample_rgba(), &path, "png24").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        assert_eq!(reader.info().color_type, png::ColorType::Rgb);
    }

    #[test]
    fn stream_and_bytes_agree() {
        let img = sample_rgba();
        let mut stream = Vec::new();
        save_to_stream(&img, &mut stream, "png").unwrap();
        assert_eq!(stream, save_to_bytes(&img, "png").unwrap());
    }

    #[test]
    fn premultiplied_input_is_written_straight() {
        let mut img: Image<Rgba8> = Image::filled(1, 1, [200, 100, 0, 255]);
        premultiply_alpha(&mut img);
        let straight = save_to_bytes(&img, "png").unwrap();
        let reference = save_to_bytes(&Image::<Rgba8>::filled(1, 1, [200, 100, 0, 255]), "png").unwrap();
        assert_eq!(straight, reference);
        assert!(img.is_premultiplied());
    }

    #[test]
    fn paletted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexed.png");
        let palette = RgbaPalette::new([Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]).unwrap();
        save_to_file_with_palette(&sample_rgba(), &path, None, &palette).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let reader = png::Decoder::new(std::io::BufReader::new(file)).read_info().unwrap();
        assert_eq!(reader.info().color_type, png::ColorType::Indexed);
    }

    #[test]
    fn gray_formats() {
        let g8 = AnyImage::new(PixelKind::Gray8, 3, 3);
        assert!(save_to_bytes(&g8, "png").is_ok());
        let g32 = AnyImage::new(PixelKind::Gray32f, 3, 3);
        assert!(matches!(save_to_bytes(&g32, "png"), Err(IoError::Encode(_))));
    }
}

#[cfg(feature = "jpeg")]
mod jpeg_output {
    use super::*;
    use pixmill_io::save_to_file_with_palette;

    #[test]
    fn jpeg_rejects_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let palette = RgbaPalette::from_rgb_bytes(&[0, 0, 0]).unwrap();
        let err = save_to_file_with_palette(&sample_rgba(), &path, None, &palette).unwrap_err();
        assert!(err.to_string().contains("does not support palettes"));
        assert!(!path.exists());
    }

    #[test]
    fn jpeg_quality_from_type_string() {
        let img = sample_rgba();
        let a = save_to_bytes(&img, "jpeg85").unwrap();
        let b = save_to_bytes(&img, "jpeg:quality=85").unwrap();
        assert_eq!(a, b);
        assert!(save_to_bytes(&img, "jpeg:quality=0").is_err());
    }
}

#[cfg(feature = "tiff")]
#[test]
fn tiff_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.TIF");
    let img = AnyImage::new(PixelKind::Gray16, 5, 5);
    save_to_file(&img, &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
