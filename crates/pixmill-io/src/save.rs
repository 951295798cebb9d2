//! Saving images to files, byte buffers and streams.
//!
//! Every function accepts anything convertible to an [`AnyView`]: `&Image<F>`,
//! an `ImageView`, `&AnyImage` or an `AnyView` itself. Encoding goes through
//! the global [`EncoderRegistry`].
//!
//! When no type string is given, it is resolved from the filename with
//! [`type_from_filename`]; a name that resolves to nothing fails with
//! [`IoError::UnknownFormat`].
//!
//! ```rust,no_run
//! use pixmill_core::{Image, Rgba8};
//! use pixmill_io::{save_to_bytes, save_to_file, save_to_file_as};
//!
//! let img: Image<Rgba8> = Image::filled(64, 64, [255, 128, 0, 255]);
//! save_to_file(&img, "orange.png")?;
//! save_to_file_as(&img, "orange.img", "jpeg85")?;
//! let bytes = save_to_bytes(&img, "png24")?;
//! # Ok::<(), pixmill_io::IoError>(())
//! ```

use crate::sniff::type_from_filename;
use crate::{EncoderRegistry, IoError, IoResult, RgbaPalette};
use pixmill_core::AnyView;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Saves with the type derived from the filename.
///
/// # Errors
///
/// [`IoError::UnknownFormat`] if the filename has no known suffix,
/// [`IoError::Encode`] if encoding or writing fails.
pub fn save_to_file<'a, P: AsRef<Path>>(image: impl Into<AnyView<'a>>, filename: P) -> IoResult<()> {
    let path = filename.as_ref();
    write_file(image.into(), path, &resolve_type(path)?, None)
}

/// Saves as `type_string`, whatever the filename says.
///
/// # Errors
///
/// [`IoError::Encode`] if encoding or writing fails.
pub fn save_to_file_as<'a, P: AsRef<Path>>(
    image: impl Into<AnyView<'a>>,
    filename: P,
    type_string: &str,
) -> IoResult<()> {
    write_file(image.into(), filename.as_ref(), type_string, None)
}

/// Saves using `palette`, as `type_string` or the type derived from the
/// filename.
///
/// # Errors
///
/// As [`save_to_file`]; also fails if the encoder does not support palettes.
pub fn save_to_file_with_palette<'a, P: AsRef<Path>>(
    image: impl Into<AnyView<'a>>,
    filename: P,
    type_string: Option<&str>,
    palette: &RgbaPalette,
) -> IoResult<()> {
    let path = filename.as_ref();
    let type_string = match type_string {
        Some(t) => t.to_string(),
        None => resolve_type(path)?,
    };
    write_file(image.into(), path, &type_string, Some(palette))
}

/// Encodes into a byte buffer.
///
/// # Errors
///
/// [`IoError::Encode`] if encoding fails.
pub fn save_to_bytes<'a>(image: impl Into<AnyView<'a>>, type_string: &str) -> IoResult<Vec<u8>> {
    EncoderRegistry::global().encode_to_vec(&image.into(), type_string, None)
}

/// Encodes into a byte buffer using `palette`.
///
/// # Errors
///
/// [`IoError::Encode`] if encoding fails or the encoder has no palette
/// support.
pub fn save_to_bytes_with_palette<'a>(
    image: impl Into<AnyView<'a>>,
    type_string: &str,
    palette: &RgbaPalette,
) -> IoResult<Vec<u8>> {
    EncoderRegistry::global().encode_to_vec(&image.into(), type_string, Some(palette))
}

/// Encodes into a caller-supplied stream.
///
/// # Errors
///
/// [`IoError::Encode`] if encoding or writing fails.
pub fn save_to_stream<'a, W: Write>(
    image: impl Into<AnyView<'a>>,
    stream: &mut W,
    type_string: &str,
) -> IoResult<()> {
    EncoderRegistry::global().encode(&image.into(), type_string, None, stream)
}

/// Encodes into a caller-supplied stream using `palette`.
///
/// # Errors
///
/// [`IoError::Encode`] if encoding or writing fails, or the encoder has no
/// palette support.
pub fn save_to_stream_with_palette<'a, W: Write>(
    image: impl Into<AnyView<'a>>,
    stream: &mut W,
    type_string: &str,
    palette: &RgbaPalette,
) -> IoResult<()> {
    EncoderRegistry::global().encode(&image.into(), type_string, Some(palette), stream)
}

/// Writes the raw pixel rows of `view` to `stream`, top to bottom, in
/// native byte order and without padding.
///
/// # Errors
///
/// [`IoError::Encode`] if writing fails.
pub fn write_view_raw<'a, W: Write>(view: impl Into<AnyView<'a>>, stream: &mut W) -> IoResult<()> {
    let view = view.into();
    for y in 0..view.height() {
        stream.write_all(view.row_bytes(y))?;
    }
    Ok(())
}

/// Returns the raw pixel rows of `view` as one buffer.
///
/// ```rust
/// use pixmill_core::{Image, Rect, pixel::Gray8};
/// use pixmill_io::view_to_bytes;
///
/// let img: Image<Gray8> = Image::from_data(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let view = img.view(Rect::new(1, 0, 2, 2)).unwrap();
/// assert_eq!(view_to_bytes(view), vec![2, 3, 5, 6]);
/// ```
pub fn view_to_bytes<'a>(view: impl Into<AnyView<'a>>) -> Vec<u8> {
    let view = view.into();
    let row_len = view.width() as usize * view.kind().bytes_per_pixel();
    let mut bytes = Vec::with_capacity(view.height() as usize * row_len);
    for y in 0..view.height() {
        bytes.extend_from_slice(view.row_bytes(y));
    }
    bytes
}

fn resolve_type(path: &Path) -> IoResult<String> {
    let filename = path.to_string_lossy();
    match type_from_filename(&filename) {
        Some(t) => {
            debug!(filename = %filename, type_string = t, "resolved type from filename");
            Ok(t.to_string())
        }
        None => Err(IoError::UnknownFormat {
            filename: filename.into_owned(),
        }),
    }
}

/// Encodes fully in memory first so a failed encode leaves no file behind.
fn write_file(
    view: AnyView<'_>,
    path: &Path,
    type_string: &str,
    palette: Option<&RgbaPalette>,
) -> IoResult<()> {
    let bytes = EncoderRegistry::global().encode_to_vec(&view, type_string, palette)?;
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageWriterError;
    use pixmill_core::{AnyImage, Image, PixelKind, Rect, Rgba8};

    #[test]
    fn test_unknown_format_from_filename() {
        let img = AnyImage::new(PixelKind::Rgba8, 1, 1);
        let err = save_to_file(&img, "out.unknown").unwrap_err();
        assert_eq!(
            err,
            IoError::UnknownFormat {
                filename: "out.unknown".into()
            }
        );
    }

    #[test]
    fn test_unregistered_type() {
        let img = AnyImage::new(PixelKind::Rgba8, 1, 1);
        let err = save_to_bytes(&img, "pdf").unwrap_err();
        assert_eq!(err, IoError::Encode(ImageWriterError::new("unknown file type: pdf")));
    }

    #[test]
    fn test_view_to_bytes_empty() {
        let img: Image<Rgba8> = Image::new(2, 2);
        let empty = img.view(Rect::new(0, 0, 0, 0)).unwrap();
        assert!(view_to_bytes(empty).is_empty());
    }

    #[test]
    fn test_write_view_raw_rgba() {
        let mut img: Image<Rgba8> = Image::new(2, 2);
        img.set_pixel(1, 1, [1, 2, 3, 4]);
        let mut out = Vec::new();
        write_view_raw(&img, &mut out).unwrap();
        assert_eq!(out.len(), 16);
        assert_eq!(&out[12..], &[1, 2, 3, 4]);
    }
}
