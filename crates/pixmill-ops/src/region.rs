//! Region and fill operations.
//!
//! - [`fill`] / [`fill_color`] / [`fill_any`] - set every pixel
//! - [`set_rectangle`] - clipped blit of one buffer into another
//! - [`create_view`] - validated type-erased view
//! - [`add_border`] - debug frame for alignment checks
//!
//! When the `parallel` feature is enabled, fills use rayon.

use crate::{OpsError, OpsResult};
use pixmill_core::{
    dispatch_any, AnyImage, AnyPixelValue, AnyView, Color, Error, Image, PixelBuffer,
    PixelConvert, PixelType, Rect, Rgba8,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Border colors drawn by [`add_border`], packed `0xAABBGGRR`.
pub const BORDER_TOP: u32 = 0xff0000ff;
/// Bottom border, green.
pub const BORDER_BOTTOM: u32 = 0xff00ff00;
/// Left border, yellow.
pub const BORDER_LEFT: u32 = 0xff00ffff;
/// Right border, blue.
pub const BORDER_RIGHT: u32 = 0xffff0000;

/// Sets every pixel to `value`, converted once with the crate-wide
/// round-and-clamp policy.
///
/// ```rust
/// use pixmill_core::{Image, Gray8};
/// use pixmill_ops::region::fill;
///
/// let mut img: Image<Gray8> = Image::new(3, 3);
/// fill(&mut img, 300i32);
/// assert!(img.data().iter().all(|&v| v == 255));
/// ```
pub fn fill<F, T>(image: &mut Image<F>, value: T)
where
    F: PixelType,
    T: PixelConvert<F>,
{
    trace!(width = image.width(), height = image.height(), pixel_format = F::NAME, "fill");
    let native = value.into_pixel();

    #[cfg(feature = "parallel")]
    image.data_mut().par_iter_mut().for_each(|px| *px = native);

    #[cfg(not(feature = "parallel"))]
    image.fill(native);
}

/// Fills with `color`, first bringing it into the image's alpha state.
pub fn fill_color(image: &mut Image<Rgba8>, color: Color) {
    let color = color.to_alpha_state(image.is_premultiplied());
    fill(image, color);
}

/// [`fill`] on a type-erased image.
pub fn fill_any<T: AnyPixelValue>(image: &mut AnyImage, value: T) {
    dispatch_any!(AnyImage, image, img => fill(img, value))
}

/// Copies all of `src` into `dst` with its top-left corner at `(x, y)`.
///
/// Pixels that would land outside `dst` are dropped; negative offsets
/// clip the left and top edges.
///
/// ```rust
/// use pixmill_core::{Image, Gray8};
/// use pixmill_ops::region::set_rectangle;
///
/// let mut dst: Image<Gray8> = Image::new(4, 4);
/// let src: Image<Gray8> = Image::filled(3, 3, 9);
/// set_rectangle(&mut dst, &src, 2, 2);
/// assert_eq!(dst.pixel(3, 3), 9);
/// assert_eq!(dst.pixel(1, 1), 0);
/// ```
pub fn set_rectangle<F, B>(dst: &mut Image<F>, src: &B, x: i64, y: i64)
where
    F: PixelType,
    B: PixelBuffer<Format = F> + ?Sized,
{
    let Some(area) = placement_overlap(dst.width(), dst.height(), src.width(), src.height(), x, y)
    else {
        debug!(x, y, "set_rectangle: nothing to copy");
        return;
    };
    trace!(x, y, w = area.width, h = area.height, "set_rectangle");

    for sy in area.y..area.bottom() {
        let row = dst.row_mut((sy as i64 + y) as u32);
        for sx in area.x..area.right() {
            row[(sx as i64 + x) as usize] = src.pixel(sx, sy);
        }
    }
}

/// Part of a `src_w` x `src_h` source, in source coordinates, that lands
/// inside a `dst_w` x `dst_h` destination when placed at `(x, y)`.
pub(crate) fn placement_overlap(
    dst_w: u32,
    dst_h: u32,
    src_w: u32,
    src_h: u32,
    x: i64,
    y: i64,
) -> Option<Rect> {
    let x0 = x.saturating_neg().clamp(0, src_w as i64);
    let y0 = y.saturating_neg().clamp(0, src_h as i64);
    let x1 = (dst_w as i64).saturating_sub(x).clamp(0, src_w as i64);
    let y1 = (dst_h as i64).saturating_sub(y).clamp(0, src_h as i64);
    let area = Rect::new(
        x0 as u32,
        y0 as u32,
        (x1 - x0).max(0) as u32,
        (y1 - y0).max(0) as u32,
    );
    (!area.is_empty()).then_some(area)
}

/// [`set_rectangle`] between type-erased buffers.
///
/// # Errors
///
/// Returns [`Error::FormatMismatch`] if the pixel formats differ.
pub fn set_rectangle_any(dst: &mut AnyImage, src: &AnyView<'_>, x: i64, y: i64) -> OpsResult<()> {
    match (dst, src) {
        (AnyImage::Rgba8(d), AnyView::Rgba8(s)) => set_rectangle(d, s, x, y),
        (AnyImage::Gray8(d), AnyView::Gray8(s)) => set_rectangle(d, s, x, y),
        (AnyImage::Gray16(d), AnyView::Gray16(s)) => set_rectangle(d, s, x, y),
        (AnyImage::Gray32f(d), AnyView::Gray32f(s)) => set_rectangle(d, s, x, y),
        (d, s) => {
            return Err(Error::format_mismatch(d.kind().name(), s.kind().name()).into());
        }
    }
    Ok(())
}

/// Creates a view over `(x, y, width, height)` of `image`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `x + width > image.width()` or
/// `y + height > image.height()`.
///
/// ```rust
/// use pixmill_core::{AnyImage, PixelKind};
/// use pixmill_ops::region::create_view;
///
/// let img = AnyImage::new(PixelKind::Rgba8, 4, 4);
/// assert_eq!(create_view(&img, 1, 1, 3, 3).unwrap().dimensions(), (3, 3));
/// assert!(create_view(&img, 2, 0, 3, 1).is_err());
/// ```
pub fn create_view(
    image: &AnyImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> OpsResult<AnyView<'_>> {
    image.view(Rect::new(x, y, width, height)).map_err(OpsError::from)
}

/// Draws a one-pixel debug frame: top red, bottom green, left yellow,
/// right blue. Top and bottom rows own the corners.
///
/// # Panics
///
/// Panics if the image is empty.
pub fn add_border(image: &mut Image<Rgba8>) {
    let (w, h) = image.dimensions();
    assert!(w >= 1 && h >= 1, "add_border requires a non-empty image, got {w}x{h}");

    let color = |packed: u32| Color::from_packed(packed).to_array();
    for y in 0..h {
        image.set_pixel(0, y, color(BORDER_LEFT));
        image.set_pixel(w - 1, y, color(BORDER_RIGHT));
    }
    image.row_mut(0).fill(color(BORDER_TOP));
    image.row_mut(h - 1).fill(color(BORDER_BOTTOM));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pixmill_core::{get_pixel, Gray16, Gray32f, Gray8, PixelKind};

    #[test]
    fn test_fill_each_format() {
        let mut rgba: Image<Rgba8> = Image::new(2, 2);
        fill(&mut rgba, 0xff102030u32);
        assert!(rgba.data().iter().all(|&p| p == [0x30, 0x20, 0x10, 0xff]));

        let mut g16: Image<Gray16> = Image::new(2, 2);
        fill(&mut g16, -5.0f32);
        assert!(g16.data().iter().all(|&v| v == 0));

        let mut gf: Image<Gray32f> = Image::new(2, 2);
        fill(&mut gf, 0.1f64);
        for &v in gf.data() {
            assert_relative_eq!(v, 0.1f32);
        }
        assert_relative_eq!(get_pixel::<f64, _>(&gf, 1, 1), 0.1, epsilon = 1e-7);
    }

    #[test]
    fn test_fill_color_respects_alpha_state() {
        let mut img: Image<Rgba8> = Image::new(1, 1);
        img.set_premultiplied(true);
        fill_color(&mut img, Color::rgba(255, 128, 0, 128));
        assert_eq!(img.pixel(0, 0), [128, 64, 0, 128]);

        let mut straight: Image<Rgba8> = Image::new(1, 1);
        fill_color(&mut straight, Color::rgba(128, 64, 0, 128).with_premultiplied(true));
        assert_eq!(straight.pixel(0, 0), [255, 128, 0, 128]);
    }

    #[test]
    fn test_fill_any() {
        let mut img = AnyImage::new(PixelKind::Gray8, 2, 2);
        fill_any(&mut img, 17u64);
        assert_eq!(img.get_pixel::<u8>(1, 1), 17);
    }

    #[test]
    fn test_set_rectangle_negative_offset() {
        let mut dst: Image<Gray8> = Image::new(3, 3);
        let mut src: Image<Gray8> = Image::new(2, 2);
        src.set_pixel(1, 1, 5);
        src.set_pixel(0, 0, 1);
        set_rectangle(&mut dst, &src, -1, -1);
        assert_eq!(dst.pixel(0, 0), 5);
        assert_eq!(dst.data().iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_set_rectangle_fully_outside() {
        let mut dst: Image<Gray8> = Image::new(2, 2);
        let src: Image<Gray8> = Image::filled(2, 2, 3);
        set_rectangle(&mut dst, &src, 2, 0);
        set_rectangle(&mut dst, &src, 0, -2);
        assert!(dst.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_set_rectangle_extreme_offsets() {
        let mut dst: Image<Gray8> = Image::new(2, 2);
        let src: Image<Gray8> = Image::filled(2, 2, 3);
        set_rectangle(&mut dst, &src, i64::MIN, 0);
        set_rectangle(&mut dst, &src, 0, i64::MIN);
        set_rectangle(&mut dst, &src, i64::MAX, i64::MAX);
        assert!(dst.data().iter().all(|&v| v == 0));

        assert_eq!(placement_overlap(4, 4, 3, 3, 2, -1), Some(Rect::new(0, 1, 2, 2)));
        assert_eq!(placement_overlap(4, 4, 3, 3, i64::MIN, i64::MAX), None);
    }

    #[test]
    fn test_set_rectangle_from_view() {
        let mut dst: Image<Gray16> = Image::new(4, 1);
        let mut src: Image<Gray16> = Image::new(4, 1);
        src.set_pixel(2, 0, 7);
        let view = src.view(Rect::new(2, 0, 2, 1)).unwrap();
        set_rectangle(&mut dst, &view, 0, 0);
        assert_eq!(get_pixel::<u16, _>(&dst, 0, 0), 7);
    }

    #[test]
    fn test_set_rectangle_any_mismatch() {
        let mut dst = AnyImage::new(PixelKind::Gray8, 2, 2);
        let src = AnyImage::new(PixelKind::Gray16, 2, 2);
        let err = set_rectangle_any(&mut dst, &src.as_view(), 0, 0).unwrap_err();
        assert!(matches!(err, OpsError::Core(Error::FormatMismatch { .. })));

        let same = AnyImage::new(PixelKind::Gray8, 1, 1);
        assert!(set_rectangle_any(&mut dst, &same.as_view(), 1, 1).is_ok());
    }

    #[test]
    fn test_create_view_out_of_range() {
        let img = AnyImage::new(PixelKind::Gray32f, 4, 4);
        assert!(create_view(&img, 0, 0, 4, 4).is_ok());
        assert!(create_view(&img, 0, 1, 4, 4).unwrap_err().is_bounds_error());
        assert!(create_view(&img, 4, 0, 1, 1).is_err());
    }

    #[test]
    fn test_add_border_scenario() {
        let red = Color::rgb(255, 0, 0).to_array();
        let mut img: Image<Rgba8> = Image::filled(4, 4, red);
        img.set_pixel(1, 1, [1, 2, 3, 255]);
        add_border(&mut img);
        assert_eq!(get_pixel::<u32, _>(&img, 0, 0), BORDER_TOP);
        assert_eq!(get_pixel::<u32, _>(&img, 3, 3), BORDER_BOTTOM);
        assert_eq!(get_pixel::<u32, _>(&img, 0, 1), BORDER_LEFT);
        assert_eq!(get_pixel::<u32, _>(&img, 3, 2), BORDER_RIGHT);
        assert_eq!(img.pixel(1, 1), [1, 2, 3, 255]);
        assert_eq!(img.pixel(2, 2), red);
    }

    #[test]
    fn test_add_border_single_pixel() {
        let mut img: Image<Rgba8> = Image::new(1, 1);
        add_border(&mut img);
        assert_eq!(get_pixel::<u32, _>(&img, 0, 0), BORDER_BOTTOM);
    }

    #[test]
    #[should_panic]
    fn test_add_border_empty_panics() {
        let mut img: Image<Rgba8> = Image::new(0, 3);
        add_border(&mut img);
    }
}
