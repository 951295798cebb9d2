//! Typed pixel accessor.
//!
//! One generic pair, [`get_pixel`] and [`set_pixel`], works for every buffer
//! kind (images and views) and every external numeric type, converting
//! through [`PixelConvert`] with the crate-wide round-and-clamp policy.
//!
//! ```rust
//! use pixmill_core::{get_pixel, set_pixel, Image, pixel::{Gray16, Rgba8}};
//!
//! let mut gray: Image<Gray16> = Image::new(2, 2);
//! set_pixel(&mut gray, 1, 1, 70_000u32);
//! assert_eq!(get_pixel::<u16, _>(&gray, 1, 1), 65535);
//!
//! let mut rgba: Image<Rgba8> = Image::new(2, 2);
//! set_pixel(&mut rgba, 0, 0, 0xff0000ffu32);
//! assert_eq!(rgba.pixel(0, 0), [255, 0, 0, 255]);
//! ```
//!
//! Coordinates are a precondition: callers check them with
//! [`PixelBuffer::check_bounds`] first. Debug builds assert.

use crate::image::{Image, ImageView, ImageViewMut};
use crate::pixel::{PixelConvert, PixelType};

/// Read access to a 2D grid of native pixel values.
pub trait PixelBuffer {
    /// Pixel format of the buffer.
    type Format: PixelType;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Native value at `(x, y)`.
    fn pixel(&self, x: u32, y: u32) -> <Self::Format as PixelType>::Value;

    /// `true` iff `0 <= x < width` and `0 <= y < height`.
    #[inline]
    fn check_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }
}

/// Write access to a 2D grid of native pixel values.
pub trait PixelBufferMut: PixelBuffer {
    /// Writes the native value at `(x, y)`.
    fn set_pixel(&mut self, x: u32, y: u32, value: <Self::Format as PixelType>::Value);
}

impl<F: PixelType> PixelBuffer for Image<F> {
    type Format = F;

    #[inline]
    fn width(&self) -> u32 {
        Image::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        Image::height(self)
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> F::Value {
        Image::pixel(self, x, y)
    }
}

impl<F: PixelType> PixelBufferMut for Image<F> {
    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, value: F::Value) {
        Image::set_pixel(self, x, y, value);
    }
}

impl<F: PixelType> PixelBuffer for ImageView<'_, F> {
    type Format = F;

    #[inline]
    fn width(&self) -> u32 {
        ImageView::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        ImageView::height(self)
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> F::Value {
        ImageView::pixel(self, x, y)
    }
}

impl<F: PixelType> PixelBuffer for ImageViewMut<'_, F> {
    type Format = F;

    #[inline]
    fn width(&self) -> u32 {
        ImageViewMut::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        ImageViewMut::height(self)
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> F::Value {
        ImageViewMut::pixel(self, x, y)
    }
}

impl<F: PixelType> PixelBufferMut for ImageViewMut<'_, F> {
    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, value: F::Value) {
        ImageViewMut::set_pixel(self, x, y, value);
    }
}

/// Reads `(x, y)` and converts it to `T`.
#[inline]
pub fn get_pixel<T, B>(buffer: &B, x: u32, y: u32) -> T
where
    B: PixelBuffer + ?Sized,
    T: PixelConvert<B::Format>,
{
    debug_assert!(buffer.check_bounds(x as i64, y as i64), "pixel ({x}, {y}) out of bounds");
    T::from_pixel(buffer.pixel(x, y))
}

/// Converts `value` to the buffer's native format and writes it at `(x, y)`.
#[inline]
pub fn set_pixel<T, B>(buffer: &mut B, x: u32, y: u32, value: T)
where
    B: PixelBufferMut + ?Sized,
    T: PixelConvert<B::Format>,
{
    debug_assert!(buffer.check_bounds(x as i64, y as i64), "pixel ({x}, {y}) out of bounds");
    buffer.set_pixel(x, y, value.into_pixel());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Gray32f, Gray8, Rgba8};
    use crate::{Color, Rect};
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip_native_range() {
        let mut img: Image<Gray8> = Image::new(3, 3);
        for v in [0u8, 1, 127, 255] {
            set_pixel(&mut img, 2, 1, v);
            assert_eq!(get_pixel::<u8, _>(&img, 2, 1), v);
        }
    }

    #[test]
    fn test_roundtrip_float() {
        let mut img: Image<Gray32f> = Image::new(1, 1);
        set_pixel(&mut img, 0, 0, 0.1f64);
        assert_relative_eq!(get_pixel::<f64, _>(&img, 0, 0), 0.1, epsilon = 1e-7);
        set_pixel(&mut img, 0, 0, -3i32);
        assert_eq!(get_pixel::<f32, _>(&img, 0, 0), -3.0);
    }

    #[test]
    fn test_rgba_color_and_packed() {
        let mut img: Image<Rgba8> = Image::new(2, 1);
        set_pixel(&mut img, 0, 0, Color::rgba(1, 2, 3, 4));
        assert_eq!(get_pixel::<u32, _>(&img, 0, 0), 0x04030201);
        set_pixel(&mut img, 1, 0, 0x80402010u32);
        assert_eq!(get_pixel::<Color, _>(&img, 1, 0), Color::rgba(0x10, 0x20, 0x40, 0x80));
    }

    #[test]
    fn test_view_accessors_are_relative() {
        let mut img: Image<Gray8> = Image::new(4, 4);
        {
            let mut view = img.view_mut(Rect::new(1, 1, 2, 2)).unwrap();
            assert!(PixelBuffer::check_bounds(&view, 1, 1));
            assert!(!PixelBuffer::check_bounds(&view, 2, 0));
            set_pixel(&mut view, 1, 1, 99u16);
        }
        assert_eq!(img.pixel(2, 2), 99);
        let view = img.view(Rect::new(2, 2, 2, 2)).unwrap();
        assert_eq!(get_pixel::<i64, _>(&view, 0, 0), 99);
    }
}
