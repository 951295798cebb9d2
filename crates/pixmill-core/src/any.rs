//! Type-erased images and views.
//!
//! [`AnyImage`] and [`AnyView`] are closed enums over the four supported
//! pixel formats. Operations that must accept "some image" (fill, compare,
//! save) match on the variant and call the typed implementation; the
//! [`dispatch_any!`](crate::dispatch_any) macro keeps those matches short.
//!
//! ```rust
//! use pixmill_core::{AnyImage, Image, PixelKind, pixel::Gray16};
//!
//! let any: AnyImage = Image::<Gray16>::new(3, 2).into();
//! assert_eq!(any.kind(), PixelKind::Gray16);
//! assert_eq!(any.dimensions(), (3, 2));
//! ```

use crate::image::{Image, ImageView};
use crate::pixel::{Gray16, Gray32f, Gray8, PixelConvert, PixelKind, Rgba8};
use crate::{Rect, Result};

/// Applies one expression to whichever concrete image or view an
/// [`AnyImage`] / [`AnyView`] holds.
///
/// ```rust
/// use pixmill_core::{dispatch_any, AnyImage, Image, pixel::Gray8};
///
/// let any = AnyImage::from(Image::<Gray8>::new(2, 2));
/// let bytes = dispatch_any!(AnyImage, &any, img => img.as_bytes().len());
/// assert_eq!(bytes, 4);
/// ```
#[macro_export]
macro_rules! dispatch_any {
    ($enum:ident, $value:expr, $bind:ident => $body:expr) => {
        match $value {
            $enum::Rgba8($bind) => $body,
            $enum::Gray8($bind) => $body,
            $enum::Gray16($bind) => $body,
            $enum::Gray32f($bind) => $body,
        }
    };
}

/// External value types convertible to and from every pixel format.
///
/// Blanket-implemented; all [`Sample`](crate::pixel::Sample) types qualify.
pub trait AnyPixelValue:
    PixelConvert<Rgba8> + PixelConvert<Gray8> + PixelConvert<Gray16> + PixelConvert<Gray32f>
{
}

impl<T> AnyPixelValue for T where
    T: PixelConvert<Rgba8> + PixelConvert<Gray8> + PixelConvert<Gray16> + PixelConvert<Gray32f>
{
}

/// An owned image of any supported pixel format.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyImage {
    /// 8-bit RGBA
    Rgba8(Image<Rgba8>),
    /// 8-bit grayscale
    Gray8(Image<Gray8>),
    /// 16-bit grayscale
    Gray16(Image<Gray16>),
    /// 32-bit float grayscale
    Gray32f(Image<Gray32f>),
}

impl AnyImage {
    /// Creates a zero-filled image of the given format.
    pub fn new(kind: PixelKind, width: u32, height: u32) -> Self {
        match kind {
            PixelKind::Rgba8 => Self::Rgba8(Image::new(width, height)),
            PixelKind::Gray8 => Self::Gray8(Image::new(width, height)),
            PixelKind::Gray16 => Self::Gray16(Image::new(width, height)),
            PixelKind::Gray32f => Self::Gray32f(Image::new(width, height)),
        }
    }

    /// Pixel format tag.
    #[inline]
    pub fn kind(&self) -> PixelKind {
        match self {
            Self::Rgba8(_) => PixelKind::Rgba8,
            Self::Gray8(_) => PixelKind::Gray8,
            Self::Gray16(_) => PixelKind::Gray16,
            Self::Gray32f(_) => PixelKind::Gray32f,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        dispatch_any!(AnyImage, self, img => img.width())
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        dispatch_any!(AnyImage, self, img => img.height())
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// `true` iff `(x, y)` lies inside the image.
    #[inline]
    pub fn check_bounds(&self, x: i64, y: i64) -> bool {
        dispatch_any!(AnyImage, self, img => img.check_bounds(x, y))
    }

    /// Alpha-state flag.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        dispatch_any!(AnyImage, self, img => img.is_premultiplied())
    }

    /// Force-sets the alpha-state flag without touching pixel data.
    #[inline]
    pub fn set_premultiplied(&mut self, premultiplied: bool) {
        dispatch_any!(AnyImage, self, img => img.set_premultiplied(premultiplied))
    }

    /// Raw pixel bytes in native byte order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        dispatch_any!(AnyImage, self, img => img.as_bytes())
    }

    /// Reads `(x, y)` converted to `T`.
    #[inline]
    pub fn get_pixel<T: AnyPixelValue>(&self, x: u32, y: u32) -> T {
        dispatch_any!(AnyImage, self, img => crate::access::get_pixel(img, x, y))
    }

    /// Converts `value` and writes it at `(x, y)`.
    #[inline]
    pub fn set_pixel<T: AnyPixelValue>(&mut self, x: u32, y: u32, value: T) {
        dispatch_any!(AnyImage, self, img => crate::access::set_pixel(img, x, y, value))
    }

    /// Type-erased view over the whole image.
    pub fn as_view(&self) -> AnyView<'_> {
        dispatch_any!(AnyImage, self, img => img.as_view().into())
    }

    /// Type-erased view over `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`](crate::Error::OutOfRange) unless `region`
    /// lies entirely inside the image.
    pub fn view(&self, region: Rect) -> Result<AnyView<'_>> {
        dispatch_any!(AnyImage, self, img => img.view(region).map(Into::into))
    }

    /// Borrows the RGBA8 image, if that is the held format.
    pub fn as_rgba8(&self) -> Option<&Image<Rgba8>> {
        match self {
            Self::Rgba8(img) => Some(img),
            _ => None,
        }
    }

    /// Mutably borrows the RGBA8 image, if that is the held format.
    pub fn as_rgba8_mut(&mut self) -> Option<&mut Image<Rgba8>> {
        match self {
            Self::Rgba8(img) => Some(img),
            _ => None,
        }
    }
}

/// A borrowed view of any supported pixel format.
#[derive(Debug, Clone, Copy)]
pub enum AnyView<'a> {
    /// 8-bit RGBA
    Rgba8(ImageView<'a, Rgba8>),
    /// 8-bit grayscale
    Gray8(ImageView<'a, Gray8>),
    /// 16-bit grayscale
    Gray16(ImageView<'a, Gray16>),
    /// 32-bit float grayscale
    Gray32f(ImageView<'a, Gray32f>),
}

impl<'a> AnyView<'a> {
    /// Pixel format tag.
    #[inline]
    pub fn kind(&self) -> PixelKind {
        match self {
            Self::Rgba8(_) => PixelKind::Rgba8,
            Self::Gray8(_) => PixelKind::Gray8,
            Self::Gray16(_) => PixelKind::Gray16,
            Self::Gray32f(_) => PixelKind::Gray32f,
        }
    }

    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        dispatch_any!(AnyView, self, view => view.width())
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        dispatch_any!(AnyView, self, view => view.height())
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Region of the source image this view covers.
    #[inline]
    pub fn region(&self) -> Rect {
        dispatch_any!(AnyView, self, view => view.region())
    }

    /// Alpha state of the source image.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        dispatch_any!(AnyView, self, view => view.is_premultiplied())
    }

    /// `true` iff `(x, y)` lies inside the view.
    #[inline]
    pub fn check_bounds(&self, x: i64, y: i64) -> bool {
        dispatch_any!(AnyView, self, view => view.check_bounds(x, y))
    }

    /// Reads `(x, y)` relative to the view origin, converted to `T`.
    #[inline]
    pub fn get_pixel<T: AnyPixelValue>(&self, x: u32, y: u32) -> T {
        dispatch_any!(AnyView, self, view => crate::access::get_pixel(view, x, y))
    }

    /// One row of the view as raw bytes in native byte order.
    #[inline]
    pub fn row_bytes(&self, y: u32) -> &'a [u8] {
        dispatch_any!(AnyView, self, view => view.row_bytes(y))
    }

    /// Copies the viewed pixels into a new owned image.
    pub fn to_image(&self) -> AnyImage {
        dispatch_any!(AnyView, self, view => view.to_image().into())
    }
}

macro_rules! impl_any_from {
    ($($variant:ident),*) => {$(
        impl From<Image<$variant>> for AnyImage {
            fn from(img: Image<$variant>) -> Self {
                Self::$variant(img)
            }
        }

        impl<'a> From<ImageView<'a, $variant>> for AnyView<'a> {
            fn from(view: ImageView<'a, $variant>) -> Self {
                Self::$variant(view)
            }
        }

        impl<'a> From<&'a Image<$variant>> for AnyView<'a> {
            fn from(img: &'a Image<$variant>) -> Self {
                Self::$variant(img.as_view())
            }
        }
    )*};
}

impl_any_from!(Rgba8, Gray8, Gray16, Gray32f);

impl<'a> From<&'a AnyImage> for AnyView<'a> {
    fn from(img: &'a AnyImage) -> Self {
        img.as_view()
    }
}
