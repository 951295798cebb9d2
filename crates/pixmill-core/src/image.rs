//! Image buffer and view types.
//!
//! - [`Image`] - owned, contiguous pixel buffer of one [`PixelType`]
//! - [`ImageView`] - immutable window onto a rectangle of an image
//! - [`ImageViewMut`] - mutable window; writes land in the source image
//!
//! # Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom, with no row padding:
//!
//! ```text
//! Memory: [P P P P ...]  <- Row 0
//!         [P P P P ...]  <- Row 1
//! ```
//!
//! so `data.len() == width * height` native values and
//! `as_bytes().len() == width * height * F::BYTES_PER_PIXEL`.
//!
//! # Alpha state
//!
//! Every image carries a `premultiplied` flag. It is only meaningful for
//! formats with alpha; see [`crate::alpha`] for the state transitions.
//!
//! # Views
//!
//! Views borrow their source, so the borrow checker enforces that a view
//! never outlives the buffer it points into. A view is validated once, on
//! creation:
//!
//! ```rust
//! use pixmill_core::{Image, Rect, pixel::Gray8};
//!
//! let img: Image<Gray8> = Image::new(8, 8);
//! assert!(img.view(Rect::new(4, 4, 4, 4)).is_ok());
//! assert!(img.view(Rect::new(5, 4, 4, 4)).is_err());
//! ```

use crate::pixel::PixelType;
use crate::{Error, Rect, Result};
use std::fmt;
use std::marker::PhantomData;

/// Owned image buffer of pixel format `F`.
///
/// # Example
///
/// ```rust
/// use pixmill_core::{Image, pixel::Rgba8};
///
/// let mut img: Image<Rgba8> = Image::new(4, 4);
/// img.set_pixel(1, 2, [255, 0, 0, 255]);
/// assert_eq!(img.pixel(1, 2), [255, 0, 0, 255]);
/// assert_eq!(img.as_bytes().len(), 4 * 4 * 4);
/// ```
#[derive(Clone, PartialEq)]
pub struct Image<F: PixelType> {
    data: Vec<F::Value>,
    width: u32,
    height: u32,
    premultiplied: bool,
    _format: PhantomData<F>,
}

impl<F: PixelType> Image<F> {
    /// Creates a zero-filled image with straight alpha.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, F::Value::default())
    }

    /// Creates an image filled with one native value.
    pub fn filled(width: u32, height: u32, value: F::Value) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
            premultiplied: false,
            _format: PhantomData,
        }
    }

    /// Creates an image from native pixel values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<F::Value>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            premultiplied: false,
            _format: PhantomData,
        })
    }

    /// Creates an image by copying raw bytes in native byte order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the byte count does not match.
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * F::BYTES_PER_PIXEL;
        if bytes.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, bytes.len()),
            ));
        }
        let data = bytes
            .chunks_exact(F::BYTES_PER_PIXEL)
            .map(bytemuck::pod_read_unaligned::<F::Value>)
            .collect();
        Self::from_data(width, height, data)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` iff `0 <= x < width` and `0 <= y < height`.
    #[inline]
    pub fn check_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Whether color channels are premultiplied by alpha.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        self.premultiplied
    }

    /// Force-sets the alpha-state flag without touching pixel data.
    #[inline]
    pub fn set_premultiplied(&mut self, premultiplied: bool) {
        self.premultiplied = premultiplied;
    }

    /// Native pixel values, row-major.
    #[inline]
    pub fn data(&self) -> &[F::Value] {
        &self.data
    }

    /// Mutable native pixel values, row-major.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [F::Value] {
        &mut self.data
    }

    /// Consumes the image, returning its pixel values.
    #[inline]
    pub fn into_data(self) -> Vec<F::Value> {
        self.data
    }

    /// Raw pixel bytes in native byte order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Native value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `(x, y)` is in bounds; release builds rely on
    /// the slice bounds check, which catches only offsets past the buffer end.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> F::Value {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Writes the native value at `(x, y)`. Same preconditions as [`pixel`](Self::pixel).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: F::Value) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        self.data[offset] = value;
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[F::Value] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// One mutable row of pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [F::Value] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        let width = self.width as usize;
        &mut self.data[start..start + width]
    }

    /// Sets every pixel to `value`.
    pub fn fill(&mut self, value: F::Value) {
        self.data.fill(value);
    }

    /// View over the whole image.
    #[inline]
    pub fn as_view(&self) -> ImageView<'_, F> {
        ImageView {
            image: self,
            region: self.bounds(),
        }
    }

    /// Mutable view over the whole image.
    #[inline]
    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, F> {
        let region = self.bounds();
        ImageViewMut {
            image: self,
            region,
        }
    }

    /// View over `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `region` lies entirely inside the image.
    pub fn view(&self, region: Rect) -> Result<ImageView<'_, F>> {
        self.validate(region)?;
        Ok(ImageView {
            image: self,
            region,
        })
    }

    /// Mutable view over `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `region` lies entirely inside the image.
    pub fn view_mut(&mut self, region: Rect) -> Result<ImageViewMut<'_, F>> {
        self.validate(region)?;
        Ok(ImageViewMut {
            image: self,
            region,
        })
    }

    fn validate(&self, region: Rect) -> Result<()> {
        if region.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(Error::out_of_range(
                region.x,
                region.y,
                region.width,
                region.height,
                self.dimensions(),
            ))
        }
    }
}

impl<F: PixelType> fmt::Debug for Image<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &F::NAME)
            .field("premultiplied", &self.premultiplied)
            .finish()
    }
}

/// Immutable window onto a rectangle of an [`Image`].
///
/// Coordinates passed to the accessors are relative to the view origin.
pub struct ImageView<'a, F: PixelType> {
    image: &'a Image<F>,
    region: Rect,
}

// Manual impls: derive would require `F: Clone`/`F: Copy` bounds on the marker.
impl<F: PixelType> Clone for ImageView<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: PixelType> Copy for ImageView<'_, F> {}

impl<'a, F: PixelType> ImageView<'a, F> {
    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.region.width, self.region.height)
    }

    /// Region of the source image this view covers.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// The image this view points into.
    #[inline]
    pub fn source(&self) -> &'a Image<F> {
        self.image
    }

    /// Alpha state of the source image.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        self.image.premultiplied
    }

    /// `true` iff `(x, y)` lies inside the view.
    #[inline]
    pub fn check_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.region.width as i64 && y < self.region.height as i64
    }

    /// Native value at `(x, y)` relative to the view origin.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> F::Value {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image.pixel(self.region.x + x, self.region.y + y)
    }

    /// One row of the view.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [F::Value] {
        debug_assert!(y < self.region.height, "row out of bounds");
        let row = self.image.row(self.region.y + y);
        &row[self.region.x as usize..self.region.right() as usize]
    }

    /// One row of the view as raw bytes.
    #[inline]
    pub fn row_bytes(&self, y: u32) -> &'a [u8] {
        bytemuck::cast_slice(self.row(y))
    }

    /// Iterates over pixels with view-relative coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, F::Value)> + '_ {
        (0..self.region.height)
            .flat_map(move |y| (0..self.region.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Sub-view relative to this view's origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `region` lies entirely inside this view.
    pub fn subview(&self, region: Rect) -> Result<ImageView<'a, F>> {
        if !region.fits_within(self.region.width, self.region.height) {
            return Err(Error::out_of_range(
                region.x,
                region.y,
                region.width,
                region.height,
                self.dimensions(),
            ));
        }
        Ok(ImageView {
            image: self.image,
            region: Rect::new(
                self.region.x + region.x,
                self.region.y + region.y,
                region.width,
                region.height,
            ),
        })
    }

    /// Copies the viewed pixels into a new owned image, keeping the alpha state.
    pub fn to_image(&self) -> Image<F> {
        let mut data = Vec::with_capacity(self.region.area() as usize);
        for y in 0..self.region.height {
            data.extend_from_slice(self.row(y));
        }
        Image {
            data,
            width: self.region.width,
            height: self.region.height,
            premultiplied: self.image.premultiplied,
            _format: PhantomData,
        }
    }
}

impl<F: PixelType> fmt::Debug for ImageView<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("region", &self.region)
            .field("format", &F::NAME)
            .finish()
    }
}

/// Mutable window onto a rectangle of an [`Image`].
pub struct ImageViewMut<'a, F: PixelType> {
    image: &'a mut Image<F>,
    region: Rect,
}

impl<F: PixelType> ImageViewMut<'_, F> {
    /// View width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// View height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.region.width, self.region.height)
    }

    /// Region of the source image this view covers.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Alpha state of the source image.
    #[inline]
    pub fn is_premultiplied(&self) -> bool {
        self.image.premultiplied
    }

    /// `true` iff `(x, y)` lies inside the view.
    #[inline]
    pub fn check_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.region.width as i64 && y < self.region.height as i64
    }

    /// Native value at `(x, y)` relative to the view origin.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> F::Value {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image.pixel(self.region.x + x, self.region.y + y)
    }

    /// Writes the native value at `(x, y)` relative to the view origin.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: F::Value) {
        debug_assert!(x < self.region.width && y < self.region.height);
        self.image
            .set_pixel(self.region.x + x, self.region.y + y, value);
    }

    /// One mutable row of the view.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [F::Value] {
        debug_assert!(y < self.region.height, "row out of bounds");
        let (x0, x1) = (self.region.x as usize, self.region.right() as usize);
        &mut self.image.row_mut(self.region.y + y)[x0..x1]
    }

    /// Sets every pixel of the view to `value`.
    pub fn fill(&mut self, value: F::Value) {
        for y in 0..self.region.height {
            self.row_mut(y).fill(value);
        }
    }

    /// Copies pixels from a same-sized view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the sizes differ.
    pub fn copy_from(&mut self, src: &ImageView<'_, F>) -> Result<()> {
        if self.dimensions() != src.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), src.dimensions()));
        }
        for y in 0..self.region.height {
            self.row_mut(y).copy_from_slice(src.row(y));
        }
        Ok(())
    }
}

impl<F: PixelType> fmt::Debug for ImageViewMut<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageViewMut")
            .field("region", &self.region)
            .field("format", &F::NAME)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Gray16, Gray32f, Gray8, Rgba8};

    #[test]
    fn test_image_new() {
        let img: Image<Gray16> = Image::new(10, 5);
        assert_eq!(img.dimensions(), (10, 5));
        assert_eq!(img.pixel_count(), 50);
        assert_eq!(img.as_bytes().len(), 100);
        assert!(!img.is_premultiplied());
        assert!(img.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_image_from_data_wrong_size() {
        let result: Result<Image<Gray8>> = Image::from_data(4, 4, vec![0; 15]);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_image_from_bytes() {
        let bytes = 1.5f32.to_ne_bytes();
        let img: Image<Gray32f> = Image::from_bytes(1, 1, &bytes).unwrap();
        assert_eq!(img.pixel(0, 0), 1.5);
        assert!(Image::<Gray32f>::from_bytes(1, 1, &bytes[..3]).is_err());
    }

    #[test]
    fn test_check_bounds() {
        let img: Image<Gray8> = Image::new(3, 2);
        assert!(img.check_bounds(0, 0));
        assert!(img.check_bounds(2, 1));
        assert!(!img.check_bounds(3, 1));
        assert!(!img.check_bounds(0, 2));
        assert!(!img.check_bounds(-1, 0));
    }

    #[test]
    fn test_view_out_of_range() {
        let img: Image<Rgba8> = Image::new(4, 4);
        let err = img.view(Rect::new(2, 0, 3, 1)).unwrap_err();
        assert!(err.is_bounds_error());
        assert!(img.view(Rect::new(0, 3, 1, 2)).is_err());
        assert!(img.view(Rect::new(u32::MAX, 0, 2, 1)).is_err());
    }

    #[test]
    fn test_view_reads_source() {
        let mut img: Image<Gray8> = Image::new(4, 4);
        img.set_pixel(2, 3, 7);
        let view = img.view(Rect::new(1, 2, 3, 2)).unwrap();
        assert_eq!(view.pixel(1, 1), 7);
        assert_eq!(view.row(1), &[0, 7, 0]);
        assert_eq!(view.to_image().pixel(1, 1), 7);
    }

    #[test]
    fn test_view_mut_writes_through() {
        let mut img: Image<Gray16> = Image::new(4, 4);
        {
            let mut view = img.view_mut(Rect::new(1, 1, 2, 2)).unwrap();
            view.fill(500);
            view.set_pixel(0, 0, 9);
        }
        assert_eq!(img.pixel(1, 1), 9);
        assert_eq!(img.pixel(2, 2), 500);
        assert_eq!(img.pixel(0, 0), 0);
        assert_eq!(img.pixel(3, 3), 0);
    }

    #[test]
    fn test_subview() {
        let img: Image<Gray8> = Image::filled(6, 6, 1);
        let view = img.view(Rect::new(2, 2, 4, 4)).unwrap();
        let sub = view.subview(Rect::new(1, 1, 3, 3)).unwrap();
        assert_eq!(sub.region(), Rect::new(3, 3, 3, 3));
        assert!(view.subview(Rect::new(2, 2, 3, 3)).is_err());
    }

    #[test]
    fn test_copy_from_mismatch() {
        let src: Image<Gray8> = Image::new(2, 2);
        let mut dst: Image<Gray8> = Image::new(4, 4);
        let mut view = dst.as_view_mut();
        assert!(view.copy_from(&src.as_view()).is_err());
    }
}
