//! Rectangle type for views and blits.
//!
//! All coordinates use the usual raster convention: origin at the
//! **top-left** corner, X to the right, Y downward.
//!
//! ```rust
//! use pixmill_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert_eq!(rect.right(), 110);
//! assert_eq!(rect.bottom(), 70);
//! assert!(rect.fits_within(110, 70));
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at (0, 0) with the given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// X coordinate of the right edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Y coordinate of the bottom edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns the area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if this rectangle lies entirely inside a
    /// `width` x `height` image.
    ///
    /// Uses 64-bit arithmetic so that `x + width` cannot wrap.
    ///
    /// ```rust
    /// use pixmill_core::Rect;
    ///
    /// assert!(Rect::new(2, 2, 2, 2).fits_within(4, 4));
    /// assert!(!Rect::new(3, 0, 2, 1).fits_within(4, 4));
    /// assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(4, 4));
    /// ```
    #[inline]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}
