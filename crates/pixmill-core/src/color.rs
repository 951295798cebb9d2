//! RGBA color value with alpha-state tracking.
//!
//! A [`Color`] knows whether its channels are premultiplied, so it can be
//! brought into the alpha state of the image it is written into.
//!
//! ```rust
//! use pixmill_core::Color;
//!
//! let c = Color::rgba(255, 128, 0, 128);
//! assert_eq!(c.packed(), 0x800080ff);
//!
//! let pre = c.premultiplied();
//! assert_eq!((pre.r, pre.g, pre.b, pre.a), (128, 64, 0, 128));
//! assert!(pre.is_premultiplied());
//! ```

use crate::pixel::{PixelConvert, PixelType, Rgba8};
use std::fmt;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
    premultiplied: bool,
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl Color {
    /// Opaque color with straight alpha.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color with straight alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            premultiplied: false,
        }
    }

    /// Unpacks `0xAABBGGRR` (straight alpha).
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self::rgba(r, g, b, a)
    }

    /// Packs into `0xAABBGGRR`.
    #[inline]
    pub const fn packed(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether the color channels are premultiplied by alpha.
    #[inline]
    pub const fn is_premultiplied(&self) -> bool {
        self.premultiplied
    }

    /// Marks the color as premultiplied or straight without touching the channels.
    #[inline]
    pub const fn with_premultiplied(mut self, premultiplied: bool) -> Self {
        self.premultiplied = premultiplied;
        self
    }

    /// Returns the premultiplied form (unchanged if already premultiplied).
    pub fn premultiplied(self) -> Self {
        if self.premultiplied {
            return self;
        }
        let [r, g, b, a] = Rgba8::premultiply(self.to_array());
        Self {
            r,
            g,
            b,
            a,
            premultiplied: true,
        }
    }

    /// Returns the straight-alpha form (unchanged if already straight).
    pub fn demultiplied(self) -> Self {
        if !self.premultiplied {
            return self;
        }
        let [r, g, b, a] = Rgba8::demultiply(self.to_array());
        Self::rgba(r, g, b, a)
    }

    /// Converts to the requested alpha state.
    #[inline]
    pub fn to_alpha_state(self, premultiplied: bool) -> Self {
        if premultiplied {
            self.premultiplied()
        } else {
            self.demultiplied()
        }
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.packed()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Stored channels are taken as-is; a color read back from a buffer is
/// reported as straight since a single pixel does not carry the image's flag.
impl PixelConvert<Rgba8> for Color {
    #[inline]
    fn from_pixel(value: [u8; 4]) -> Self {
        let [r, g, b, a] = value;
        Self::rgba(r, g, b, a)
    }

    #[inline]
    fn into_pixel(self) -> [u8; 4] {
        self.to_array()
    }
}
