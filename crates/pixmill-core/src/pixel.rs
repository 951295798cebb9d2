//! Pixel formats and numeric conversion policy.
//!
//! Every supported pixel encoding is a zero-sized marker type implementing
//! [`PixelType`]. The trait carries the format's static description (channel
//! count, bit width, value domain, alpha) and the small set of per-pixel
//! primitives the rest of the workspace builds on, so no other module has to
//! hard-code format assumptions.
//!
//! | Marker | Native value | Channels | Bits | Alpha |
//! |--------|--------------|----------|------|-------|
//! | [`Rgba8`] | `[u8; 4]` | 4 | 8 | yes |
//! | [`Gray8`] | `u8` | 1 | 8 | no |
//! | [`Gray16`] | `u16` | 1 | 16 | no |
//! | [`Gray32f`] | `f32` | 1 | 32 | no |
//!
//! # Conversion policy
//!
//! Values cross the boundary between a format's native representation and a
//! caller-chosen numeric type through [`PixelConvert`]. One rule applies to
//! every format:
//!
//! 1. the value is interpreted in *native units* (no normalisation),
//! 2. it is rounded to nearest (half away from zero) when the target is an
//!    integer type,
//! 3. it saturates to the target domain; NaN becomes 0 for integer targets.
//!
//! RGBA8 pixels convert to and from scalars through their packed 32-bit form
//! `0xAABBGGRR` (red in the low byte).
//!
//! ```
//! use pixmill_core::pixel::{Gray8, PixelConvert};
//!
//! assert_eq!(<f64 as PixelConvert<Gray8>>::into_pixel(300.0), 255);
//! assert_eq!(<f64 as PixelConvert<Gray8>>::into_pixel(12.5), 13);
//! assert_eq!(<i32 as PixelConvert<Gray8>>::into_pixel(-4), 0);
//! ```

use bytemuck::Pod;
use std::fmt;

/// Runtime tag naming one of the supported pixel formats.
///
/// This is the dynamic mirror of the [`PixelType`] markers, used by the
/// type-erased [`AnyImage`](crate::AnyImage) wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// 8-bit RGBA.
    Rgba8,
    /// 8-bit grayscale.
    Gray8,
    /// 16-bit grayscale.
    Gray16,
    /// 32-bit float grayscale.
    Gray32f,
}

impl PixelKind {
    /// Short format name, e.g. `"rgba8"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rgba8 => Rgba8::NAME,
            Self::Gray8 => Gray8::NAME,
            Self::Gray16 => Gray16::NAME,
            Self::Gray32f => Gray32f::NAME,
        }
    }

    /// Channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgba8 => Rgba8::CHANNELS,
            Self::Gray8 => Gray8::CHANNELS,
            Self::Gray16 => Gray16::CHANNELS,
            Self::Gray32f => Gray32f::CHANNELS,
        }
    }

    /// Bits per channel.
    pub const fn bits_per_channel(self) -> u32 {
        match self {
            Self::Rgba8 => Rgba8::BITS_PER_CHANNEL,
            Self::Gray8 => Gray8::BITS_PER_CHANNEL,
            Self::Gray16 => Gray16::BITS_PER_CHANNEL,
            Self::Gray32f => Gray32f::BITS_PER_CHANNEL,
        }
    }

    /// Bytes per pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bits_per_channel() as usize / 8
    }

    /// Whether the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8)
    }

    /// Whether channel values are floating point.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Gray32f)
    }
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description and per-pixel primitives of a pixel format.
///
/// Implemented only by the four marker types of this module. The alpha
/// primitives default to identity, which is the correct behaviour for
/// formats without alpha.
pub trait PixelType: Copy + Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Native pixel value stored in the buffer.
    type Value: Pod + PartialEq + Default + fmt::Debug + Send + Sync;

    /// Short format name.
    const NAME: &'static str;
    /// Runtime tag for this format.
    const KIND: PixelKind;
    /// Channels per pixel.
    const CHANNELS: usize;
    /// Bits per channel.
    const BITS_PER_CHANNEL: u32;
    /// Whether the format carries alpha (and thus a meaningful premultiplied flag).
    const HAS_ALPHA: bool;
    /// Whether channel values are floating point.
    const IS_FLOAT: bool;
    /// Smallest channel value.
    const CHANNEL_MIN: f64;
    /// Largest channel value.
    const CHANNEL_MAX: f64;
    /// Bytes per pixel.
    const BYTES_PER_PIXEL: usize = Self::CHANNELS * Self::BITS_PER_CHANNEL as usize / 8;

    /// Largest absolute per-channel difference between two pixels, in native
    /// channel units. Alpha takes part only when `include_alpha` is set.
    fn max_channel_diff(a: Self::Value, b: Self::Value, include_alpha: bool) -> f64;

    /// Alpha as a fraction in `[0, 1]`; `1.0` for formats without alpha.
    #[inline]
    fn alpha(_value: Self::Value) -> f64 {
        1.0
    }

    /// Straight -> premultiplied for a single pixel.
    #[inline]
    fn premultiply(value: Self::Value) -> Self::Value {
        value
    }

    /// Premultiplied -> straight for a single pixel.
    #[inline]
    fn demultiply(value: Self::Value) -> Self::Value {
        value
    }

    /// Multiplies the alpha channel by `factor` (already clamped to `[0, 1]`).
    #[inline]
    fn scale_alpha(value: Self::Value, _factor: f64) -> Self::Value {
        value
    }
}

/// 8-bit RGBA, stored as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba8;

/// 8-bit grayscale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gray8;

/// 16-bit grayscale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gray16;

/// 32-bit float grayscale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gray32f;

/// `round(a * b / 255)` for 8-bit channels.
#[inline]
pub(crate) fn mul_div_255(a: u8, b: u8) -> u8 {
    ((2 * a as u32 * b as u32 + 255) / 510) as u8
}

impl PixelType for Rgba8 {
    type Value = [u8; 4];

    const NAME: &'static str = "rgba8";
    const KIND: PixelKind = PixelKind::Rgba8;
    const CHANNELS: usize = 4;
    const BITS_PER_CHANNEL: u32 = 8;
    const HAS_ALPHA: bool = true;
    const IS_FLOAT: bool = false;
    const CHANNEL_MIN: f64 = 0.0;
    const CHANNEL_MAX: f64 = 255.0;

    #[inline]
    fn max_channel_diff(a: [u8; 4], b: [u8; 4], include_alpha: bool) -> f64 {
        let n = if include_alpha { 4 } else { 3 };
        a.iter()
            .zip(b.iter())
            .take(n)
            .map(|(&x, &y)| x.abs_diff(y))
            .max()
            .unwrap_or(0) as f64
    }

    #[inline]
    fn alpha(value: [u8; 4]) -> f64 {
        value[3] as f64 / 255.0
    }

    #[inline]
    fn premultiply(value: [u8; 4]) -> [u8; 4] {
        let a = value[3];
        match a {
            255 => value,
            0 => [0, 0, 0, 0],
            _ => [
                mul_div_255(value[0], a),
                mul_div_255(value[1], a),
                mul_div_255(value[2], a),
                a,
            ],
        }
    }

    #[inline]
    fn demultiply(value: [u8; 4]) -> [u8; 4] {
        let a = value[3] as u32;
        match a {
            255 => value,
            0 => [0, 0, 0, 0],
            _ => {
                let div = |c: u8| ((2 * c as u32 * 255 + a) / (2 * a)).min(255) as u8;
                [div(value[0]), div(value[1]), div(value[2]), value[3]]
            }
        }
    }

    #[inline]
    fn scale_alpha(value: [u8; 4], factor: f64) -> [u8; 4] {
        let a = (value[3] as f64 * factor).round() as u8;
        [value[0], value[1], value[2], a]
    }
}

macro_rules! impl_gray_type {
    ($marker:ty, $value:ty, $name:literal, $kind:ident, $bits:literal, $float:literal, $min:expr, $max:expr) => {
        impl PixelType for $marker {
            type Value = $value;

            const NAME: &'static str = $name;
            const KIND: PixelKind = PixelKind::$kind;
            const CHANNELS: usize = 1;
            const BITS_PER_CHANNEL: u32 = $bits;
            const HAS_ALPHA: bool = false;
            const IS_FLOAT: bool = $float;
            const CHANNEL_MIN: f64 = $min;
            const CHANNEL_MAX: f64 = $max;

            #[inline]
            fn max_channel_diff(a: $value, b: $value, _include_alpha: bool) -> f64 {
                (a as f64 - b as f64).abs()
            }
        }
    };
}

impl_gray_type!(Gray8, u8, "gray8", Gray8, 8, false, 0.0, 255.0);
impl_gray_type!(Gray16, u16, "gray16", Gray16, 16, false, 0.0, 65535.0);
impl_gray_type!(Gray32f, f32, "gray32f", Gray32f, 32, true, f32::MIN as f64, f32::MAX as f64);

/// Scalar numeric types usable as external pixel values.
///
/// `from_f64` implements the crate-wide conversion policy: round to nearest
/// for integer targets, then saturate to the target's domain.
pub trait Sample: Copy + PartialOrd + Default + fmt::Debug + Send + Sync + 'static {
    /// Widens to `f64`.
    fn to_f64(self) -> f64;
    /// Narrows from `f64`, rounding and saturating.
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            // `as` from float to int saturates and maps NaN to 0.
            #[inline]
            fn from_f64(v: f64) -> Self {
                v.round() as $t
            }
        }
    )*};
}

impl_sample_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v.clamp(f32::MIN as f64, f32::MAX as f64) as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// Conversion between a format's native pixel value and an external type.
///
/// Implemented for every [`Sample`] type against every format, for
/// `[u8; 4]` against [`Rgba8`], and for [`Color`](crate::Color) against
/// [`Rgba8`].
pub trait PixelConvert<F: PixelType>: Sized {
    /// Converts a native pixel value into `Self`.
    fn from_pixel(value: F::Value) -> Self;
    /// Converts `self` into the native pixel value.
    fn into_pixel(self) -> F::Value;
}

macro_rules! impl_convert_gray {
    ($marker:ty, $value:ty; $($t:ty),*) => {$(
        impl PixelConvert<$marker> for $t {
            #[inline]
            fn from_pixel(value: $value) -> Self {
                <$t as Sample>::from_f64(value.to_f64())
            }

            #[inline]
            fn into_pixel(self) -> $value {
                <$value as Sample>::from_f64(self.to_f64())
            }
        }
    )*};
}

impl_convert_gray!(Gray8, u8; u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_convert_gray!(Gray16, u16; u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
impl_convert_gray!(Gray32f, f32; u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

macro_rules! impl_convert_packed {
    ($($t:ty),*) => {$(
        impl PixelConvert<Rgba8> for $t {
            #[inline]
            fn from_pixel(value: [u8; 4]) -> Self {
                <$t as Sample>::from_f64(u32::from_le_bytes(value) as f64)
            }

            #[inline]
            fn into_pixel(self) -> [u8; 4] {
                <u32 as Sample>::from_f64(self.to_f64()).to_le_bytes()
            }
        }
    )*};
}

impl_convert_packed!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl PixelConvert<Rgba8> for [u8; 4] {
    #[inline]
    fn from_pixel(value: [u8; 4]) -> Self {
        value
    }

    #[inline]
    fn into_pixel(self) -> [u8; 4] {
        self
    }
}

/// Packs an RGBA8 pixel into `0xAABBGGRR`.
#[inline]
pub fn pack_rgba(value: [u8; 4]) -> u32 {
    u32::from_le_bytes(value)
}

/// Unpacks `0xAABBGGRR` into an RGBA8 pixel.
#[inline]
pub fn unpack_rgba(packed: u32) -> [u8; 4] {
    packed.to_le_bytes()
}
