//! SVG compositing on premultiplied RGBA8.
//!
//! [`CompOp`] covers the SVG compositing set (the twelve Porter-Duff
//! operators plus `plus`, `minus` and the separable blend modes). Every
//! operator works on premultiplied values in `f64` `[0, 1]` space:
//! `Sca`/`Sa` are the source color and alpha, `Dca`/`Da` the destination.
//!
//! Both source and destination must be premultiplied. This is not checked:
//! straight input gives wrong colors, never a failure.
//!
//! # Coverage and opacity
//!
//! [`composite_pixel`] scales the source by `coverage * opacity`, so the
//! effective source alpha is `Sa * coverage * opacity`. An effective alpha of
//! zero leaves the destination untouched. Operators whose result does not
//! scale with the source (`clear`, `src`, `src-in`, `dst-in`, `src-out`,
//! `dst-out`, `dst-atop`) instead interpolate between the destination and
//! the full-strength result.
//!
//! # Example
//!
//! ```rust
//! use pixmill_core::{Image, Rgba8};
//! use pixmill_ops::composite::{composite_pixel, CompOp};
//!
//! let mut img: Image<Rgba8> = Image::filled(2, 2, [0, 0, 255, 255]);
//! img.set_premultiplied(true);
//!
//! // Opaque red, full coverage: src-over overwrites.
//! composite_pixel(&mut img, CompOp::SrcOver, 0, 0, 0xff0000ff, 1.0, 1.0);
//! assert_eq!(img.pixel(0, 0), [255, 0, 0, 255]);
//!
//! // Half-transparent premultiplied red over blue.
//! composite_pixel(&mut img, CompOp::SrcOver, 1, 0, 0x80000080, 1.0, 1.0);
//! assert_eq!(img.pixel(1, 0), [128, 0, 127, 255]);
//! ```

use crate::region::placement_overlap;
use crate::{OpsError, OpsResult};
use pixmill_core::{AnyImage, Image, PixelBuffer, Rgba8};
use std::fmt;
use std::str::FromStr;
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

/// SVG compositing operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompOp {
    /// `Dca' = 0`, `Da' = 0`
    Clear,
    /// `Dca' = Sca`, `Da' = Sa`
    Src,
    /// Destination unchanged.
    Dst,
    /// `Dca' = Sca + Dca.(1 - Sa)`
    #[default]
    SrcOver,
    /// `Dca' = Dca + Sca.(1 - Da)`
    DstOver,
    /// `Dca' = Sca.Da`
    SrcIn,
    /// `Dca' = Dca.Sa`
    DstIn,
    /// `Dca' = Sca.(1 - Da)`
    SrcOut,
    /// `Dca' = Dca.(1 - Sa)`
    DstOut,
    /// `Dca' = Sca.Da + Dca.(1 - Sa)`, `Da' = Da`
    SrcAtop,
    /// `Dca' = Dca.Sa + Sca.(1 - Da)`, `Da' = Sa`
    DstAtop,
    /// `Dca' = Sca.(1 - Da) + Dca.(1 - Sa)`
    Xor,
    /// `Dca' = Sca + Dca`, saturated
    Plus,
    /// `Dca' = Dca - Sca`, floored at zero
    Minus,
    /// Multiply blend.
    Multiply,
    /// Screen blend.
    Screen,
    /// Overlay blend.
    Overlay,
    /// Darken blend.
    Darken,
    /// Lighten blend.
    Lighten,
    /// Color dodge blend.
    ColorDodge,
    /// Color burn blend.
    ColorBurn,
    /// Hard light blend.
    HardLight,
    /// Soft light blend.
    SoftLight,
    /// Difference blend.
    Difference,
    /// Exclusion blend.
    Exclusion,
}

impl CompOp {
    /// Every operator, in declaration order.
    pub const ALL: [CompOp; 25] = [
        Self::Clear,
        Self::Src,
        Self::Dst,
        Self::SrcOver,
        Self::DstOver,
        Self::SrcIn,
        Self::DstIn,
        Self::SrcOut,
        Self::DstOut,
        Self::SrcAtop,
        Self::DstAtop,
        Self::Xor,
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
    ];

    /// Hyphenated SVG name, e.g. `"src-over"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Src => "src",
            Self::Dst => "dst",
            Self::SrcOver => "src-over",
            Self::DstOver => "dst-over",
            Self::SrcIn => "src-in",
            Self::DstIn => "dst-in",
            Self::SrcOut => "src-out",
            Self::DstOut => "dst-out",
            Self::SrcAtop => "src-atop",
            Self::DstAtop => "dst-atop",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }

    /// Operators whose partial coverage interpolates between the
    /// destination and the full-strength result.
    #[inline]
    fn interpolates_coverage(self) -> bool {
        matches!(
            self,
            Self::Clear
                | Self::Src
                | Self::SrcIn
                | Self::DstIn
                | Self::SrcOut
                | Self::DstOut
                | Self::DstAtop
        )
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompOp {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| OpsError::InvalidParameter(format!("unknown compositing operator '{s}'")))
    }
}

/// Premultiplied RGBA in `f64` `[0, 1]` working space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Premul {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Premul {
    const ZERO: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    #[inline]
    fn from_pixel(p: [u8; 4]) -> Self {
        Self {
            r: p[0] as f64 / 255.0,
            g: p[1] as f64 / 255.0,
            b: p[2] as f64 / 255.0,
            a: p[3] as f64 / 255.0,
        }
    }

    #[inline]
    fn to_pixel(self) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    fn scale(self, k: f64) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }

    #[inline]
    fn lerp(self, to: Self, k: f64) -> Self {
        Self {
            r: self.r + (to.r - self.r) * k,
            g: self.g + (to.g - self.g) * k,
            b: self.b + (to.b - self.b) * k,
            a: self.a + (to.a - self.a) * k,
        }
    }

    /// Applies `f(sca, dca)` per color channel with the given result alpha.
    #[inline]
    fn channels(s: Self, d: Self, a: f64, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            r: f(s.r, d.r),
            g: f(s.g, d.g),
            b: f(s.b, d.b),
            a,
        }
    }
}

/// `Sa + Da - Sa.Da`, the result alpha of the blend modes.
#[inline]
fn union_alpha(sa: f64, da: f64) -> f64 {
    sa + da - sa * da
}

fn overlay(sca: f64, dca: f64, sa: f64, da: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if 2.0 * dca <= da {
        2.0 * sca * dca + tail
    } else {
        sa * da - 2.0 * (da - dca) * (sa - sca) + tail
    }
}

fn hard_light(sca: f64, dca: f64, sa: f64, da: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if 2.0 * sca <= sa {
        2.0 * sca * dca + tail
    } else {
        sa * da - 2.0 * (da - dca) * (sa - sca) + tail
    }
}

fn color_dodge(sca: f64, dca: f64, sa: f64, da: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if sca < sa {
        sa * da * (dca / da * sa / (sa - sca)).min(1.0) + tail
    } else if dca > 0.0 {
        sa * da + tail
    } else {
        sca * (1.0 - da)
    }
}

fn color_burn(sca: f64, dca: f64, sa: f64, da: f64) -> f64 {
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if sca > 0.0 {
        sa * da * (1.0 - ((1.0 - dca / da) * sa / sca).min(1.0)) + tail
    } else if dca >= da {
        sa * da + dca * (1.0 - sa)
    } else {
        dca * (1.0 - sa)
    }
}

fn soft_light(sca: f64, dca: f64, sa: f64, da: f64) -> f64 {
    let m = dca / da;
    let tail = sca * (1.0 - da) + dca * (1.0 - sa);
    if 2.0 * sca <= sa {
        dca * (sa + (2.0 * sca - sa) * (1.0 - m)) + tail
    } else if 4.0 * dca <= da {
        dca * sa + da * (2.0 * sca - sa) * (4.0 * m * (4.0 * m + 1.0) * (m - 1.0) + 7.0 * m) + tail
    } else {
        dca * sa + da * (2.0 * sca - sa) * (m.sqrt() - m) + tail
    }
}

/// Full-strength result of `op` for source `s` over destination `d`.
fn blend(op: CompOp, s: Premul, d: Premul) -> Premul {
    let (sa, da) = (s.a, d.a);
    match op {
        CompOp::Clear => Premul::ZERO,
        CompOp::Src => s,
        CompOp::Dst => d,
        CompOp::SrcOver => Premul::channels(s, d, sa + da * (1.0 - sa), |sc, dc| sc + dc * (1.0 - sa)),
        CompOp::DstOver => Premul::channels(s, d, da + sa * (1.0 - da), |sc, dc| dc + sc * (1.0 - da)),
        CompOp::SrcIn => s.scale(da),
        CompOp::DstIn => d.scale(sa),
        CompOp::SrcOut => s.scale(1.0 - da),
        CompOp::DstOut => d.scale(1.0 - sa),
        CompOp::SrcAtop => Premul::channels(s, d, da, |sc, dc| sc * da + dc * (1.0 - sa)),
        CompOp::DstAtop => Premul::channels(s, d, sa, |sc, dc| dc * sa + sc * (1.0 - da)),
        CompOp::Xor => Premul::channels(s, d, sa + da - 2.0 * sa * da, |sc, dc| {
            sc * (1.0 - da) + dc * (1.0 - sa)
        }),
        CompOp::Plus => {
            let a = (sa + da).min(1.0);
            Premul::channels(s, d, a, |sc, dc| (sc + dc).min(a))
        }
        CompOp::Minus => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| (dc - sc).max(0.0)),
        CompOp::Multiply => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| {
            sc * dc + sc * (1.0 - da) + dc * (1.0 - sa)
        }),
        CompOp::Screen => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| sc + dc - sc * dc),
        CompOp::Overlay => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| overlay(sc, dc, sa, da)),
        CompOp::Darken => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| {
            (sc * da).min(dc * sa) + sc * (1.0 - da) + dc * (1.0 - sa)
        }),
        CompOp::Lighten => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| {
            (sc * da).max(dc * sa) + sc * (1.0 - da) + dc * (1.0 - sa)
        }),
        CompOp::HardLight => {
            Premul::channels(s, d, union_alpha(sa, da), |sc, dc| hard_light(sc, dc, sa, da))
        }
        CompOp::Difference => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| {
            sc + dc - 2.0 * (sc * da).min(dc * sa)
        }),
        CompOp::Exclusion => Premul::channels(s, d, union_alpha(sa, da), |sc, dc| {
            sc * da + dc * sa - 2.0 * sc * dc + sc * (1.0 - da) + dc * (1.0 - sa)
        }),
        // These divide by Da; an empty destination just takes the source.
        CompOp::ColorDodge | CompOp::ColorBurn | CompOp::SoftLight if da <= 0.0 => s,
        CompOp::ColorDodge => {
            Premul::channels(s, d, union_alpha(sa, da), |sc, dc| color_dodge(sc, dc, sa, da))
        }
        CompOp::ColorBurn => {
            Premul::channels(s, d, union_alpha(sa, da), |sc, dc| color_burn(sc, dc, sa, da))
        }
        CompOp::SoftLight => {
            Premul::channels(s, d, union_alpha(sa, da), |sc, dc| soft_light(sc, dc, sa, da))
        }
    }
}

/// Composites one premultiplied source pixel onto `dst` and returns the result.
///
/// `k` is the combined coverage and opacity factor in `[0, 1]`.
#[inline]
fn composite_value(op: CompOp, src: [u8; 4], dst: [u8; 4], k: f64) -> [u8; 4] {
    if op == CompOp::Dst {
        return dst;
    }
    // Opaque src-over at full strength is an exact overwrite.
    if op == CompOp::SrcOver && src[3] == 255 && k >= 1.0 {
        return src;
    }
    let s = Premul::from_pixel(src);
    let d = Premul::from_pixel(dst);
    let out = if op.interpolates_coverage() {
        d.lerp(blend(op, s, d), k)
    } else {
        blend(op, s.scale(k), d)
    };
    out.to_pixel()
}

/// Blends the packed premultiplied color `color` (`0xAABBGGRR`) onto
/// `dst[x, y]` with operator `op`.
///
/// `coverage` and `opacity` are clamped to `[0, 1]`; the effective source
/// alpha is `alpha(color) * coverage * opacity`, and zero is a no-op.
///
/// # Panics
///
/// `(x, y)` must be inside `dst`; check with
/// [`Image::check_bounds`] first. Debug builds assert.
pub fn composite_pixel(
    dst: &mut Image<Rgba8>,
    op: CompOp,
    x: u32,
    y: u32,
    color: u32,
    coverage: f64,
    opacity: f64,
) {
    debug_assert!(x < dst.width() && y < dst.height(), "composite_pixel out of bounds");
    let src = color.to_le_bytes();
    let k = coverage.clamp(0.0, 1.0) * opacity.clamp(0.0, 1.0);
    let effective_alpha = src[3] as f64 / 255.0 * k;
    if effective_alpha <= 0.0 || effective_alpha.is_nan() {
        return;
    }
    let px = dst.pixel(x, y);
    dst.set_pixel(x, y, composite_value(op, src, px, k));
}

/// [`composite_pixel`] on a type-erased image.
///
/// Grayscale formats have no alpha to composite into; the call is a no-op.
pub fn composite_pixel_any(
    dst: &mut AnyImage,
    op: CompOp,
    x: u32,
    y: u32,
    color: u32,
    coverage: f64,
    opacity: f64,
) {
    match dst {
        AnyImage::Rgba8(img) => composite_pixel(img, op, x, y, color, coverage, opacity),
        other => warn!(pixel_format = other.kind().name(), "composite_pixel ignored for non-RGBA image"),
    }
}

/// Composites all of `src` onto `dst` at offset `(dx, dy)`.
///
/// Uses the same per-operator formulas as [`composite_pixel`] with
/// `coverage = 1`. Source pixels that land outside `dst` are dropped.
/// Both images are expected to be premultiplied.
pub fn composite<B>(dst: &mut Image<Rgba8>, src: &B, op: CompOp, opacity: f64, dx: i64, dy: i64)
where
    B: PixelBuffer<Format = Rgba8> + ?Sized,
{
    trace!(
        op = op.as_str(),
        src_w = src.width(),
        src_h = src.height(),
        dx,
        dy,
        "composite"
    );
    let k = opacity.clamp(0.0, 1.0);
    if k <= 0.0 {
        return;
    }

    let Some(area) = placement_overlap(dst.width(), dst.height(), src.width(), src.height(), dx, dy)
    else {
        debug!("composite: source does not overlap destination");
        return;
    };

    for sy in area.y..area.bottom() {
        let ty = (sy as i64 + dy) as u32;
        for sx in area.x..area.right() {
            let s = src.pixel(sx, sy);
            if s[3] == 0 && !op.interpolates_coverage() {
                continue;
            }
            let tx = (sx as i64 + dx) as u32;
            let d = dst.pixel(tx, ty);
            dst.set_pixel(tx, ty, composite_value(op, s, d, k));
        }
    }
}
