//! Alpha state transitions.
//!
//! An image is either *straight* or *premultiplied*. The transitions here
//! rewrite pixel data and flip the flag together; they report whether
//! anything changed so callers can restore the original state afterwards:
//!
//! ```rust
//! use pixmill_core::{Image, alpha::{demultiply_alpha, premultiply_alpha}, pixel::Rgba8};
//!
//! let mut img: Image<Rgba8> = Image::filled(2, 2, [255, 128, 0, 128]);
//! assert!(premultiply_alpha(&mut img));
//! assert!(!premultiply_alpha(&mut img)); // already premultiplied
//! assert_eq!(img.pixel(0, 0), [128, 64, 0, 128]);
//! assert!(demultiply_alpha(&mut img));
//! assert!(!img.is_premultiplied());
//! ```
//!
//! Formats without alpha never transition; both functions return `false`
//! and leave the flag untouched.
//!
//! Compositing expects premultiplied source and destination. That is a
//! documented precondition, not a runtime check: straight input produces
//! wrong colors, never a failure.

use crate::any::AnyImage;
use crate::dispatch_any;
use crate::image::Image;
use crate::pixel::PixelType;

/// Straight -> premultiplied. Returns `true` if the image changed state.
pub fn premultiply_alpha<F: PixelType>(image: &mut Image<F>) -> bool {
    if !F::HAS_ALPHA || image.is_premultiplied() {
        return false;
    }
    for px in image.data_mut() {
        *px = F::premultiply(*px);
    }
    image.set_premultiplied(true);
    true
}

/// Premultiplied -> straight. Returns `true` if the image changed state.
///
/// Pixels with alpha 0 come out as all-zero.
pub fn demultiply_alpha<F: PixelType>(image: &mut Image<F>) -> bool {
    if !F::HAS_ALPHA || !image.is_premultiplied() {
        return false;
    }
    for px in image.data_mut() {
        *px = F::demultiply(*px);
    }
    image.set_premultiplied(false);
    true
}

/// Force-sets the alpha-state flag without touching pixel data.
///
/// The caller is responsible for the data actually being in that state.
#[inline]
pub fn set_premultiplied_alpha<F: PixelType>(image: &mut Image<F>, status: bool) {
    image.set_premultiplied(status);
}

impl AnyImage {
    /// See [`premultiply_alpha`].
    pub fn premultiply_alpha(&mut self) -> bool {
        dispatch_any!(AnyImage, self, img => premultiply_alpha(img))
    }

    /// See [`demultiply_alpha`].
    pub fn demultiply_alpha(&mut self) -> bool {
        dispatch_any!(AnyImage, self, img => demultiply_alpha(img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Gray16, Rgba8};
    use crate::PixelKind;

    #[test]
    fn test_roundtrip_within_tolerance() {
        for a in [1u8, 17, 64, 128, 200, 255] {
            let mut img: Image<Rgba8> = Image::new(256, 1);
            for c in 0..256u32 {
                img.set_pixel(c, 0, [c as u8, 255 - c as u8, (c / 2) as u8, a]);
            }
            let original = img.clone();
            premultiply_alpha(&mut img);
            demultiply_alpha(&mut img);
            let tolerance = (255.0 / (2.0 * a as f64)).ceil() as u8 + 1;
            for (p, q) in img.data().iter().zip(original.data()) {
                for ch in 0..3 {
                    assert!(p[ch].abs_diff(q[ch]) <= tolerance, "a={a} {p:?} vs {q:?}");
                }
                assert_eq!(p[3], q[3]);
            }
        }
    }

    #[test]
    fn test_zero_alpha_collapses() {
        let mut img: Image<Rgba8> = Image::filled(1, 1, [90, 80, 70, 0]);
        premultiply_alpha(&mut img);
        demultiply_alpha(&mut img);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_gray_never_transitions() {
        let mut img: Image<Gray16> = Image::filled(2, 2, 1000);
        assert!(!premultiply_alpha(&mut img));
        assert!(!img.is_premultiplied());
        assert_eq!(img.pixel(1, 1), 1000);

        let mut any = AnyImage::new(PixelKind::Gray8, 1, 1);
        assert!(!any.premultiply_alpha());
    }

    #[test]
    fn test_set_flag_only() {
        let mut img: Image<Rgba8> = Image::filled(1, 1, [200, 100, 50, 100]);
        set_premultiplied_alpha(&mut img, true);
        assert!(img.is_premultiplied());
        assert_eq!(img.pixel(0, 0), [200, 100, 50, 100]);
        assert!(!premultiply_alpha(&mut img));
    }
}
