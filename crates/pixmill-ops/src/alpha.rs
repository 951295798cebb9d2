//! Alpha-channel operations: global opacity, luminance masks, color keys.
//!
//! All three work on straight color values. A premultiplied image is
//! demultiplied first and premultiplied again afterwards, so the alpha state
//! the caller sees never changes.
//!
//! Formats without alpha are left untouched.

use pixmill_core::alpha::{demultiply_alpha, premultiply_alpha};
use pixmill_core::{AnyImage, Color, Image, PixelType, Rgba8};
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

/// Luma weights used to turn a color into mask coverage.
const LUMA_R: f64 = 0.3;
const LUMA_G: f64 = 0.59;
const LUMA_B: f64 = 0.11;

/// Multiplies every pixel's alpha by `opacity`, clamped to `[0, 1]`.
///
/// ```rust
/// use pixmill_core::{Image, Rgba8};
/// use pixmill_ops::alpha::set_alpha;
///
/// let mut img: Image<Rgba8> = Image::filled(2, 2, [10, 20, 30, 200]);
/// set_alpha(&mut img, 0.5);
/// assert_eq!(img.pixel(0, 0), [10, 20, 30, 100]);
/// ```
pub fn set_alpha<F: PixelType>(image: &mut Image<F>, opacity: f64) {
    if !F::HAS_ALPHA {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 1.0 {
        return;
    }
    trace!(width = image.width(), height = image.height(), opacity, "set_alpha");
    let remultiply = demultiply_alpha(image);
    for px in image.data_mut() {
        *px = F::scale_alpha(*px, opacity);
    }
    if remultiply {
        premultiply_alpha(image);
    }
}

/// [`set_alpha`] on a type-erased image.
pub fn set_alpha_any(image: &mut AnyImage, opacity: f64) {
    pixmill_core::dispatch_any!(AnyImage, image, img => set_alpha(img, opacity))
}

/// Turns an image into a stencil: each pixel's luminance becomes its alpha
/// and its color becomes `color` (black when `None`).
///
/// Luminance is `0.3 R + 0.59 G + 0.11 B` of the straight color. Only the
/// RGB channels of `color` are used.
pub fn set_grayscale_to_alpha(image: &mut Image<Rgba8>, color: Option<Color>) {
    trace!(width = image.width(), height = image.height(), "set_grayscale_to_alpha");
    let [cr, cg, cb, _] = color.unwrap_or_default().demultiplied().to_array();
    let remultiply = demultiply_alpha(image);
    for px in image.data_mut() {
        let luma = px[0] as f64 * LUMA_R + px[1] as f64 * LUMA_G + px[2] as f64 * LUMA_B;
        *px = [cr, cg, cb, luma.round().clamp(0.0, 255.0) as u8];
    }
    if remultiply {
        premultiply_alpha(image);
    }
}

/// [`set_grayscale_to_alpha`] on a type-erased image; grayscale formats
/// carry no alpha channel and are left untouched.
pub fn set_grayscale_to_alpha_any(image: &mut AnyImage, color: Option<Color>) {
    match image {
        AnyImage::Rgba8(img) => set_grayscale_to_alpha(img, color),
        other => warn!(
            pixel_format = other.kind().name(),
            "set_grayscale_to_alpha ignored for image without alpha"
        ),
    }
}

/// Makes every pixel whose straight RGB equals `color` fully transparent.
///
/// Matching is exact and ignores alpha. Keyed pixels become `[0, 0, 0, 0]`.
///
/// ```rust
/// use pixmill_core::{Color, Image, Rgba8};
/// use pixmill_ops::alpha::set_color_to_alpha;
///
/// let mut img: Image<Rgba8> = Image::filled(2, 1, [0, 255, 0, 255]);
/// img.set_pixel(1, 0, [0, 254, 0, 255]);
/// set_color_to_alpha(&mut img, Color::rgb(0, 255, 0));
/// assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
/// assert_eq!(img.pixel(1, 0), [0, 254, 0, 255]);
/// ```
pub fn set_color_to_alpha(image: &mut Image<Rgba8>, color: Color) {
    trace!(width = image.width(), height = image.height(), key = %color, "set_color_to_alpha");
    let [kr, kg, kb, _] = color.demultiplied().to_array();
    let remultiply = demultiply_alpha(image);
    let mut keyed = 0usize;
    for px in image.data_mut() {
        if px[0] == kr && px[1] == kg && px[2] == kb {
            *px = [0, 0, 0, 0];
            keyed += 1;
        }
    }
    if remultiply {
        premultiply_alpha(image);
    }
    debug!(keyed, "set_color_to_alpha done");
}

/// [`set_color_to_alpha`] on a type-erased image; no-op without alpha.
pub fn set_color_to_alpha_any(image: &mut AnyImage, color: Color) {
    match image {
        AnyImage::Rgba8(img) => set_color_to_alpha(img, color),
        other => warn!(
            pixel_format = other.kind().name(),
            "set_color_to_alpha ignored for image without alpha"
        ),
    }
}
