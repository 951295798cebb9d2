//! Pixel-wise image comparison.
//!
//! [`compare`] counts pixels whose largest per-channel absolute difference
//! exceeds a threshold. Each pixel is judged independently, so the count
//! is exact and symmetric regardless of evaluation order; with the
//! `parallel` feature the pixels are scanned with rayon.
//!
//! ```rust
//! use pixmill_core::{Image, Rgba8};
//! use pixmill_ops::compare::compare;
//!
//! let a: Image<Rgba8> = Image::filled(4, 4, [10, 10, 10, 255]);
//! let mut b = a.clone();
//! b.set_pixel(0, 0, [12, 10, 10, 255]);
//! b.set_pixel(1, 0, [10, 10, 10, 0]);
//!
//! assert_eq!(compare(&a, &b, 0.0, true).unwrap(), 2);
//! assert_eq!(compare(&a, &b, 0.0, false).unwrap(), 1);
//! assert_eq!(compare(&a, &b, 2.0, false).unwrap(), 0);
//! ```

use crate::OpsResult;
use pixmill_core::{AnyImage, Error, Image, PixelType};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Counts pixels whose maximum channel difference exceeds `threshold`.
///
/// `threshold` is in native channel units (`0..=255` for 8-bit formats,
/// `0..=65535` for 16-bit, unbounded for float). Alpha takes part only
/// when `include_alpha` is set.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the images differ in size.
pub fn compare<F: PixelType>(
    image1: &Image<F>,
    image2: &Image<F>,
    threshold: f64,
    include_alpha: bool,
) -> OpsResult<usize> {
    if image1.dimensions() != image2.dimensions() {
        return Err(Error::dimension_mismatch(image1.dimensions(), image2.dimensions()).into());
    }
    let differs = |(a, b): (&F::Value, &F::Value)| F::max_channel_diff(*a, *b, include_alpha) > threshold;

    #[cfg(feature = "parallel")]
    let count = image1
        .data()
        .par_iter()
        .zip(image2.data().par_iter())
        .filter(|&pair| differs(pair))
        .count();

    #[cfg(not(feature = "parallel"))]
    let count = image1
        .data()
        .iter()
        .zip(image2.data().iter())
        .filter(|&pair| differs(pair))
        .count();

    trace!(
        width = image1.width(),
        height = image1.height(),
        threshold,
        include_alpha,
        count,
        "compare"
    );
    Ok(count)
}

/// [`compare`] on type-erased images.
///
/// # Errors
///
/// Returns [`Error::FormatMismatch`] if the pixel formats differ and
/// [`Error::DimensionMismatch`] if the sizes differ.
pub fn compare_any(
    image1: &AnyImage,
    image2: &AnyImage,
    threshold: f64,
    include_alpha: bool,
) -> OpsResult<usize> {
    match (image1, image2) {
        (AnyImage::Rgba8(a), AnyImage::Rgba8(b)) => compare(a, b, threshold, include_alpha),
        (AnyImage::Gray8(a), AnyImage::Gray8(b)) => compare(a, b, threshold, include_alpha),
        (AnyImage::Gray16(a), AnyImage::Gray16(b)) => compare(a, b, threshold, include_alpha),
        (AnyImage::Gray32f(a), AnyImage::Gray32f(b)) => compare(a, b, threshold, include_alpha),
        (a, b) => Err(Error::format_mismatch(a.kind().name(), b.kind().name()).into()),
    }
}

/// `true` iff every pixel is bit-identical to the first one.
///
/// Empty images are solid.
pub fn is_solid<F: PixelType>(image: &Image<F>) -> bool {
    let bytes = image.as_bytes();
    let Some(first) = bytes.get(..F::BYTES_PER_PIXEL) else {
        return true;
    };

    #[cfg(feature = "parallel")]
    let solid = bytes
        .par_chunks_exact(F::BYTES_PER_PIXEL)
        .all(|px| px == first);

    #[cfg(not(feature = "parallel"))]
    let solid = bytes
        .chunks_exact(F::BYTES_PER_PIXEL)
        .all(|px| px == first);

    solid
}

/// [`is_solid`] on a type-erased image.
pub fn is_solid_any(image: &AnyImage) -> bool {
    pixmill_core::dispatch_any!(AnyImage, image, img => is_solid(img))
}
