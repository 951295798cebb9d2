//! Indexed-color palettes for paletted output.

use crate::ImageWriterError;
use pixmill_core::Color;
use std::collections::HashMap;

/// Largest palette an 8-bit index can address.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An ordered table of 1 to 256 straight-alpha RGBA colors.
///
/// Encoders that support palettes map every pixel to the index of the
/// nearest entry.
///
/// ```rust
/// use pixmill_core::Color;
/// use pixmill_io::RgbaPalette;
///
/// let palette = RgbaPalette::from_rgb_bytes(&[0, 0, 0, 255, 255, 255]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest([200, 210, 190, 255]), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaPalette {
    colors: Vec<[u8; 4]>,
}

impl RgbaPalette {
    /// Builds a palette from colors; premultiplied colors are converted to
    /// straight alpha.
    ///
    /// # Errors
    ///
    /// Fails if there are no colors or more than [`MAX_PALETTE_SIZE`].
    pub fn new<I: IntoIterator<Item = Color>>(colors: I) -> Result<Self, ImageWriterError> {
        let colors: Vec<[u8; 4]> = colors
            .into_iter()
            .map(|c| c.demultiplied().to_array())
            .collect();
        Self::from_entries(colors)
    }

    /// Builds a fully opaque palette from packed `RGBRGB...` bytes.
    ///
    /// # Errors
    ///
    /// Fails if the length is not a multiple of 3 or the entry count is out
    /// of range.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self, ImageWriterError> {
        if bytes.len() % 3 != 0 {
            return Err(ImageWriterError::new(format!(
                "invalid palette: {} bytes is not a multiple of 3",
                bytes.len()
            )));
        }
        Self::from_entries(bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2], 255]).collect())
    }

    /// Builds a palette from packed `RGBARGBA...` bytes.
    ///
    /// # Errors
    ///
    /// Fails if the length is not a multiple of 4 or the entry count is out
    /// of range.
    pub fn from_rgba_bytes(bytes: &[u8]) -> Result<Self, ImageWriterError> {
        if bytes.len() % 4 != 0 {
            return Err(ImageWriterError::new(format!(
                "invalid palette: {} bytes is not a multiple of 4",
                bytes.len()
            )));
        }
        Self::from_entries(bytes.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect())
    }

    fn from_entries(colors: Vec<[u8; 4]>) -> Result<Self, ImageWriterError> {
        if colors.is_empty() || colors.len() > MAX_PALETTE_SIZE {
            return Err(ImageWriterError::new(format!(
                "invalid palette: {} entries, expected 1 to {MAX_PALETTE_SIZE}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries as `[r, g, b, a]`.
    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// `true` if any entry is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.colors.iter().any(|c| c[3] != 255)
    }

    /// Packed `RGB` bytes, as stored in a PNG `PLTE` chunk.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect()
    }

    /// Alpha of every entry, as stored in a PNG `tRNS` chunk.
    pub fn alpha_bytes(&self) -> Vec<u8> {
        self.colors.iter().map(|c| c[3]).collect()
    }

    /// Index of the entry closest to `rgba` (squared Euclidean distance over
    /// all four channels); ties go to the lower index.
    pub fn nearest(&self, rgba: [u8; 4]) -> u8 {
        let distance = |c: &[u8; 4]| -> u32 {
            c.iter()
                .zip(rgba.iter())
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    (d * d) as u32
                })
                .sum()
        };
        let mut best = (0usize, u32::MAX);
        for (i, c) in self.colors.iter().enumerate() {
            let d = distance(c);
            if d < best.1 {
                best = (i, d);
                if d == 0 {
                    break;
                }
            }
        }
        best.0 as u8
    }

    /// Maps straight RGBA pixels to indices, caching repeated colors.
    pub fn map_pixels<'a, I>(&self, pixels: I) -> Vec<u8>
    where
        I: IntoIterator<Item = &'a [u8; 4]>,
    {
        let mut cache: HashMap<[u8; 4], u8> = HashMap::new();
        pixels
            .into_iter()
            .map(|&px| *cache.entry(px).or_insert_with(|| self.nearest(px)))
            .collect()
    }
}
