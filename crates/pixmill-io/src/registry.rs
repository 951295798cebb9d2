//! Encoder registry and format dispatch.
//!
//! The registry maps canonical format names to [`ImageEncoder`]s and is the
//! single place where a type string is turned into an encode call.
//!
//! # Architecture
//!
//! [`EncoderRegistry::global()`] is built once with the encoders enabled by
//! Cargo features and never changes afterwards. Callers that need extra
//! formats build their own registry with [`EncoderRegistry::with_builtin`]
//! and [`EncoderRegistry::register`].
//!
//! # Example
//!
//! ```rust
//! use pixmill_io::EncoderRegistry;
//!
//! let registry = EncoderRegistry::global();
//! for name in registry.names() {
//!     println!("can write: {name}");
//! }
//! # #[cfg(feature = "png")]
//! assert!(registry.supports("png24"));
//! assert!(!registry.supports("bmp"));
//! ```

use crate::{FormatSpec, ImageEncoder, ImageWriterError, IoResult, RgbaPalette};
use pixmill_core::AnyView;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Central table of encoders, keyed by canonical format name.
#[derive(Clone, Default)]
pub struct EncoderRegistry {
    encoders: HashMap<&'static str, Arc<dyn ImageEncoder>>,
}

impl EncoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in encoders enabled by features.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_builtin();
        registry
    }

    /// Returns the process-wide registry with built-in encoders.
    pub fn global() -> &'static EncoderRegistry {
        static INSTANCE: OnceLock<EncoderRegistry> = OnceLock::new();
        INSTANCE.get_or_init(Self::with_builtin)
    }

    fn register_builtin(&mut self) {
        #[cfg(feature = "png")]
        self.register(crate::png::PngEncoder);

        #[cfg(feature = "jpeg")]
        self.register(crate::jpeg::JpegEncoder);

        #[cfg(feature = "tiff")]
        self.register(crate::tiff::TiffEncoder);

        #[cfg(feature = "webp")]
        self.register(crate::webp::WebpEncoder);
    }

    /// Adds an encoder under its [`name`](ImageEncoder::name), returning the
    /// one it replaces.
    pub fn register<E: ImageEncoder + 'static>(&mut self, encoder: E) -> Option<Arc<dyn ImageEncoder>> {
        let name = encoder.name();
        debug!(encoder = name, "registering encoder");
        self.encoders.insert(name, Arc::new(encoder))
    }

    /// Looks up the encoder for a type string (`"png24"` finds `png`).
    pub fn get(&self, type_string: &str) -> Option<&dyn ImageEncoder> {
        let spec = FormatSpec::parse(type_string);
        self.encoders.get(spec.name()).map(|e| e.as_ref())
    }

    /// `true` if some encoder handles `type_string`.
    pub fn supports(&self, type_string: &str) -> bool {
        self.get(type_string).is_some()
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.encoders.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Encodes `view` as `type_string` into `out`.
    ///
    /// # Errors
    ///
    /// [`IoError::Encode`](crate::IoError::Encode) if no encoder handles the
    /// type, if a palette is given to an encoder without palette support,
    /// or if the encoder fails.
    pub fn encode(
        &self,
        view: &AnyView<'_>,
        type_string: &str,
        palette: Option<&RgbaPalette>,
        out: &mut dyn Write,
    ) -> IoResult<()> {
        let spec = FormatSpec::parse(type_string);
        let encoder = self
            .encoders
            .get(spec.name())
            .ok_or_else(|| ImageWriterError::new(format!("unknown file type: {type_string}")))?;

        if palette.is_some() && !encoder.supports_palette() {
            return Err(ImageWriterError::new(format!(
                "{} encoder does not support palettes",
                encoder.name()
            ))
            .into());
        }

        debug!(
            encoder = encoder.name(),
            type_string,
            pixel_format = view.kind().name(),
            width = view.width(),
            height = view.height(),
            paletted = palette.is_some(),
            "encoding image"
        );
        encoder.encode(view, &spec, palette, out)?;
        Ok(())
    }

    /// Encodes into a new byte buffer.
    ///
    /// # Errors
    ///
    /// See [`encode`](Self::encode).
    pub fn encode_to_vec(
        &self,
        view: &AnyView<'_>,
        type_string: &str,
        palette: Option<&RgbaPalette>,
    ) -> IoResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode(view, type_string, palette, &mut buffer)?;
        Ok(buffer)
    }
}

impl std::fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("encoders", &self.names())
            .finish()
    }
}
