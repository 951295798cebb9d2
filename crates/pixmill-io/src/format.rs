//! Type strings and encoder options.
//!
//! A type string names the output format and optionally carries encoder
//! options. It starts with a format word, followed by `:`-separated
//! `key=value` pairs:
//!
//! | Type string          | Format | Meaning                       |
//! |----------------------|--------|-------------------------------|
//! | `png`, `png32`       | png    | RGBA output                   |
//! | `png24`              | png    | RGB output, alpha dropped     |
//! | `jpeg`, `jpg`        | jpeg   | default quality               |
//! | `jpeg85`             | jpeg   | quality 85                    |
//! | `jpeg:quality=70`    | jpeg   | quality 70                    |
//! | `tif`, `tiff`        | tiff   |                               |
//! | `webp`               | webp   | lossless                      |
//!
//! The format word selects the encoder by prefix, so `png8` and `png24`
//! both go to the PNG encoder, which then reads the full word through
//! [`FormatSpec::variant`].
//!
//! ```rust
//! use pixmill_io::FormatSpec;
//!
//! let spec = FormatSpec::parse("JPEG85:progressive=false");
//! assert_eq!(spec.name(), "jpeg");
//! assert_eq!(spec.variant(), "jpeg85");
//! assert_eq!(spec.variant_number(), Some(85));
//! assert_eq!(spec.option("progressive"), Some("false"));
//! ```

use crate::ImageWriterError;
use std::fmt;

/// A parsed type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    raw: String,
    name: String,
    variant: String,
    options: Vec<(String, String)>,
}

impl FormatSpec {
    /// Parses a type string. Parsing never fails; an unrecognised format
    /// word is kept as the name and rejected later by the registry.
    pub fn parse(type_string: &str) -> Self {
        let mut parts = type_string.split(':');
        let variant = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let options = parts
            .filter(|part| !part.trim().is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (key.trim().to_ascii_lowercase(), value.trim().to_string()),
                None => (part.trim().to_ascii_lowercase(), String::new()),
            })
            .collect();

        Self {
            raw: type_string.to_string(),
            name: canonical_name(&variant).to_string(),
            variant,
            options,
        }
    }

    /// The type string as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Canonical format name used to look up the encoder (`png`, `jpeg`,
    /// `tiff`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowercased format word, e.g. `png24` or `jpeg85`.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Trailing digits of the format word: `24` for `png24`, `85` for
    /// `jpeg85`.
    pub fn variant_number(&self) -> Option<u32> {
        let digits = self.variant.len()
            - self
                .variant
                .bytes()
                .rev()
                .take_while(u8::is_ascii_digit)
                .count();
        self.variant[digits..].parse().ok()
    }

    /// Value of option `key`; a bare `key` yields `Some("")`.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// All options in the order given.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses option `key` as `T`.
    ///
    /// # Errors
    ///
    /// Fails if the option is present but does not parse.
    pub fn parsed_option<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ImageWriterError> {
        self.option(key)
            .map(|value| {
                value.parse().map_err(|_| {
                    ImageWriterError::new(format!(
                        "invalid value '{value}' for option '{key}' in '{}'",
                        self.raw
                    ))
                })
            })
            .transpose()
    }

    /// Interprets option `key` as a boolean (`true/false`, `yes/no`, `on/off`,
    /// `1/0`; a bare key means `true`).
    ///
    /// # Errors
    ///
    /// Fails on any other value.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, ImageWriterError> {
        match self.option(key).map(str::to_ascii_lowercase).as_deref() {
            None => Ok(None),
            Some("" | "true" | "yes" | "on" | "1") => Ok(Some(true)),
            Some("false" | "no" | "off" | "0") => Ok(Some(false)),
            Some(other) => Err(ImageWriterError::new(format!(
                "invalid value '{other}' for option '{key}' in '{}'",
                self.raw
            ))),
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FormatSpec {
    fn from(type_string: &str) -> Self {
        Self::parse(type_string)
    }
}

/// Maps a format word to the encoder name it selects.
fn canonical_name(word: &str) -> &str {
    if word.starts_with("png") {
        "png"
    } else if word.starts_with("jpeg") || word.starts_with("jpg") {
        "jpeg"
    } else if word.starts_with("tif") {
        "tiff"
    } else if word.starts_with("webp") {
        "webp"
    } else {
        word
    }
}
