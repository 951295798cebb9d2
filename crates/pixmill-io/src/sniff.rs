//! Filename-based type detection.
//!
//! Two lookups with different contracts:
//!
//! - [`type_from_filename`] checks the name against a fixed, ordered table
//!   of known suffixes and returns the canonical type string.
//! - [`guess_type`] just returns whatever follows the last `.`.
//!
//! Neither touches the filesystem.
//!
//! ```rust
//! use pixmill_io::sniff::{guess_type, type_from_filename};
//!
//! assert_eq!(type_from_filename("MAP.PNG"), Some("png"));
//! assert_eq!(type_from_filename("tile.tif"), Some("tiff"));
//! assert_eq!(type_from_filename("notes.txt"), None);
//!
//! assert_eq!(guess_type("notes.txt"), "txt");
//! assert_eq!(guess_type("README"), "<unknown>");
//! ```

/// Returned by [`guess_type`] for names without a `.`.
pub const UNKNOWN_TYPE: &str = "<unknown>";

/// Known types and their suffixes, in match priority order.
const SUFFIXES: &[(&str, &[&str])] = &[
    ("png", &[".png"]),
    ("jpeg", &[".jpg", ".jpeg"]),
    ("tiff", &[".tif", ".tiff"]),
    ("pdf", &[".pdf"]),
    ("svg", &[".svg"]),
    ("ps", &[".ps"]),
    ("webp", &[".webp"]),
];

/// Returns every type string [`type_from_filename`] can produce, in
/// priority order.
pub fn known_types() -> impl Iterator<Item = &'static str> {
    SUFFIXES.iter().map(|&(name, _)| name)
}

/// Resolves a type string from a case-insensitive filename suffix.
pub fn type_from_filename(filename: &str) -> Option<&'static str> {
    SUFFIXES
        .iter()
        .find(|(_, suffixes)| suffixes.iter().any(|s| ends_with_ignore_case(filename, s)))
        .map(|&(name, _)| name)
}

/// Returns the text after the last `.`, or [`UNKNOWN_TYPE`].
pub fn guess_type(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx + 1..],
        None => UNKNOWN_TYPE,
    }
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    let (s, suffix) = (s.as_bytes(), suffix.as_bytes());
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_filename() {
        assert_eq!(type_from_filename("MAP.PNG"), Some("png"));
        assert_eq!(type_from_filename("x.jpeg"), Some("jpeg"));
        assert_eq!(type_from_filename("x.JpG"), Some("jpeg"));
        assert_eq!(type_from_filename("x.tif"), Some("tiff"));
        assert_eq!(type_from_filename("x.tiff"), Some("tiff"));
        assert_eq!(type_from_filename("out/report.pdf"), Some("pdf"));
        assert_eq!(type_from_filename("a.svg"), Some("svg"));
        assert_eq!(type_from_filename("a.ps"), Some("ps"));
        assert_eq!(type_from_filename("a.webp"), Some("webp"));
        assert_eq!(type_from_filename("x.unknown"), None);
    }

    #[test]
    fn test_type_from_filename_needs_dot() {
        assert_eq!(type_from_filename("png"), None);
        assert_eq!(type_from_filename("maps"), None);
        assert_eq!(type_from_filename("figure.eps"), None);
        assert_eq!(type_from_filename(""), None);
        assert_eq!(type_from_filename("ünïcode.png"), Some("png"));
    }

    #[test]
    fn test_guess_type() {
        assert_eq!(guess_type("a.b.c"), "c");
        assert_eq!(guess_type("trailing."), "");
        assert_eq!(guess_type("x.PNG"), "PNG");
        assert_eq!(guess_type("noext"), UNKNOWN_TYPE);
    }

    #[test]
    fn test_known_types_order() {
        let types: Vec<_> = known_types().collect();
        assert_eq!(types, ["png", "jpeg", "tiff", "pdf", "svg", "ps", "webp"]);
    }
}
