//! Export file names and input validation helpers.
//!
//! ## File Names
//!
//! Exported files are named `{prefix}-{epochMillis}.{ext}`:
//! - `generate_file_name("photo")` → `"photo-1760880000000.png"`
//! - `file_name_for("photo", ExportFormat::Jpeg)` → `"photo-1760880000000.jpg"`
//!
//! An empty prefix falls back to [`DEFAULT_PREFIX`].
//!
//! ## Validation
//!
//! The shell asks two questions before and after editing: "is this file an
//! image?" ([`is_valid_image_mime`], [`mime_for_path`]) and "how big is the
//! result?" ([`calculate_file_size`], [`format_file_size`]). Neither rejects
//! anything on its own; they only report.

use crate::encoding::{ExportFormat, decode_data_uri};
use crate::imaging::EditError;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use std::path::Path;

pub const DEFAULT_PREFIX: &str = "image";

/// Unique PNG file name stamped with the current time.
pub fn generate_file_name(prefix: &str) -> String {
    file_name_at(prefix, ExportFormat::Png, Utc::now())
}

/// Unique file name with the extension of `format`.
pub fn file_name_for(prefix: &str, format: ExportFormat) -> String {
    file_name_at(prefix, format, Utc::now())
}

/// File name for a fixed point in time.
pub fn file_name_at(prefix: &str, format: ExportFormat, at: DateTime<Utc>) -> String {
    let prefix = match prefix.trim() {
        "" => DEFAULT_PREFIX,
        p => p,
    };
    format!("{}-{}.{}", prefix, at.timestamp_millis(), format.extension())
}

/// Whether `mime` names an image type.
pub fn is_valid_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// MIME type guessed from a file extension, `None` when unknown.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Whole kilobytes, rounded: `1536` → `"2KB"`.
pub fn format_file_size(bytes: usize) -> String {
    let kb = (bytes as f64 / 1024.0).round() as u64;
    format!("{kb}KB")
}

/// Decoded size of a base64 `data:` URI payload.
pub fn calculate_file_size(data_uri: &str) -> Result<usize, EditError> {
    decode_data_uri(data_uri).map(|bytes| bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn file_name_uses_prefix_and_millis() {
        assert_eq!(
            file_name_at("photo", ExportFormat::Png, at_millis(1_760_880_000_123)),
            "photo-1760880000123.png"
        );
    }

    #[test]
    fn file_name_extension_follows_format() {
        assert_eq!(
            file_name_at("x", ExportFormat::Jpeg, at_millis(5)),
            "x-5.jpg"
        );
    }

    #[test]
    fn empty_prefix_uses_default() {
        assert_eq!(
            file_name_at("  ", ExportFormat::Png, at_millis(42)),
            "image-42.png"
        );
    }

    #[test]
    fn generated_name_has_expected_shape() {
        let name = generate_file_name("edit");
        let stamp = name
            .strip_prefix("edit-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn image_mime_check() {
        assert!(is_valid_image_mime("image/png"));
        assert!(is_valid_image_mime("image/svg+xml"));
        assert!(!is_valid_image_mime("application/pdf"));
        assert!(!is_valid_image_mime(""));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("x.png")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn file_size_rounds_to_kilobytes() {
        assert_eq!(format_file_size(0), "0KB");
        assert_eq!(format_file_size(511), "0KB");
        assert_eq!(format_file_size(512), "1KB");
        assert_eq!(format_file_size(1536), "2KB");
        assert_eq!(format_file_size(10 * 1024), "10KB");
    }

    #[test]
    fn data_uri_size_is_decoded_length() {
        // "hello" = aGVsbG8=
        assert_eq!(calculate_file_size("data:text/plain;base64,aGVsbG8=").unwrap(), 5);
        assert!(calculate_file_size("no comma here").is_err());
    }
}
