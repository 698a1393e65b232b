//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Filters
//!
//! ```text
//! Filters
//! 001 Normal [normal]
//!     none
//! 002 Grayscale [grayscale]
//!     grayscale(100%)
//! ```
//!
//! ## Operations
//!
//! ```text
//! Operations
//! 001 Crop [crop]
//! 002 Resize [resize]
//! ```
//!
//! ## Edit
//!
//! ```text
//! Session
//!     Canvas: 640x480
//!     History: 4 states, at 3
//!     Export: jpg at quality 80, 52KB
//!     Saved: out/image-1700000000000.jpg
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::encoding::{EncodedImage, ExportFormat};
use crate::filters::{EditOption, FilterOption};
use crate::imaging::Surface;
use crate::naming::format_file_size;
use crate::session::EditSession;
use std::path::Path;

/// Format a 1-based positional index as zero-padded 3-digit.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn entry_header(index: usize, name: &str, id: &str) -> String {
    format!("{} {} [{}]", format_index(index), name, id)
}

pub fn format_filter_catalog(filters: &[FilterOption]) -> Vec<String> {
    let mut lines = vec!["Filters".to_string()];
    for (i, filter) in filters.iter().enumerate() {
        lines.push(entry_header(i + 1, filter.display_name, filter.id));
        lines.push(format!("{}{}", indent(1), filter.filter_chain));
    }
    lines
}

pub fn print_filter_catalog(filters: &[FilterOption]) {
    for line in format_filter_catalog(filters) {
        println!("{line}");
    }
}

pub fn format_edit_options(options: &[EditOption]) -> Vec<String> {
    let mut lines = vec!["Operations".to_string()];
    for (i, option) in options.iter().enumerate() {
        lines.push(entry_header(i + 1, option.display_name, option.id));
    }
    lines
}

pub fn print_edit_options(options: &[EditOption]) {
    for line in format_edit_options(options) {
        println!("{line}");
    }
}

/// Summary of an edit run: canvas size, history position, export details
/// and the written path when there is one.
pub fn format_session_summary(
    session: &EditSession,
    encoded: &EncodedImage,
    saved_to: Option<&Path>,
) -> Vec<String> {
    let history = session.history();
    let position = history
        .current_index()
        .map(|i| format!("at {}", i + 1))
        .unwrap_or_else(|| "empty".to_string());
    let export = match encoded.format {
        ExportFormat::Jpeg => format!(
            "{} at quality {}",
            encoded.format,
            session.compression().level().quality()
        ),
        ExportFormat::Png => format!("{} (lossless)", encoded.format),
    };

    let mut lines = vec![
        "Session".to_string(),
        format!("{}Canvas: {}", indent(1), session.canvas().dimensions()),
        format!("{}History: {} states, {}", indent(1), history.len(), position),
        format!(
            "{}Export: {}, {}",
            indent(1),
            export,
            format_file_size(encoded.len())
        ),
    ];
    if let Some(path) = saved_to {
        lines.push(format!("{}Saved: {}", indent(1), path.display()));
    }
    lines
}

pub fn print_session_summary(session: &EditSession, encoded: &EncodedImage, saved_to: Option<&Path>) {
    for line in format_session_summary(session, encoded, saved_to) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::filters::{EDIT_OPTIONS, FILTER_OPTIONS};
    use crate::test_helpers::gradient;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn filter_catalog_lists_every_preset_with_chain() {
        let lines = format_filter_catalog(FILTER_OPTIONS);
        assert_eq!(lines[0], "Filters");
        assert_eq!(lines.len(), 1 + FILTER_OPTIONS.len() * 2);
        assert_eq!(lines[1], "001 Normal [normal]");
        assert_eq!(lines[2], "    none");
        assert!(lines.contains(&"    sepia(50%) contrast(120%) brightness(90%)".to_string()));
    }

    #[test]
    fn edit_options_listed_in_order() {
        let lines = format_edit_options(EDIT_OPTIONS);
        assert_eq!(lines.len(), 1 + EDIT_OPTIONS.len());
        assert_eq!(lines[1], "001 Crop [crop]");
    }

    #[test]
    fn session_summary_jpeg() {
        let mut session = EditSession::new(gradient(20, 10), &EditorConfig::default()).unwrap();
        session.apply(&"brightness=110".parse().unwrap()).unwrap();
        let encoded = session.export().unwrap();
        let lines = format_session_summary(&session, &encoded, Some(Path::new("out/a.jpg")));

        assert_eq!(lines[0], "Session");
        assert_eq!(lines[1], "    Canvas: 20x10");
        assert_eq!(lines[2], "    History: 2 states, at 2");
        assert!(lines[3].starts_with("    Export: jpg at quality 80, "), "{}", lines[3]);
        assert!(lines[3].ends_with("KB"));
        assert_eq!(lines[4], "    Saved: out/a.jpg");
    }

    #[test]
    fn session_summary_png_without_path() {
        let mut session = EditSession::new(gradient(4, 4), &EditorConfig::default()).unwrap();
        session.compression_mut().set_auto_compress(false);
        let encoded = session.export().unwrap();
        let lines = format_session_summary(&session, &encoded, None);
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("    Export: png (lossless), "));
    }
}
