//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The primary display for every image is its base name and position in the
//! newest-first order, i.e. exactly what the page will show. File names,
//! timestamps and thumbnail status follow as indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Images (2)
//! 001 Vaquita
//!     Source: Vaquita.png
//!     Modified: 2020-11-14 09:30 UTC
//! 002 Kakapo
//!     Source: Kakapo.png
//!     Modified: 2020-11-12 18:02 UTC
//!     Thumbnail: missing
//!
//! Archives
//!     png: gallery_png_2020-11-14.zip (newest of 2)
//!     svg: none
//! ```
//!
//! ## Thumbs
//!
//! ```text
//! Thumbnails for 2 images
//!     001 Vaquita.png: created 300x300
//!     002 Kakapo.png: existing
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::bundle::BundleReport;
use crate::config::GalleryConfig;
use crate::generate::GenerateReport;
use crate::thumbs::{ThumbEvent, ThumbStatus};
use crate::types::{DisplayMode, Listing};
use chrono::{DateTime, Utc};
use std::time::SystemTime;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M UTC")
        .to_string()
}

fn mode_label(mode: DisplayMode, config: &GalleryConfig) -> &str {
    mode.extension(&config.formats)
}

// ============================================================================
// check
// ============================================================================

/// Format the scan listing in render order.
pub fn format_scan_output(listing: &Listing, config: &GalleryConfig) -> Vec<String> {
    let mut lines = vec![format!("Images ({})", listing.image_count())];

    for (i, image) in listing.images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), image.name));
        lines.push(format!("{}Source: {}", indent(1), image.file_name));
        lines.push(format!(
            "{}Modified: {}",
            indent(1),
            format_timestamp(image.modified)
        ));
        if !image.has_thumbnail {
            lines.push(format!("{}Thumbnail: missing", indent(1)));
        }
    }

    lines.push(String::new());
    lines.push("Archives".to_string());
    for mode in DisplayMode::ALL {
        let count = listing.archives.iter().filter(|a| a.mode == mode).count();
        let line = match listing.newest_archive(mode) {
            Some(newest) if count > 1 => {
                format!("{} (newest of {})", newest.file_name, count)
            }
            Some(newest) => newest.file_name.clone(),
            None => "none".to_string(),
        };
        lines.push(format!("{}{}: {}", indent(1), mode_label(mode, config), line));
    }

    if let Some(favicon) = &listing.favicon {
        lines.push(String::new());
        lines.push(format!("Favicon: {favicon}"));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(listing: &Listing, config: &GalleryConfig) {
    for line in format_scan_output(listing, config) {
        println!("{}", line);
    }
}

// ============================================================================
// thumbs
// ============================================================================

/// Format a single thumbnail progress event as display lines.
pub fn format_thumb_event(event: &ThumbEvent) -> Vec<String> {
    match event {
        ThumbEvent::Started { total } => vec![format!("Thumbnails for {} images", total)],
        ThumbEvent::Image {
            index,
            file_name,
            status,
        } => {
            let status = match status {
                ThumbStatus::Created { width, height } => format!("created {width}x{height}"),
                ThumbStatus::Existing => "existing".to_string(),
                ThumbStatus::Failed(reason) => format!("failed ({reason})"),
            };
            vec![format!(
                "{}{} {}: {}",
                indent(1),
                format_index(*index),
                file_name,
                status
            )]
        }
    }
}

// ============================================================================
// generate
// ============================================================================

/// Format the pages written by `generate`.
pub fn format_generate_output(report: &GenerateReport, config: &GalleryConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for page in &report.pages {
        let archive = page.archive.as_deref().unwrap_or("no archive");
        lines.push(format!(
            "{} \u{2192} {} ({})",
            mode_label(page.mode, config).to_uppercase(),
            page.file_name,
            archive
        ));
    }
    if !report.missing_thumbnails.is_empty() {
        lines.push(format!(
            "Missing thumbnails: {}",
            report.missing_thumbnails.join(", ")
        ));
    }
    lines.push(format!(
        "Generated {} pages, {} images",
        report.pages.len(),
        report.image_count
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport, config: &GalleryConfig) {
    for line in format_generate_output(report, config) {
        println!("{}", line);
    }
}

// ============================================================================
// bundle
// ============================================================================

/// Format one written bundle.
pub fn format_bundle_output(report: &BundleReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} files)",
        report.file_name,
        report.entries.len()
    )];
    for name in &report.missing {
        lines.push(format!("{}Missing: {}", indent(1), name));
    }
    lines
}

/// Print bundle output to stdout.
pub fn print_bundle_output(report: &BundleReport) {
    for line in format_bundle_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
