//! Shared data model.
//!
//! Every value here is derived fresh from the filesystem on each scan and
//! discarded after the render. Nothing is persisted or mutated.

use crate::config::FormatsConfig;
use serde::Serialize;
use std::time::SystemTime;

/// Which image format the full-size links and the archive link point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The listed format (`formats.primary`, PNG by default).
    Primary,
    /// The sibling format selected by the query flag (`formats.alternate`).
    Alternate,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::Primary, DisplayMode::Alternate];

    /// File extension this mode links to.
    pub fn extension(self, formats: &FormatsConfig) -> &str {
        match self {
            DisplayMode::Primary => &formats.primary,
            DisplayMode::Alternate => &formats.alternate,
        }
    }

    /// The mode the toggle link switches to.
    pub fn other(self) -> Self {
        match self {
            DisplayMode::Primary => DisplayMode::Alternate,
            DisplayMode::Alternate => DisplayMode::Primary,
        }
    }

    /// Resolve the mode from a raw request query string.
    ///
    /// Any key equal to the alternate extension selects `Alternate`, with or
    /// without a value (`svg`, `svg=1`). Everything else is `Primary`.
    pub fn from_query(query: Option<&str>, formats: &FormatsConfig) -> Self {
        let wanted = formats.alternate.as_str();
        let selected = query
            .unwrap_or_default()
            .split('&')
            .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key))
            .any(|key| key.eq_ignore_ascii_case(wanted));
        if selected {
            DisplayMode::Alternate
        } else {
            DisplayMode::Primary
        }
    }
}

/// An image listed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// File name in the gallery directory, e.g. `a.png`.
    pub file_name: String,
    /// File name without its extension, used as label and link target.
    pub name: String,
    pub modified: SystemTime,
    /// Whether `<thumbs_dir>/<file_name>` exists.
    pub has_thumbnail: bool,
}

impl ImageEntry {
    /// File name of the full-size file for a display mode.
    ///
    /// The primary file is the listed file itself, whatever the case of its
    /// extension. The alternate sibling is `<name>.<alternate>`.
    pub fn full_size_name(&self, mode: DisplayMode, formats: &FormatsConfig) -> String {
        match mode {
            DisplayMode::Primary => self.file_name.clone(),
            DisplayMode::Alternate => format!("{}.{}", self.name, formats.alternate),
        }
    }
}

/// A downloadable bundle matching the archive naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub file_name: String,
    pub mode: DisplayMode,
    pub modified: SystemTime,
}

/// One scan of the gallery directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    /// Newest first.
    pub images: Vec<ImageEntry>,
    /// Newest first, both modes interleaved.
    pub archives: Vec<ArchiveEntry>,
    /// Favicon file name, when the configured favicon exists.
    pub favicon: Option<String>,
}

impl Listing {
    /// The most recently modified archive for `mode`, if any exists.
    pub fn newest_archive(&self, mode: DisplayMode) -> Option<&ArchiveEntry> {
        self.archives.iter().find(|a| a.mode == mode)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
