//! Gallery directory scanning.
//!
//! Lists the images and archives sitting directly in the gallery directory and
//! sorts both newest first. The scan is a single pass over `read_dir`; nothing
//! is cached between calls, so every render sees the directory as it is now.
//!
//! ## Ordering
//!
//! Entries are first sorted by file name, then stable-sorted by modification
//! time, most recent first. Images with equal timestamps therefore keep
//! alphabetical order, which makes output reproducible across platforms whose
//! `read_dir` order differs.
//!
//! ## What Is Skipped
//!
//! - anything that is not a regular file (a directory named `x.png` included)
//! - hidden files
//! - reserved names (favicon, `files.exclude`)
//! - entries that disappear between `read_dir` and `stat`

use crate::config::{self, GalleryConfig};
use crate::naming;
use crate::types::{ArchiveEntry, ImageEntry, Listing};
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Gallery directory not found: {0}")]
    NotADirectory(PathBuf),
}

/// Load `config.toml` from `dir` and scan it.
pub fn scan_dir(dir: &Path) -> Result<(GalleryConfig, Listing), ScanError> {
    let config = config::load_config(dir)?;
    let listing = scan(dir, &config)?;
    Ok((config, listing))
}

/// Scan the gallery directory with an already-loaded config.
pub fn scan(dir: &Path, config: &GalleryConfig) -> Result<Listing, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let thumbs_dir = dir.join(&config.files.thumbs_dir);
    let mut images = Vec::new();
    let mut archives = Vec::new();

    for (file_name, modified) in collect_files(dir)? {
        if let Some(name) = naming::image_base_name(&file_name, &config.formats, &config.files) {
            images.push(ImageEntry {
                name: name.to_string(),
                has_thumbnail: thumbs_dir.join(&file_name).is_file(),
                file_name,
                modified,
            });
        } else if let Some(mode) =
            naming::archive_mode(&file_name, &config.formats, &config.files)
        {
            archives.push(ArchiveEntry {
                file_name,
                mode,
                modified,
            });
        }
    }

    sort_newest_first(&mut images, |i| i.modified);
    sort_newest_first(&mut archives, |a| a.modified);

    let favicon = config
        .files
        .favicon()
        .filter(|f| dir.join(f).is_file())
        .map(str::to_string);

    debug!(
        images = images.len(),
        archives = archives.len(),
        dir = %dir.display(),
        "scanned gallery"
    );

    Ok(Listing {
        images,
        archives,
        favicon,
    })
}

/// Stable sort, most recent first. Equal timestamps keep their current order.
pub fn sort_newest_first<T>(items: &mut [T], modified: impl Fn(&T) -> SystemTime) {
    items.sort_by_key(|item| Reverse(modified(item)));
}

/// Regular, non-hidden files directly in `dir` with their modification times,
/// sorted by name.
fn collect_files(dir: &Path) -> Result<Vec<(String, SystemTime)>, ScanError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }
        // Follows symlinks, so a linked render counts like a copied one.
        let metadata = match fs::metadata(entry.path()) {
            Ok(m) => m,
            Err(e) => {
                debug!(file = %file_name, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        files.push((file_name, metadata.modified()?));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
