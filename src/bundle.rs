//! Archive bundles.
//!
//! Writes `<archive_prefix>_<format>_<YYYY-MM-DD>.zip` holding the full-size
//! file of every listed image in one format: `<name>.png` for the primary
//! bundle, `<name>.svg` for the alternate one. Entries are stored flat and
//! newest first. Images whose sibling in that format does not exist are
//! skipped and reported.
//!
//! The page links the most recently modified bundle per format, so writing a
//! new bundle is all it takes to publish it. The archive is written under a
//! hidden temporary name and renamed into place, which keeps a concurrent scan
//! from ever linking a half-written file.

use crate::config::GalleryConfig;
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::DisplayMode;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Result of writing one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub mode: DisplayMode,
    pub file_name: String,
    /// Archived file names, in archive order.
    pub entries: Vec<String>,
    /// Expected file names that did not exist.
    pub missing: Vec<String>,
}

/// Write the bundle for `mode`, tagged with `date`.
///
/// An existing bundle with the same name (same day) is replaced.
pub fn bundle(
    dir: &Path,
    config: &GalleryConfig,
    mode: DisplayMode,
    date: NaiveDate,
) -> Result<BundleReport, BundleError> {
    let listing = scan::scan(dir, config)?;
    let tag = date.format("%Y-%m-%d").to_string();
    let file_name = naming::archive_file_name(mode, &tag, &config.formats, &config.files);

    let (entries, missing): (Vec<String>, Vec<String>) = listing
        .images
        .iter()
        .map(|image| image.full_size_name(mode, &config.formats))
        .partition(|name| dir.join(name).is_file());

    let partial = dir.join(format!(".{file_name}.partial"));
    if let Err(e) = write_archive(dir, &partial, &entries) {
        fs::remove_file(&partial).ok();
        return Err(e);
    }
    fs::rename(&partial, dir.join(&file_name))?;

    debug!(
        archive = %file_name,
        entries = entries.len(),
        missing = missing.len(),
        "wrote bundle"
    );

    Ok(BundleReport {
        mode,
        file_name,
        entries,
        missing,
    })
}

fn write_archive(dir: &Path, target: &Path, entries: &[String]) -> Result<(), BundleError> {
    let mut zip = ZipWriter::new(File::create(target)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for name in entries {
        zip.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(dir.join(name))?, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 11, 14).unwrap()
    }

    fn archive_names(path: &Path) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn primary_bundle_holds_images_newest_first() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 3);
        touch_at(tmp.path(), "b.png", 1);
        touch_at(tmp.path(), "c.png", 2);

        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Primary, date())
            .unwrap();

        assert_eq!(report.file_name, "gallery_png_2020-11-14.zip");
        assert_eq!(report.entries, vec!["a.png", "c.png", "b.png"]);
        assert!(report.missing.is_empty());
        assert_eq!(
            archive_names(&tmp.path().join(&report.file_name)),
            vec!["a.png", "c.png", "b.png"]
        );
    }

    #[test]
    fn alternate_bundle_skips_missing_siblings() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 2);
        touch_at(tmp.path(), "b.png", 1);
        touch_at(tmp.path(), "a.svg", 2);

        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Alternate, date())
            .unwrap();

        assert_eq!(report.file_name, "gallery_svg_2020-11-14.zip");
        assert_eq!(report.entries, vec!["a.svg"]);
        assert_eq!(report.missing, vec!["b.svg"]);
    }

    #[test]
    fn primary_bundle_keeps_upper_case_extension() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "Kakapo.PNG", 1);

        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Primary, date())
            .unwrap();

        assert_eq!(report.entries, vec!["Kakapo.PNG"]);
        assert!(report.missing.is_empty());
        assert_eq!(
            archive_names(&tmp.path().join(&report.file_name)),
            vec!["Kakapo.PNG"]
        );
    }

    #[test]
    fn archive_contents_round_trip() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 1);

        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Primary, date())
            .unwrap();

        let mut archive =
            zip::ZipArchive::new(File::open(tmp.path().join(&report.file_name)).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("a.png")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        // touch_at writes the file name as content
        assert_eq!(content, "a.png");
    }

    #[test]
    fn new_bundle_becomes_newest_archive() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 1);
        touch_at(tmp.path(), "gallery_png_2019-01-01.zip", -1000);

        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Primary, date())
            .unwrap();

        let listing = scan::scan(tmp.path(), &GalleryConfig::default()).unwrap();
        assert_eq!(
            listing
                .newest_archive(DisplayMode::Primary)
                .map(|a| a.file_name.clone()),
            Some(report.file_name)
        );
        // No partial file left behind
        assert!(
            fs::read_dir(tmp.path())
                .unwrap()
                .all(|e| !e.unwrap().file_name().to_string_lossy().ends_with(".partial"))
        );
    }

    #[test]
    fn empty_gallery_writes_empty_bundle() {
        let tmp = TempDir::new().unwrap();
        let report = bundle(tmp.path(), &GalleryConfig::default(), DisplayMode::Primary, date())
            .unwrap();
        assert!(report.entries.is_empty());
        assert!(archive_names(&tmp.path().join(&report.file_name)).is_empty());
    }
}
