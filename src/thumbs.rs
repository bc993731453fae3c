//! Thumbnail generation.
//!
//! Fills `<thumbs_dir>/` with a reduced copy of every listed image. Each
//! thumbnail keeps the image's file name and fits inside the configured
//! `thumbnails.size` box without upscaling.
//!
//! ## Incremental by Default
//!
//! Images that already have a thumbnail are skipped unless `force` is set.
//! Nothing is hashed: a thumbnail's presence is the only signal, matching how
//! the page decides whether to show an `<img>`.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon).
//! Progress is reported per image over an optional `mpsc` channel so the CLI
//! can print while workers run. A decode failure is reported for that image
//! and does not abort the run.

use crate::config::GalleryConfig;
use crate::imaging::{ImageBackend, RustBackend, ThumbnailParams, fit_within};
use crate::scan::{self, ScanError};
use rayon::prelude::*;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ThumbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Outcome for a single image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbStatus {
    Created { width: u32, height: u32 },
    Existing,
    Failed(String),
}

/// Progress event sent while thumbnails are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbEvent {
    Started { total: usize },
    Image {
        /// 1-based position in the newest-first listing.
        index: usize,
        file_name: String,
        status: ThumbStatus,
    },
}

/// Totals for a thumbnail run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbReport {
    pub created: usize,
    pub existing: usize,
    pub failed: Vec<String>,
}

impl std::fmt::Display for ThumbReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} existing, {} failed",
            self.created,
            self.existing,
            self.failed.len()
        )
    }
}

/// Generate missing thumbnails with the pure Rust backend.
pub fn create_thumbnails(
    dir: &Path,
    config: &GalleryConfig,
    force: bool,
    events: Option<Sender<ThumbEvent>>,
) -> Result<ThumbReport, ThumbError> {
    create_thumbnails_with_backend(&RustBackend::new(), dir, config, force, events)
}

/// Generate thumbnails using a specific backend (allows testing with mock).
pub fn create_thumbnails_with_backend(
    backend: &impl ImageBackend,
    dir: &Path,
    config: &GalleryConfig,
    force: bool,
    events: Option<Sender<ThumbEvent>>,
) -> Result<ThumbReport, ThumbError> {
    let listing = scan::scan(dir, config)?;
    let thumbs_dir = dir.join(&config.files.thumbs_dir);
    std::fs::create_dir_all(&thumbs_dir)?;

    let emit = |event: ThumbEvent| {
        if let Some(tx) = &events {
            // The receiver going away only stops progress output.
            tx.send(event).ok();
        }
    };
    emit(ThumbEvent::Started {
        total: listing.images.len(),
    });

    let statuses: Vec<(String, ThumbStatus)> = listing
        .images
        .par_iter()
        .enumerate()
        .map(|(idx, image)| {
            let status = if image.has_thumbnail && !force {
                ThumbStatus::Existing
            } else {
                let params = |(width, height): (u32, u32)| ThumbnailParams {
                    source: dir.join(&image.file_name),
                    output: thumbs_dir.join(&image.file_name),
                    width,
                    height,
                };
                let result = backend
                    .identify(&dir.join(&image.file_name))
                    .map(|d| fit_within((d.width, d.height), config.thumbnails.size))
                    .and_then(|dims| backend.thumbnail(&params(dims)).map(|()| dims));
                match result {
                    Ok((width, height)) => ThumbStatus::Created { width, height },
                    Err(e) => {
                        warn!(file = %image.file_name, error = %e, "thumbnail failed");
                        ThumbStatus::Failed(e.to_string())
                    }
                }
            };
            emit(ThumbEvent::Image {
                index: idx + 1,
                file_name: image.file_name.clone(),
                status: status.clone(),
            });
            (image.file_name.clone(), status)
        })
        .collect();

    let mut report = ThumbReport::default();
    for (file_name, status) in statuses {
        match status {
            ThumbStatus::Created { .. } => report.created += 1,
            ThumbStatus::Existing => report.existing += 1,
            ThumbStatus::Failed(_) => report.failed.push(file_name),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn creates_only_missing_thumbnails() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 2);
        touch_at(tmp.path(), "b.png", 1);
        std::fs::create_dir_all(tmp.path().join("thumbs")).unwrap();
        touch_at(&tmp.path().join("thumbs"), "b.png", 1);

        let backend = MockBackend::with_dimensions(&[("a.png", 1200, 1200), ("b.png", 600, 600)]);
        let report = create_thumbnails_with_backend(
            &backend,
            tmp.path(),
            &GalleryConfig::default(),
            false,
            None,
        )
        .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.existing, 1);
        assert!(report.failed.is_empty());
        let thumbs = backend.thumbnails();
        assert_eq!(thumbs.len(), 1);
        assert!(matches!(
            &thumbs[0],
            RecordedOp::Thumbnail { source, width: 300, height: 300, .. } if source == "a.png"
        ));
    }

    #[test]
    fn force_regenerates_existing() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 1);
        std::fs::create_dir_all(tmp.path().join("thumbs")).unwrap();
        touch_at(&tmp.path().join("thumbs"), "a.png", 1);

        let backend = MockBackend::with_dimensions(&[("a.png", 100, 50)]);
        let report = create_thumbnails_with_backend(
            &backend,
            tmp.path(),
            &GalleryConfig::default(),
            true,
            None,
        )
        .unwrap();

        assert_eq!(report.created, 1);
        // Already small enough: same dimensions, not upscaled
        assert!(matches!(
            &backend.thumbnails()[0],
            RecordedOp::Thumbnail { width: 100, height: 50, .. }
        ));
    }

    #[test]
    fn thumbnail_size_from_config() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "wide.png", 1);

        let mut config = GalleryConfig::default();
        config.thumbnails.size = 100;
        let backend = MockBackend::with_dimensions(&[("wide.png", 400, 200)]);
        create_thumbnails_with_backend(&backend, tmp.path(), &config, false, None).unwrap();

        assert!(matches!(
            &backend.thumbnails()[0],
            RecordedOp::Thumbnail { width: 100, height: 50, .. }
        ));
    }

    #[test]
    fn decode_failure_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "good.png", 2);
        touch_at(tmp.path(), "broken.png", 1);

        let backend = MockBackend::with_dimensions(&[("good.png", 10, 10)]);
        let report = create_thumbnails_with_backend(
            &backend,
            tmp.path(),
            &GalleryConfig::default(),
            false,
            None,
        )
        .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.failed, vec!["broken.png".to_string()]);
    }

    #[test]
    fn events_sent_for_every_image() {
        let tmp = TempDir::new().unwrap();
        touch_at(tmp.path(), "a.png", 2);
        touch_at(tmp.path(), "b.png", 1);

        let backend = MockBackend::with_dimensions(&[("a.png", 10, 10), ("b.png", 10, 10)]);
        let (tx, rx) = std::sync::mpsc::channel();
        create_thumbnails_with_backend(
            &backend,
            tmp.path(),
            &GalleryConfig::default(),
            false,
            Some(tx),
        )
        .unwrap();

        let events: Vec<ThumbEvent> = rx.iter().collect();
        assert_eq!(events[0], ThumbEvent::Started { total: 2 });
        assert_eq!(events.len(), 3);
        let mut indices: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                ThumbEvent::Image { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        indices.sort();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn real_backend_writes_thumbnail_files() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "render.png", 600, 400);

        let report =
            create_thumbnails(tmp.path(), &GalleryConfig::default(), false, None).unwrap();

        assert_eq!(report.created, 1);
        let thumb = tmp.path().join("thumbs/render.png");
        assert_eq!(image::image_dimensions(&thumb).unwrap(), (300, 200));
    }
}
