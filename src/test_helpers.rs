//! Shared test utilities for the flat-gal test suite.
//!
//! Gallery fixtures are built on the fly in temp directories: `touch_at`
//! creates a file with a controlled modification time, `write_png` creates a
//! real decodable image for the thumbnail tests.
//!
//! ```rust
//! let tmp = TempDir::new().unwrap();
//! touch_at(tmp.path(), "a.png", 3);
//! touch_at(tmp.path(), "b.png", 1);
//! let listing = scan(tmp.path(), &GalleryConfig::default()).unwrap();
//! assert_eq!(image_names(&listing), vec!["a", "b"]);
//! ```

use filetime::{FileTime, set_file_mtime};
use std::path::{Path, PathBuf};

use crate::types::Listing;

/// Arbitrary fixed origin so test timestamps are far from the epoch.
const BASE_TIME: i64 = 1_600_000_000;

/// Create (or overwrite) `dir/name` and set its mtime to `BASE_TIME + secs`.
pub fn touch_at(dir: &Path, name: &str, secs: i64) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, name.as_bytes()).unwrap();
    set_mtime(&path, secs);
    path
}

/// Set an existing file's mtime to `BASE_TIME + secs`.
pub fn set_mtime(path: &Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(BASE_TIME + secs, 0)).unwrap();
}

/// Write a solid-color RGB PNG of the given size.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

// =========================================================================
// Listing extractors
// =========================================================================

/// Image base names in listing order.
pub fn image_names(listing: &Listing) -> Vec<&str> {
    listing.images.iter().map(|i| i.name.as_str()).collect()
}

/// Positions of `needles` in `haystack`, panicking on a miss.
///
/// Used to assert render order without parsing HTML.
pub fn positions_in(haystack: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| {
            haystack
                .find(n)
                .unwrap_or_else(|| panic!("'{n}' not found in rendered output"))
        })
        .collect()
}

/// Assert `needles` occur in `haystack` in the given order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let positions = positions_in(haystack, needles);
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "expected order {needles:?}, found positions {positions:?}"
    );
}
