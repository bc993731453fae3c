//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. The thumbnail pass
//! computes them from config and source dimensions; the backend does the
//! pixel work. A mock backend can record them without touching pixels.

use std::path::PathBuf;

/// Full specification for a thumbnail: source, output path, final dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
