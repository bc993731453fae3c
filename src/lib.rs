//! # Flat Gal
//!
//! A single-page gallery for one flat directory of rendered images. The
//! directory is the data source: every `<name>.png` becomes a thumbnail on the
//! page, newest first, linking to its full-size file, and the most recent
//! `<prefix>_png_*.zip` bundle is linked at the top. An alternate view
//! (`?svg`) links every image to its `<name>.svg` sibling instead.
//!
//! # Architecture: Scan, Then Render
//!
//! ```text
//! gallery/  ──scan──▶  Listing  ──render_page──▶  HTML
//!                         │
//!                         ├──▶ thumbs   (thumbs/<file>, rayon)
//!                         └──▶ bundle   (<prefix>_<ext>_<date>.zip)
//! ```
//!
//! The listing is built fresh for every page. Nothing is cached between
//! renders: adding a file to the directory is the whole publishing workflow.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists images and archives, newest first |
//! | [`generate`] | Renders the page with Maud, writes static pages |
//! | [`serve`] | axum server that renders per request and serves files |
//! | [`thumbs`] | Parallel thumbnail generation |
//! | [`bundle`] | Zip bundles of the full-size files per format |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Listing types and the display mode |
//! | [`naming`] | File name conventions for images, thumbnails and archives |
//! | [`imaging`] | Pure-Rust thumbnail operations behind a backend trait |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Modification Time Is the Order
//!
//! There are no numeric prefixes or sidecar files. The newest render goes on
//! top. Equal timestamps fall back to file name so the order is stable.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). File names end up
//! in attributes and text, and Maud escapes every interpolation.
//!
//! ## Missing Pieces Degrade, Never Fail
//!
//! No archive means no archive link. No thumbnail means a placeholder in the
//! figure. A file that disappears mid-scan is left out. Only an unreadable
//! gallery directory is an error.

pub mod bundle;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod serve;
pub mod thumbs;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
