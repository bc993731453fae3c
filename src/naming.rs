//! File-name conventions for the gallery directory.
//!
//! Three kinds of names matter:
//!
//! - **Images**: `<name>.<primary>` (e.g. `Vaquita.png`). The base name is the
//!   display label and the stem of every sibling (`Vaquita.svg`, `thumbs/Vaquita.png`).
//! - **Reserved names**: the favicon and any configured excludes. They share
//!   the image extension but are never listed.
//! - **Archives**: `<prefix>_<format>_<tag>.zip`, e.g.
//!   `endangered_species_png_2020-11-14.zip`. The tag is free-form; `bundle`
//!   writes the date.

use crate::config::{FilesConfig, FormatsConfig};
use crate::types::DisplayMode;

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Split a file name into its base name and extension.
///
/// Only the last dot counts: `a.b.png` → (`a.b`, `png`). Names without an
/// extension and dot-files (`.png`) yield `None`.
pub fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some((stem, ext)),
        _ => None,
    }
}

/// Base name of an image file if it carries the primary extension and is not reserved.
pub fn image_base_name<'a>(
    file_name: &'a str,
    formats: &FormatsConfig,
    files: &FilesConfig,
) -> Option<&'a str> {
    if file_name.starts_with('.') || files.is_reserved(file_name) {
        return None;
    }
    let (stem, ext) = split_extension(file_name)?;
    ext.eq_ignore_ascii_case(&formats.primary).then_some(stem)
}

/// Name prefix shared by every archive of `mode`: `<prefix>_<ext>_`.
fn archive_stem_prefix(mode: DisplayMode, formats: &FormatsConfig, files: &FilesConfig) -> String {
    format!("{}_{}_", files.archive_prefix, mode.extension(formats))
}

/// Which display mode an archive file belongs to, if it follows the convention.
///
/// The tag between the format and `.zip` may be anything, including empty.
pub fn archive_mode(
    file_name: &str,
    formats: &FormatsConfig,
    files: &FilesConfig,
) -> Option<DisplayMode> {
    let (stem, ext) = split_extension(file_name)?;
    if !ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION) {
        return None;
    }
    DisplayMode::ALL
        .into_iter()
        .find(|&mode| stem.starts_with(&archive_stem_prefix(mode, formats, files)))
}

/// Archive file name for `mode` with the given tag.
pub fn archive_file_name(
    mode: DisplayMode,
    tag: &str,
    formats: &FormatsConfig,
    files: &FilesConfig,
) -> String {
    format!(
        "{}{}.{}",
        archive_stem_prefix(mode, formats, files),
        tag,
        ARCHIVE_EXTENSION
    )
}

/// Percent-encode a relative path for use in `href`/`src`.
///
/// Each `/`-separated segment is encoded on its own, so `#`, `?` and `%` in a
/// file name stay part of the path.
pub fn url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative URL of an image's thumbnail.
pub fn thumbnail_href(file_name: &str, files: &FilesConfig) -> String {
    url_path(&format!(
        "{}/{}",
        files.thumbs_dir.trim_end_matches('/'),
        file_name
    ))
}
