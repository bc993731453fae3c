//! Gallery configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` that lives next
//! to the images. Stock defaults are overridden by whatever the file sets.
//!
//! ## Config File Location
//!
//! ```text
//! gallery/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── favicon.png              # Reserved, never listed as an image
//! ├── a.png
//! ├── a.svg                    # Alternate-format sibling
//! ├── thumbs/
//! │   └── a.png
//! └── species_png_2020-11-14.zip
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! title = "Critically endangered species gallery"
//! heading = "critically endangered species"
//!
//! [files]
//! archive_prefix = "endangered_species"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Run `flat-gal gen-config`
//! for the fully documented file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Document `<title>`.
    pub title: String,
    /// Text after the image count in the page heading ("12 renders").
    pub heading: String,
    /// Markdown shown under the heading, above the link line.
    pub intro: String,
    /// Optional `<meta name="author">`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub files: FilesConfig,
    pub formats: FormatsConfig,
    pub thumbnails: ThumbnailsConfig,
    /// Extra links appended to the link line, in order.
    pub links: Vec<LinkConfig>,
    pub colors: ColorConfig,
    pub theme: ThemeConfig,
    pub processing: ProcessingConfig,
    pub server: ServerConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            heading: "images".to_string(),
            intro: String::new(),
            author: None,
            files: FilesConfig::default(),
            formats: FormatsConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            links: Vec::new(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
            processing: ProcessingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are usable for scanning and rendering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, ext) in [
            ("formats.primary", &self.formats.primary),
            ("formats.alternate", &self.formats.alternate),
        ] {
            if ext.is_empty() || ext.contains('.') || ext.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a bare extension like \"png\""
                )));
            }
        }
        if self.formats.primary.eq_ignore_ascii_case(&self.formats.alternate) {
            return Err(ConfigError::Validation(
                "formats.primary and formats.alternate must differ".into(),
            ));
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        if self.files.archive_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "files.archive_prefix must not be empty".into(),
            ));
        }
        let thumbs_dir = Path::new(&self.files.thumbs_dir);
        if self.files.thumbs_dir.is_empty()
            || thumbs_dir.has_root()
            || thumbs_dir.is_absolute()
            || self.files.thumbs_dir.contains("..")
        {
            return Err(ConfigError::Validation(
                "files.thumbs_dir must be a subdirectory name".into(),
            ));
        }
        if let Some(link) = self.links.iter().find(|l| l.label.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "link to {} has an empty label",
                link.href
            )));
        }
        Ok(())
    }
}

/// File naming conventions inside the gallery directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Favicon file. Linked from the page head when present, never listed.
    /// Set to `""` to disable.
    pub favicon: String,
    /// Further file names that must never be listed as images.
    pub exclude: Vec<String>,
    /// Subdirectory holding thumbnails with the same file names as the images.
    pub thumbs_dir: String,
    /// Archives are named `<archive_prefix>_<format>_<anything>.zip`.
    pub archive_prefix: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            favicon: "favicon.png".to_string(),
            exclude: Vec::new(),
            thumbs_dir: "thumbs".to_string(),
            archive_prefix: "gallery".to_string(),
        }
    }
}

impl FilesConfig {
    /// The favicon file name, if one is configured.
    pub fn favicon(&self) -> Option<&str> {
        (!self.favicon.is_empty()).then_some(self.favicon.as_str())
    }

    /// Whether `file_name` is reserved and must not be listed as an image.
    pub fn is_reserved(&self, file_name: &str) -> bool {
        self.favicon() == Some(file_name) || self.exclude.iter().any(|e| e == file_name)
    }
}

/// The two image formats the page can link to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatsConfig {
    /// Extension of the listed images and the default full-size links.
    pub primary: String,
    /// Extension selected by the `?<alternate>` query flag.
    pub alternate: String,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            primary: "png".to_string(),
            alternate: "svg".to_string(),
        }
    }
}

/// Thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding box edge in pixels. Thumbnails fit inside `size × size`.
    pub size: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { size: 300 }
    }
}

/// An extra link in the link line under the heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    pub label: String,
    pub href: String,
}

/// Page colors. The gallery has a single (dark) scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    /// Body text, including the intro paragraph.
    pub text: String,
    /// Heading with the image count.
    pub heading: String,
    pub link: String,
    /// Inset highlight drawn around a hovered thumbnail.
    pub highlight: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            text: "#333333".to_string(),
            heading: "#777777".to_string(),
            link: "#555555".to_string(),
            highlight: "rgba(255, 255, 255, 0.2)".to_string(),
        }
    }
}

/// Typography settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// CSS `font-family` value for the whole page.
    pub font_family: String,
    /// Render all text in capitals.
    pub uppercase: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            uppercase: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Defaults for `flat-gal serve`. CLI flags win over these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GalleryConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the gallery directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config for a gallery directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command. Parsing it yields the defaults.
pub fn stock_config_toml() -> &'static str {
    r##"# flat-gal configuration
# ======================
#
# Place this file next to the images. Every key is optional; delete what you
# don't change.

# Document <title>.
title = "Gallery"

# The heading reads "<number of images> <heading>".
heading = "images"

# Markdown paragraph under the heading.
intro = ""

# Adds <meta name="author"> when set.
# author = "Your Name"

[files]
# Linked as the page icon when present. Never listed as an image.
favicon = "favicon.png"
# More file names that must never be listed.
exclude = []
# Thumbnails live here, with the same file names as the images.
thumbs_dir = "thumbs"
# Archives are named <archive_prefix>_<format>_<anything>.zip, e.g.
# gallery_png_2020-11-14.zip. The newest one per format is linked.
archive_prefix = "gallery"

[formats]
# Images are listed by this extension; full-size links use it by default.
primary = "png"
# "?svg" switches full-size links and the archive to this extension.
alternate = "svg"

[thumbnails]
# Thumbnails fit inside size x size pixels.
size = 300

# Extra links after "ZIP file | SVG version", in order.
# [[links]]
# label = "Video"
# href = "https://example.com/video"

[colors]
background = "#000000"
text = "#333333"
heading = "#777777"
link = "#555555"
highlight = "rgba(255, 255, 255, 0.2)"

[theme]
font_family = "sans-serif"
uppercase = true

[processing]
# Parallel thumbnail workers (omit for one per CPU core).
# max_processes = 4

[server]
host = "127.0.0.1"
port = 8080
"##
}

/// Generate the CSS custom properties block from the color and theme config.
pub fn generate_theme_css(colors: &ColorConfig, theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-background: {background};
    --color-text: {text};
    --color-heading: {heading};
    --color-link: {link};
    --color-highlight: {highlight};
    --font-family: {font};
    --text-transform: {transform};
}}"#,
        background = colors.background,
        text = colors.text,
        heading = colors.heading,
        link = colors.link,
        highlight = colors.highlight,
        font = theme.font_family,
        transform = if theme.uppercase { "uppercase" } else { "none" },
    )
}
