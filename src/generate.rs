//! HTML page rendering.
//!
//! Turns a [`Listing`] into the gallery page for one [`DisplayMode`]. The same
//! renderer backs both delivery paths:
//!
//! - **Static** (`flat-gal generate`): writes `index.html` for the primary
//!   format and `<alternate>.html` (e.g. `svg.html`) next to the images.
//! - **Served** (`flat-gal serve`): renders per request; the mode comes from
//!   the `?svg` query flag.
//!
//! Only the toggle link target differs between the two, see [`PageLinks`].
//!
//! ## Page Layout
//!
//! ```text
//! <h1>12 critically endangered species</h1>
//! <div class="intro"> intro markdown
//!     ZIP file | SVG version | Video | Contact </div>
//! <div class="figure"> name label + thumbnail linking to name.png </div>
//! ...
//! ```
//!
//! The mode changes the full-size link extension, which archive is linked and
//! the toggle link. The set and order of figures never change.

use crate::config::{self, GalleryConfig};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::{DisplayMode, ImageEntry, Listing};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// How the toggle link between display modes is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLinks {
    /// One page, mode picked by query string: `./` and `./?svg`.
    Query,
    /// Two files on disk: `index.html` and `svg.html`.
    Static,
}

impl PageLinks {
    /// URL of the page rendering `mode`.
    pub fn page_href(self, mode: DisplayMode, config: &GalleryConfig) -> String {
        match (self, mode) {
            (PageLinks::Query, DisplayMode::Primary) => "./".to_string(),
            (PageLinks::Query, DisplayMode::Alternate) => {
                format!("./?{}", config.formats.alternate)
            }
            (PageLinks::Static, mode) => static_page_name(mode, config),
        }
    }
}

/// File name of the static page for `mode`.
pub fn static_page_name(mode: DisplayMode, config: &GalleryConfig) -> String {
    match mode {
        DisplayMode::Primary => "index.html".to_string(),
        DisplayMode::Alternate => format!("{}.html", config.formats.alternate),
    }
}

/// One written page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub mode: DisplayMode,
    pub file_name: String,
    /// Archive linked from this page, if any existed.
    pub archive: Option<String>,
}

/// Summary of a `generate` run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub image_count: usize,
    /// Base names of images rendered without a thumbnail.
    pub missing_thumbnails: Vec<String>,
}

/// Scan `dir` and write one static page per display mode into it.
pub fn generate(dir: &Path, config: &GalleryConfig) -> Result<GenerateReport, GenerateError> {
    let listing = scan::scan(dir, config)?;
    let mut pages = Vec::new();

    for mode in DisplayMode::ALL {
        let file_name = static_page_name(mode, config);
        let page = render_page(&listing, mode, config, PageLinks::Static);
        fs::write(dir.join(&file_name), page.into_string())?;
        pages.push(GeneratedPage {
            mode,
            file_name,
            archive: listing.newest_archive(mode).map(|a| a.file_name.clone()),
        });
    }

    Ok(GenerateReport {
        pages,
        image_count: listing.image_count(),
        missing_thumbnails: listing
            .images
            .iter()
            .filter(|i| !i.has_thumbnail)
            .map(|i| i.name.clone())
            .collect(),
    })
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    config: &GalleryConfig,
    favicon: Option<&str>,
    css: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if let Some(author) = &config.author {
                    meta name="author" content=(author);
                }
                @if let Some(icon) = favicon {
                    link rel="icon" type="image/png" href=(icon);
                }
                // Full-size images open in a new tab unless a link says otherwise
                base target="_blank";
                title { (config.title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the `ZIP file | SVG version | ...` line.
///
/// The archive link is omitted when no archive exists for `mode`.
fn link_line(listing: &Listing, mode: DisplayMode, config: &GalleryConfig, links: PageLinks) -> Markup {
    let other = mode.other();
    let mut items: Vec<Markup> = Vec::new();

    if let Some(archive) = listing.newest_archive(mode) {
        items.push(html! { a.archive href=(naming::url_path(&archive.file_name)) { "ZIP file" } });
    }
    items.push(html! {
        a.toggle href=(links.page_href(other, config)) target="_self" {
            (other.extension(&config.formats).to_uppercase()) " version"
        }
    });
    for link in &config.links {
        items.push(html! { a href=(link.href) { (link.label) } });
    }

    html! {
        p.links {
            @for (i, item) in items.into_iter().enumerate() {
                @if i > 0 { " | " }
                (item)
            }
        }
    }
}

/// Renders one image: name label behind a thumbnail linking to the full-size file.
fn figure(image: &ImageEntry, mode: DisplayMode, config: &GalleryConfig) -> Markup {
    let size = config.thumbnails.size;
    html! {
        div.figure {
            div.name { (image.name) }
            a href=(naming::url_path(&image.full_size_name(mode, &config.formats))) target="new" {
                @if image.has_thumbnail {
                    img src=(naming::thumbnail_href(&image.file_name, &config.files))
                        width=(size) height=(size) alt=(image.name) loading="lazy";
                } @else {
                    span.placeholder style=(format!("width: {size}px; height: {size}px;")) {
                        (image.name)
                    }
                }
            }
        }
    }
}

fn render_intro(markdown: &str) -> Option<String> {
    if markdown.trim().is_empty() {
        return None;
    }
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, Parser::new(markdown));
    Some(body_html)
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Render the gallery page for one display mode.
pub fn render_page(
    listing: &Listing,
    mode: DisplayMode,
    config: &GalleryConfig,
    links: PageLinks,
) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_theme_css(&config.colors, &config.theme),
        CSS_STATIC
    );

    let content = html! {
        h1 { (listing.image_count()) " " (config.heading) }
        div.intro {
            @if let Some(intro) = render_intro(&config.intro) {
                (PreEscaped(intro))
            }
            (link_line(listing, mode, config, links))
        }
        main.gallery {
            @for image in &listing.images {
                (figure(image, mode, config))
            }
        }
    };

    base_document(config, listing.favicon.as_deref(), &css, content)
}

// ============================================================================
// Tests
// ============================================================================
