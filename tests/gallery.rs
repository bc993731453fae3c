//! Full workflow on a real directory: thumbnails, bundles, static pages.

use chrono::NaiveDate;
use filetime::FileTime;
use flat_gal::types::DisplayMode;
use flat_gal::{bundle, config, generate, scan, thumbs};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png_at(dir: &Path, name: &str, width: u32, height: u32, secs: i64) {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([40, 80, 120]))
        .save(&path)
        .unwrap();
    filetime::set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000 + secs, 0)).unwrap();
}

#[test]
fn thumbs_bundle_then_generate() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write_png_at(dir, "Kakapo.png", 400, 200, 1);
    write_png_at(dir, "Vaquita.png", 200, 400, 2);
    write_png_at(dir, "favicon.png", 16, 16, 3);
    fs::write(dir.join("Vaquita.svg"), "<svg/>").unwrap();

    let config = config::load_config(dir).unwrap();

    let report = thumbs::create_thumbnails(dir, &config, false, None).unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(
        image::image_dimensions(dir.join("thumbs/Kakapo.png")).unwrap(),
        (300, 150)
    );
    assert!(!dir.join("thumbs/favicon.png").exists());

    let date = NaiveDate::from_ymd_opt(2020, 11, 14).unwrap();
    let svg = bundle::bundle(dir, &config, DisplayMode::Alternate, date).unwrap();
    assert_eq!(svg.entries, vec!["Vaquita.svg"]);
    assert_eq!(svg.missing, vec!["Kakapo.svg"]);

    let generated = generate::generate(dir, &config).unwrap();
    assert!(generated.missing_thumbnails.is_empty());
    assert_eq!(generated.image_count, 2);

    let index = fs::read_to_string(dir.join("index.html")).unwrap();
    assert!(index.contains("<h1>2 images</h1>"));
    assert!(index.find("Vaquita.png").unwrap() < index.find("Kakapo.png").unwrap());
    // Only an svg bundle exists, so the primary page has no archive link
    assert!(!index.contains("ZIP file"));

    let alternate = fs::read_to_string(dir.join("svg.html")).unwrap();
    assert!(alternate.contains(r#"href="gallery_svg_2020-11-14.zip""#));
    assert!(alternate.contains(r#"href="Vaquita.svg""#));

    // Generated pages and bundles never show up as images
    let (_, listing) = scan::scan_dir(dir).unwrap();
    assert_eq!(listing.image_count(), 2);
}

#[test]
fn config_overrides_apply_to_page() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write_png_at(dir, "a.png", 10, 10, 1);
    fs::write(
        dir.join("config.toml"),
        r#"
heading = "critically endangered species"

[[links]]
label = "Contact"
href = "mailto:someone@example.com"
"#,
    )
    .unwrap();

    let config = config::load_config(dir).unwrap();
    generate::generate(dir, &config).unwrap();

    let index = fs::read_to_string(dir.join("index.html")).unwrap();
    assert!(index.contains("<h1>1 critically endangered species</h1>"));
    assert!(index.contains(r#"href="mailto:someone@example.com""#));
}

#[test]
fn unknown_config_key_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "colour = \"red\"\n").unwrap();
    assert!(config::load_config(tmp.path()).is_err());
}
