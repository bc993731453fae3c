//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions that fit `source` inside a `bound × bound` box.
///
/// Aspect ratio is preserved and images are never upscaled: a source that
/// already fits is returned unchanged. Edges are rounded to the nearest pixel
/// and never drop below 1.
///
/// ```
/// # use flat_gal::imaging::fit_within;
/// assert_eq!(fit_within((1200, 1200), 300), (300, 300));
/// assert_eq!(fit_within((1600, 900), 300), (300, 169));
/// assert_eq!(fit_within((200, 100), 300), (200, 100));
/// ```
pub fn fit_within(source: (u32, u32), bound: u32) -> (u32, u32) {
    let (w, h) = source;
    if w <= bound && h <= bound {
        return (w, h);
    }
    let scale = bound as f64 / w.max(h) as f64;
    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, bound);
    (scaled(w), scaled(h))
}
