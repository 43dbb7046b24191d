//! Font-color similarity for heading detection.
//!
//! The layout analyzer reports font colors as `#rrggbb` hex strings, but a
//! document's accent color rarely survives PDF rendering exactly — the
//! reference burgundy may come back a few units off per channel. Similarity
//! is therefore Euclidean distance in RGB space against a threshold.

/// Default similarity threshold in RGB distance units.
pub const DEFAULT_COLOR_THRESHOLD: f64 = 30.0;

/// Decode a `#rrggbb` (or `rrggbb`) hex string into RGB components.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    // Length is in bytes; non-ASCII input must bail before slicing.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Euclidean distance between two RGB colors.
pub fn color_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dg = a.1 as f64 - b.1 as f64;
    let db = a.2 as f64 - b.2 as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// True when `comparison` lies within `threshold` RGB distance of
/// `reference`. Undecodable colors never match.
pub fn is_similar_color(reference: &str, comparison: &str, threshold: f64) -> bool {
    match (hex_to_rgb(reference), hex_to_rgb(comparison)) {
        (Some(a), Some(b)) => color_distance(a, b) <= threshold,
        _ => false,
    }
}
