// crates/travelmap-core/src/text.rs
//! Text normalization helpers shared across the lookup paths.

use deunicode::deunicode;

/// The marker substring identifying China-mode logs.
pub const CHINA_MARKER: &str = "中国";

/// Delimiters accepted between the city segment and the rest of a location
/// string: ideographic comma, full-width comma, ASCII comma.
const SEGMENT_DELIMITERS: [char; 3] = ['、', '，', ','];

/// Accent-insensitive, case-insensitive folding for name comparison.
///
/// Used when matching GeoJSON feature names against mapping-derived names
/// ("Inner Mongolia" vs "inner mongolia"). Non-Latin scripts pass through
/// deunicode transliteration, so folding is stable for both sides of a
/// comparison as long as both go through it.
pub fn fold_key(s: &str) -> String {
    deunicode(s.trim()).to_lowercase()
}

/// Folded equality on two names.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Derive the primary city segment of a free-text location string.
///
/// The documented rule, and the only one: everything before the first
/// delimiter (`、`, `，` or `,`), trimmed. Edge cases:
/// - no delimiter present: the whole trimmed string;
/// - multiple delimiters: still the first segment, nothing further is
///   inferred from the remainder;
/// - empty or delimiter-leading input: an empty string (callers treat that
///   as a mapping miss).
pub fn primary_city(location: &str) -> &str {
    match location.find(SEGMENT_DELIMITERS) {
        Some(idx) => location[..idx].trim(),
        None => location.trim(),
    }
}

/// Whether a log's location names China.
pub fn mentions_china(location: &str) -> bool {
    location.contains(CHINA_MARKER)
}
