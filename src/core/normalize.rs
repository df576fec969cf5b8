// File: src/core/normalize.rs
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form: lowercase, NFD-decomposed, with combining
/// diacritical marks removed. "Crème" and "creme" both become "creme".
///
/// Never fails. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|&c| !is_combining_diacritic(c))
        .collect()
}

/// Same as [`normalize`] but tolerates an absent value.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// The "Combining Diacritical Marks" family of Unicode blocks.
fn is_combining_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}
