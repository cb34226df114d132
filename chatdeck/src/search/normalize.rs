use unicode_normalization::UnicodeNormalization as _;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Canonically composes `query` (NFC) and strips surrounding whitespace,
/// byte order marks included.
pub fn normalize_query(query: &str) -> String {
    let normalized: String = query.nfc().collect();
    normalized
        .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
        .to_string()
}
