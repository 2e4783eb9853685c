//! Normalization of user-entered text.
//!
//! Form fields and search queries arrive in whatever Unicode form the
//! browser produced. Stored content is NFC, so input is composed to NFC
//! before it is compared or saved.

use unicode_normalization::UnicodeNormalization;

/// Compose to NFC and trim surrounding whitespace.
///
/// # Examples
///
/// ```
/// use paleoanthro::utils::normalize_input;
///
/// assert_eq!(normalize_input("  Homo naledi \n"), "Homo naledi");
/// assert_eq!(normalize_input("Ma\u{301}laga"), "Málaga");
/// ```
pub fn normalize_input(s: &str) -> String {
    s.nfc().collect::<String>().trim().to_string()
}

/// Compose to NFC and collapse every whitespace run into a single space.
///
/// # Examples
///
/// ```
/// use paleoanthro::utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Jane \t  Doe "), "Jane Doe");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Normalized value of an optional form field; blank becomes `None`.
pub fn non_empty(s: &str) -> Option<String> {
    let value = normalize_input(s);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
