use std::collections::HashMap;

/// Token-exact typo corrections applied during normalization.
///
/// Keys and values must already be lowercase; [`crate::config`] enforces this
/// when the table is loaded, which keeps `normalize` idempotent.
pub type CorrectionTable = HashMap<String, String>;

/// Normalize a raw utterance: lowercase, strip characters outside
/// word characters / whitespace / `.` `:` `/`, collapse whitespace runs,
/// and apply token-exact typo corrections.
///
/// Total and deterministic; never fails on any input.
pub fn normalize(raw: &str, corrections: &CorrectionTable) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|&c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ':' | '/')
        })
        .collect();

    cleaned
        .split_whitespace()
        .map(|token| corrections.get(token).map(String::as_str).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
