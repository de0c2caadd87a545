//! Copy-detection gate for written submissions.
//!
//! Summaries and essays that largely reproduce the source text (or the
//! question prompt) are rejected before any judging call is spent on
//! them. The check is a char-level similarity ratio over normalized
//! text, so reordering or light punctuation changes do not evade it.

use crate::align::matcher::Matcher;

/// Submissions above this ratio are rejected as too similar.
pub const REJECT_THRESHOLD: f64 = 0.7;

/// Lowercase and strip everything but ASCII alphanumerics and
/// whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Char-level similarity of the normalized texts, in `[0.0, 1.0]`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    Matcher::new(&a, &b).ratio()
}
