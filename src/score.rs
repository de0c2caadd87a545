//! Heuristic score derivation and blending.
//!
//! Computed scores are integers in `0..=100`. Rounding is ties-to-even
//! throughout, so exact halves do not drift upward.

use crate::align::AlignmentStats;
use crate::tokenize::tokenize;

/// Filler tokens penalised by the fluency heuristic.
pub const FILLER_WORDS: [&str; 7] = ["um", "uh", "hmm", "erm", "mm", "uhm", "ah"];

/// Percentage of reference tokens that matched exactly.
///
/// An empty reference scores 0 by convention, not as an error.
pub fn content_score_from_stats(stats: &AlignmentStats) -> u8 {
    if stats.ref_tokens == 0 {
        return 0;
    }
    let score = (100.0 * stats.matches as f64 / stats.ref_tokens as f64).round_ties_even();
    score.clamp(0.0, 100.0) as u8
}

/// Filler-word fluency heuristic: 5 points per filler token, capped at
/// a 30-point penalty.
pub fn fluency_score_from_text(text: &str) -> u8 {
    let filler_count = tokenize(text)
        .iter()
        .filter(|t| FILLER_WORDS.contains(&t.to_lowercase().as_str()))
        .count();
    let penalty = (filler_count * 5).min(30) as u8;
    100 - penalty
}

/// Blend a locally computed score with an externally supplied one.
///
/// One side absent passes the other through unchanged; both absent is
/// absent; both present averages, rounded.
pub fn combine_scores(computed: Option<u8>, llm: Option<u8>) -> Option<u8> {
    match (computed, llm) {
        (None, None) => None,
        (Some(c), None) => Some(c),
        (None, Some(l)) => Some(l),
        (Some(c), Some(l)) => Some(((c as f64 + l as f64) / 2.0).round_ties_even() as u8),
    }
}

/// Pull a `Label: NN` style score out of free text, case-insensitively.
///
/// Accepts `Content - 90`, `Content: 90`, and `Content 90`, with any
/// mix of whitespace (including line breaks) around the separator.
/// Values are clamped to `0..=100`. Fallback path for judge responses
/// that fail strict JSON parsing.
pub fn extract_score(text: &str, label: &str) -> Option<u8> {
    let lower = text.to_lowercase();
    let needle = label.to_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let after = from + pos + needle.len();
        let rest = &lower[after..];
        let trimmed = rest.trim_start_matches([' ', '\t', '\r', '\n', ':', '-', '*']);
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && digits.len() <= 3 {
            if let Ok(value) = digits.parse::<u16>() {
                return Some(value.min(100) as u8);
            }
        }
        from = after;
    }
    None
}
