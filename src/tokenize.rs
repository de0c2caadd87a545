//! Word tokenizer for reference and transcript text.
//!
//! Splits text into maximal runs of ASCII letters, digits, and
//! apostrophes (`it's` stays one token). Case is preserved; callers that
//! need case-folding (e.g. the fluency heuristic) lowercase downstream.
//! Total function: any input, including the empty string, yields a
//! (possibly empty) token list.

/// Split `text` into word-like tokens, left to right.
///
/// A token is a maximal run matching `[A-Za-z0-9']+`. Everything else —
/// whitespace, punctuation, non-ASCII symbols — separates tokens and is
/// dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '\'' {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
