//! Judge response contract and lenient parsing.
//!
//! The text-generation service is prompted to return strict JSON with
//! numeric sub-scores, feedback, and improvement suggestions. Models do
//! not always comply, so parsing degrades in stages: strict JSON, then
//! the first `{...}` span (code fences and prose wrappers), then loose
//! `Label: NN` extraction over the raw text, and finally an empty
//! verdict. A malformed judge response is recoverable, never a panic.

pub mod prompt;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::score::extract_score;

/// Judge feedback: a flat list of comments, a per-category map, or a
/// single note. All three shapes occur depending on the task prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Feedback {
    Notes(Vec<String>),
    ByCategory(BTreeMap<String, String>),
    Note(String),
}

impl Default for Feedback {
    fn default() -> Self {
        Feedback::Notes(Vec::new())
    }
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        match self {
            Feedback::Notes(notes) => notes.is_empty(),
            Feedback::ByCategory(map) => map.is_empty(),
            Feedback::Note(note) => note.is_empty(),
        }
    }
}

/// Parsed judge response.
///
/// `scores` maps category names (e.g. `"Content"`) to optional `0..=100`
/// values; a category the judge declined to score is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub scores: BTreeMap<String, Option<u8>>,
    #[serde(default)]
    pub feedback: Feedback,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(rename = "overallSummary", default, skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_answer_correct: Option<bool>,
}

impl Verdict {
    /// Score for `category`, if the judge supplied one.
    pub fn score(&self, category: &str) -> Option<u8> {
        self.scores.get(category).copied().flatten()
    }

    /// Parse judge output, degrading gracefully on malformed responses.
    ///
    /// `categories` lists the score labels expected for the task; they
    /// seed the loose-extraction fallback and are guaranteed present
    /// (possibly `None`) in the returned `scores` map.
    pub fn parse_lenient(text: &str, categories: &[&str]) -> Verdict {
        let trimmed = text.trim();
        let mut verdict = serde_json::from_str::<Verdict>(trimmed)
            .ok()
            .or_else(|| {
                // code fences or prose around the JSON object
                let start = trimmed.find('{')?;
                let end = trimmed.rfind('}')?;
                serde_json::from_str::<Verdict>(&trimmed[start..=end]).ok()
            })
            .unwrap_or_else(|| {
                debug!(len = text.len(), "judge response is not JSON, extracting loose scores");
                let mut fallback = Verdict::default();
                for &category in categories {
                    fallback
                        .scores
                        .insert(category.to_owned(), extract_score(text, category));
                }
                fallback
            });
        for &category in categories {
            verdict.scores.entry(category.to_owned()).or_insert(None);
        }
        verdict
    }
}
