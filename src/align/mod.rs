//! Token alignment and analysis reporting.
//!
//! Compares a reference token sequence against a candidate (typically a
//! transcript) and classifies every token as matched, substituted,
//! missing, or extra, with a plural/singular flag on substitutions.
//! Pure and synchronous: fresh state per call, no I/O, deterministic
//! output for identical inputs.

pub mod matcher;

use serde::{Deserialize, Serialize};

use crate::morph::{self, IrregularPlurals, LemmaLookup};
use crate::tokenize::tokenize;
use matcher::{Matcher, OpTag};

/// Alignment status of one report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Identical tokens aligned.
    Match,
    /// Differing tokens aligned positionally.
    Substitution,
    /// Reference token with no candidate counterpart.
    Missing,
    /// Candidate token with no reference counterpart.
    Extra,
}

/// One row of the per-token alignment report.
///
/// Index/token fields are `None` (JSON `null`) on the side that has no
/// counterpart: `Missing` rows carry no candidate fields, `Extra` rows
/// no reference fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentEntry {
    pub ref_index: Option<usize>,
    pub ref_token: Option<String>,
    pub trans_index: Option<usize>,
    pub trans_token: Option<String>,
    pub status: EntryStatus,
    pub plural_singular_mismatch: bool,
}

/// Aggregate counters over an alignment report.
///
/// Invariants: `matches + substitutions + missing == ref_tokens` and
/// `matches + substitutions + extra == trans_tokens`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub ref_tokens: usize,
    pub trans_tokens: usize,
    pub matches: usize,
    pub substitutions: usize,
    pub missing: usize,
    pub extra: usize,
    pub plural_mismatches: usize,
}

/// Full output of [`Analyzer::analyze`]: per-token rows plus counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: Vec<AlignmentEntry>,
    pub stats: AlignmentStats,
}

/// Tokenizes and aligns reference/candidate text pairs.
///
/// Carries the optional [`LemmaLookup`] capability used by the
/// plural/singular predicate on substitutions. The default analyzer
/// ships the built-in irregular-plural table; [`Analyzer::bare`] drops
/// it, leaving suffix heuristics only.
pub struct Analyzer {
    lemma: Option<Box<dyn LemmaLookup>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with the built-in irregular-plural table.
    pub fn new() -> Self {
        Self {
            lemma: Some(Box::new(IrregularPlurals::new())),
        }
    }

    /// Analyzer without any irregular-plural lookup.
    pub fn bare() -> Self {
        Self { lemma: None }
    }

    /// Analyzer with a caller-supplied lemma lookup.
    pub fn with_lemma_lookup(lookup: Box<dyn LemmaLookup>) -> Self {
        Self {
            lemma: Some(lookup),
        }
    }

    /// Tokenize both texts and align them.
    pub fn analyze(&self, reference_text: &str, candidate_text: &str) -> AnalysisReport {
        let ref_tokens = tokenize(reference_text);
        let trans_tokens = tokenize(candidate_text);
        let (analysis, stats) = self.align(&ref_tokens, &trans_tokens);
        AnalysisReport { analysis, stats }
    }

    /// Align two token sequences into report rows and counters.
    ///
    /// Walks the edit script: `Equal` runs emit `Match` rows pairwise;
    /// `Replace` runs pair the first `min(R, C)` tokens as
    /// `Substitution` rows, then emit leftover reference tokens as
    /// `Missing` followed by leftover candidate tokens as `Extra`;
    /// `Delete`/`Insert` runs emit `Missing`/`Extra` rows. Total over
    /// any two sequences, including empty ones.
    pub fn align(
        &self,
        ref_tokens: &[String],
        trans_tokens: &[String],
    ) -> (Vec<AlignmentEntry>, AlignmentStats) {
        let mut analysis = Vec::new();
        let mut stats = AlignmentStats {
            ref_tokens: ref_tokens.len(),
            trans_tokens: trans_tokens.len(),
            ..AlignmentStats::default()
        };

        for op in Matcher::new(ref_tokens, trans_tokens).opcodes() {
            match op.tag {
                OpTag::Equal => {
                    for (ri, tj) in (op.a_start..op.a_end).zip(op.b_start..op.b_end) {
                        stats.matches += 1;
                        analysis.push(AlignmentEntry {
                            ref_index: Some(ri),
                            ref_token: Some(ref_tokens[ri].clone()),
                            trans_index: Some(tj),
                            trans_token: Some(trans_tokens[tj].clone()),
                            status: EntryStatus::Match,
                            plural_singular_mismatch: false,
                        });
                    }
                }
                OpTag::Replace => {
                    let r = op.a_end - op.a_start;
                    let c = op.b_end - op.b_start;
                    let paired = r.min(c);
                    for k in 0..paired {
                        let ri = op.a_start + k;
                        let tj = op.b_start + k;
                        let plural = morph::is_plural_singular_mismatch(
                            &ref_tokens[ri],
                            &trans_tokens[tj],
                            self.lemma.as_deref(),
                        );
                        if plural {
                            stats.plural_mismatches += 1;
                        }
                        stats.substitutions += 1;
                        analysis.push(AlignmentEntry {
                            ref_index: Some(ri),
                            ref_token: Some(ref_tokens[ri].clone()),
                            trans_index: Some(tj),
                            trans_token: Some(trans_tokens[tj].clone()),
                            status: EntryStatus::Substitution,
                            plural_singular_mismatch: plural,
                        });
                    }
                    for ri in op.a_start + paired..op.a_end {
                        stats.missing += 1;
                        analysis.push(missing_entry(ri, &ref_tokens[ri]));
                    }
                    for tj in op.b_start + paired..op.b_end {
                        stats.extra += 1;
                        analysis.push(extra_entry(tj, &trans_tokens[tj]));
                    }
                }
                OpTag::Delete => {
                    for ri in op.a_start..op.a_end {
                        stats.missing += 1;
                        analysis.push(missing_entry(ri, &ref_tokens[ri]));
                    }
                }
                OpTag::Insert => {
                    for tj in op.b_start..op.b_end {
                        stats.extra += 1;
                        analysis.push(extra_entry(tj, &trans_tokens[tj]));
                    }
                }
            }
        }

        (analysis, stats)
    }
}

fn missing_entry(ref_index: usize, token: &str) -> AlignmentEntry {
    AlignmentEntry {
        ref_index: Some(ref_index),
        ref_token: Some(token.to_owned()),
        trans_index: None,
        trans_token: None,
        status: EntryStatus::Missing,
        plural_singular_mismatch: false,
    }
}

fn extra_entry(trans_index: usize, token: &str) -> AlignmentEntry {
    AlignmentEntry {
        ref_index: None,
        ref_token: None,
        trans_index: Some(trans_index),
        trans_token: Some(token.to_owned()),
        status: EntryStatus::Extra,
        plural_singular_mismatch: false,
    }
}

/// Analyze with the default [`Analyzer`] (built-in irregular plurals).
pub fn analyze(reference_text: &str, candidate_text: &str) -> AnalysisReport {
    Analyzer::new().analyze(reference_text, candidate_text)
}
