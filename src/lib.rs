//! Elocute - scoring engine for spoken-language assessment
//!
//! This crate compares a student's response (spoken audio or written
//! text) against reference material. The core is pure and synchronous:
//! a word [`tokenize`](tokenize::tokenize)r, a token [`align`]ment
//! engine that classifies every token as matched, substituted, missing,
//! or extra (with plural/singular detection on substitutions), and
//! heuristic [`score`] derivation. Around it, an [`Evaluator`]
//! orchestrates the external speech-to-text and LLM judging services
//! and blends their scores with the computed ones.
//!
//! # Analysis example
//!
//! ```rust
//! use elocute::{analyze, content_score_from_stats};
//!
//! let report = analyze("the quick brown fox", "the quick brown foxes");
//! assert_eq!(report.stats.matches, 3);
//! assert_eq!(report.stats.substitutions, 1);
//! assert_eq!(report.stats.plural_mismatches, 1);
//! assert_eq!(content_score_from_stats(&report.stats), 75);
//! ```
//!
//! # Evaluation example
//!
//! ```rust,no_run
//! use elocute::Evaluator;
//!
//! #[tokio::main]
//! async fn main() -> elocute::Result<()> {
//!     let evaluator = Evaluator::builder()
//!         .openai("sk-your-key")
//!         .build()?;
//!
//!     let audio = std::fs::read("answer.webm").expect("audio file");
//!     let report = evaluator
//!         .compare_audio(&audio, "the quick brown fox")
//!         .await?;
//!
//!     println!("{:?}", report.scores.blended);
//!     Ok(())
//! }
//! ```

pub mod align;
pub mod error;
pub mod evaluate;
pub mod judge;
pub mod morph;
pub mod providers;
pub mod score;
pub mod telemetry;
pub mod tokenize;

// Re-export main types at crate root
pub use error::{ElocuteError, Result};
pub use evaluate::{
    ComparisonReport, EssayReport, Evaluator, EvaluatorBuilder, Gated, RetellReport,
    ScoreBreakdown, Scores, ShortAnswerReport, SummaryReport,
};
pub use providers::{
    JudgeProvider, JudgeRequest, OpenAiProvider, RetryConfig, TranscribeOptions, Transcript,
    TranscriptionProvider,
};

// Re-export the scoring core
pub use align::{AlignmentEntry, AlignmentStats, AnalysisReport, Analyzer, EntryStatus, analyze};
pub use judge::{Feedback, Verdict};
pub use morph::{IrregularPlurals, LemmaLookup, is_plural_singular_mismatch};
pub use score::{
    FILLER_WORDS, combine_scores, content_score_from_stats, extract_score, fluency_score_from_text,
};
pub use tokenize::tokenize;
