//! Request-scoped evaluation orchestration.
//!
//! An [`Evaluator`] wires the pure scoring core to the transcription
//! and judging providers and runs one evaluation task per call:
//! transcribe (if the response is audio), align against the reference,
//! derive computed scores, ask the judge, and blend. Nothing is
//! persisted; every call operates solely on its inputs.

pub mod similarity;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::align::{AlignmentEntry, AlignmentStats, Analyzer};
use crate::judge::{Verdict, prompt};
use crate::providers::{
    JudgeProvider, JudgeRequest, OpenAiProvider, RetryConfig, RetryingJudgeProvider,
    RetryingTranscriptionProvider, TranscribeOptions, TranscriptionProvider,
};
use crate::score::{combine_scores, content_score_from_stats, fluency_score_from_text};
use crate::telemetry;
use crate::{ElocuteError, Result, judge::Feedback};

const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Category scores keyed by name (e.g. `"Content"`); `None` when that
/// category could not be scored.
pub type Scores = BTreeMap<String, Option<u8>>;

/// Computed, judge-supplied, and blended scores per category.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub computed: Scores,
    pub llm: Scores,
    #[serde(rename = "final")]
    pub blended: Scores,
}

/// Result of [`Evaluator::compare_audio`].
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub reference_text: String,
    pub transcribed_text: String,
    pub token_analysis: Vec<AlignmentEntry>,
    pub stats: AlignmentStats,
    pub scores: ScoreBreakdown,
    pub feedback: Feedback,
    pub improvements: Vec<String>,
}

/// Result of [`Evaluator::evaluate_retell`].
#[derive(Debug, Clone, Serialize)]
pub struct RetellReport {
    pub reference_text: String,
    pub transcribed_text: String,
    pub scores: Scores,
    pub feedback: Feedback,
    pub improvements: Vec<String>,
    pub overall_summary: Option<String>,
}

/// Result of [`Evaluator::evaluate_short_answer`].
#[derive(Debug, Clone, Serialize)]
pub struct ShortAnswerReport {
    pub question: String,
    pub transcribed_answer: String,
    pub scores: Scores,
    pub is_answer_correct: bool,
    pub feedback: Feedback,
    pub improvements: Vec<String>,
    pub overall_summary: Option<String>,
}

/// Result of [`Evaluator::evaluate_summary`] when the gate passes.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub similarity_score: f64,
    pub scores: Scores,
    pub feedback: Feedback,
    pub improvements: Vec<String>,
    pub overall_summary: Option<String>,
}

/// Result of [`Evaluator::evaluate_essay`] when the gate passes.
///
/// `final_score` is the weighted blend of the four category scores;
/// `None` if the judge omitted any of them.
#[derive(Debug, Clone, Serialize)]
pub struct EssayReport {
    pub similarity_score: f64,
    pub final_score: Option<u8>,
    pub scores: Scores,
    pub feedback: Feedback,
    pub improvements: Vec<String>,
    pub overall_summary: Option<String>,
}

/// Outcome of a gated written task: rejected as a near-copy of the
/// source material, or scored.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Gated<T> {
    /// Submission reproduced the source text; no judging was performed.
    TooSimilar { similarity_score: f64 },
    Scored(T),
}

/// Builder for [`Evaluator`] instances.
pub struct EvaluatorBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    judge_model: String,
    transcription_model: String,
    timeout_secs: Option<u64>,
    retry: RetryConfig,
    analyzer: Option<Analyzer>,
    transcriber: Option<Arc<dyn TranscriptionProvider>>,
    judge: Option<Arc<dyn JudgeProvider>>,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            judge_model: DEFAULT_JUDGE_MODEL.to_owned(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_owned(),
            timeout_secs: None,
            retry: RetryConfig::default(),
            analyzer: None,
            transcriber: None,
            judge: None,
        }
    }

    /// API key for the OpenAI-compatible backend.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL (testing, self-hosted gateways).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Judging model identifier. Default: `gpt-4o-mini`.
    pub fn judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_model = model.into();
        self
    }

    /// Transcription model identifier. Default: `whisper-1`.
    pub fn transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Per-request timeout for provider calls.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Retry behaviour for provider calls. Default: 3 attempts with
    /// exponential backoff; `RetryConfig::disabled()` turns it off.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Replace the default [`Analyzer`] (e.g. to inject a custom lemma
    /// lookup or drop the irregular-plural table).
    pub fn analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Supply a custom transcription provider instead of the built-in
    /// OpenAI client.
    pub fn transcription_provider(mut self, provider: Arc<dyn TranscriptionProvider>) -> Self {
        self.transcriber = Some(provider);
        self
    }

    /// Supply a custom judge provider instead of the built-in OpenAI
    /// client.
    pub fn judge_provider(mut self, provider: Arc<dyn JudgeProvider>) -> Self {
        self.judge = Some(provider);
        self
    }

    pub fn build(self) -> Result<Evaluator> {
        let (transcriber, judge) = match (self.transcriber, self.judge) {
            (Some(t), Some(j)) => (t, j),
            (transcriber, judge) => {
                let api_key = self.api_key.ok_or_else(|| {
                    ElocuteError::Configuration(
                        "an API key is required unless both providers are supplied".into(),
                    )
                })?;
                let mut provider =
                    OpenAiProvider::with_http_client(api_key, reqwest::Client::new());
                if let Some(url) = self.base_url {
                    provider = provider.base_url(url);
                }
                if let Some(secs) = self.timeout_secs {
                    provider = provider.timeout_secs(secs);
                }
                let provider = Arc::new(provider);
                let default_transcriber: Arc<dyn TranscriptionProvider> = provider.clone();
                let default_judge: Arc<dyn JudgeProvider> = provider;
                (
                    transcriber.unwrap_or(default_transcriber),
                    judge.unwrap_or(default_judge),
                )
            }
        };

        let transcriber = Arc::new(RetryingTranscriptionProvider::new(
            transcriber,
            self.retry.clone(),
        ));
        let judge = Arc::new(RetryingJudgeProvider::new(judge, self.retry));

        Ok(Evaluator {
            transcriber,
            judge,
            analyzer: self.analyzer.unwrap_or_default(),
            judge_model: self.judge_model,
            transcription_model: self.transcription_model,
        })
    }
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs evaluation tasks against the configured providers.
///
/// Stateless across calls; safe to share behind an `Arc` and invoke
/// concurrently from independent requests.
pub struct Evaluator {
    transcriber: Arc<RetryingTranscriptionProvider>,
    judge: Arc<RetryingJudgeProvider>,
    analyzer: Analyzer,
    judge_model: String,
    transcription_model: String,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("judge_model", &self.judge_model)
            .field("transcription_model", &self.transcription_model)
            .finish_non_exhaustive()
    }
}

impl Evaluator {
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let options = TranscribeOptions::default().model(self.transcription_model.clone());
        let transcript = self
            .transcriber
            .transcribe(audio, "answer.webm", &options)
            .await?;
        Ok(transcript.text)
    }

    async fn run_judge(&self, request: JudgeRequest, categories: &[&str]) -> Result<Verdict> {
        let raw = self.judge.judge(&request).await?;
        Ok(Verdict::parse_lenient(&raw, categories))
    }

    /// Compare a spoken response against reference text.
    ///
    /// Transcribes the audio, aligns the transcript against the
    /// reference, derives computed content and fluency scores, asks the
    /// judge for its own scores, and blends the two per category.
    #[instrument(skip_all, fields(audio_bytes = audio.len()))]
    pub async fn compare_audio(
        &self,
        audio: &[u8],
        reference_text: &str,
    ) -> Result<ComparisonReport> {
        let result = self.compare_audio_inner(audio, reference_text).await;
        record_evaluation("compare_audio", result.is_ok());
        result
    }

    async fn compare_audio_inner(
        &self,
        audio: &[u8],
        reference_text: &str,
    ) -> Result<ComparisonReport> {
        const CATEGORIES: &[&str] = &["Content", "Fluency", "Pronunciation"];

        let transcribed_text = self.transcribe(audio).await?;
        let report = self.analyzer.analyze(reference_text, &transcribed_text);
        debug!(
            matches = report.stats.matches,
            substitutions = report.stats.substitutions,
            missing = report.stats.missing,
            extra = report.stats.extra,
            "alignment complete"
        );

        let computed: Scores = BTreeMap::from([
            (
                "Content".to_owned(),
                Some(content_score_from_stats(&report.stats)),
            ),
            (
                "Fluency".to_owned(),
                Some(fluency_score_from_text(&transcribed_text)),
            ),
            // no local heuristic approximates pronunciation
            ("Pronunciation".to_owned(), None),
        ]);

        let request = JudgeRequest::new(
            &self.judge_model,
            prompt::compare(reference_text, &transcribed_text, &report.analysis),
        )
        .system(prompt::COMPARE_SYSTEM)
        .temperature(0.0)
        .max_tokens(400);
        let verdict = self.run_judge(request, CATEGORIES).await?;

        let blended: Scores = CATEGORIES
            .iter()
            .map(|&category| {
                let computed_score = computed.get(category).copied().flatten();
                (
                    category.to_owned(),
                    combine_scores(computed_score, verdict.score(category)),
                )
            })
            .collect();

        Ok(ComparisonReport {
            reference_text: reference_text.to_owned(),
            transcribed_text,
            token_analysis: report.analysis,
            stats: report.stats,
            scores: ScoreBreakdown {
                computed,
                llm: verdict.scores,
                blended,
            },
            feedback: verdict.feedback,
            improvements: verdict.improvements,
        })
    }

    /// Score a spoken retelling of a lecture or passage.
    #[instrument(skip_all, fields(audio_bytes = audio.len()))]
    pub async fn evaluate_retell(
        &self,
        audio: &[u8],
        reference_text: &str,
    ) -> Result<RetellReport> {
        let result = self.evaluate_retell_inner(audio, reference_text).await;
        record_evaluation("retell", result.is_ok());
        result
    }

    async fn evaluate_retell_inner(
        &self,
        audio: &[u8],
        reference_text: &str,
    ) -> Result<RetellReport> {
        const CATEGORIES: &[&str] = &["Content", "Fluency", "Pronunciation"];

        let transcribed_text = self.transcribe(audio).await?;
        let request = JudgeRequest::new(
            &self.judge_model,
            prompt::retell(reference_text, &transcribed_text),
        )
        .system(prompt::RETELL_SYSTEM)
        .json_mode(true);
        let verdict = self.run_judge(request, CATEGORIES).await?;

        Ok(RetellReport {
            reference_text: reference_text.to_owned(),
            transcribed_text,
            scores: verdict.scores,
            feedback: verdict.feedback,
            improvements: verdict.improvements,
            overall_summary: verdict.overall_summary,
        })
    }

    /// Judge whether a spoken response answers a question.
    #[instrument(skip_all, fields(audio_bytes = audio.len()))]
    pub async fn evaluate_short_answer(
        &self,
        audio: &[u8],
        question: &str,
    ) -> Result<ShortAnswerReport> {
        let result = self.evaluate_short_answer_inner(audio, question).await;
        record_evaluation("short_answer", result.is_ok());
        result
    }

    async fn evaluate_short_answer_inner(
        &self,
        audio: &[u8],
        question: &str,
    ) -> Result<ShortAnswerReport> {
        const CATEGORIES: &[&str] = &["Relevance", "Accuracy", "Completeness"];

        let transcribed_answer = self.transcribe(audio).await?;
        let request = JudgeRequest::new(
            &self.judge_model,
            prompt::short_answer(question, &transcribed_answer),
        )
        .system(prompt::SHORT_ANSWER_SYSTEM)
        .json_mode(true);
        let verdict = self.run_judge(request, CATEGORIES).await?;

        Ok(ShortAnswerReport {
            question: question.to_owned(),
            transcribed_answer,
            scores: verdict.scores,
            is_answer_correct: verdict.is_answer_correct.unwrap_or(false),
            feedback: verdict.feedback,
            improvements: verdict.improvements,
            overall_summary: verdict.overall_summary,
        })
    }

    /// Score a written summary against its source text.
    ///
    /// Rejects near-copies (char-level similarity above
    /// [`similarity::REJECT_THRESHOLD`]) without spending a judge call.
    #[instrument(skip_all)]
    pub async fn evaluate_summary(
        &self,
        original_text: &str,
        student_summary: &str,
    ) -> Result<Gated<SummaryReport>> {
        let result = self
            .evaluate_summary_inner(original_text, student_summary)
            .await;
        record_evaluation("summary", result.is_ok());
        result
    }

    async fn evaluate_summary_inner(
        &self,
        original_text: &str,
        student_summary: &str,
    ) -> Result<Gated<SummaryReport>> {
        const CATEGORIES: &[&str] = &["Content", "Fluency"];

        if original_text.trim().is_empty() || student_summary.trim().is_empty() {
            return Err(ElocuteError::InvalidInput(
                "both original_text and student_summary are required".into(),
            ));
        }

        let similarity_score = similarity::similarity_ratio(original_text, student_summary);
        if similarity_score > similarity::REJECT_THRESHOLD {
            debug!(similarity_score, "summary rejected as near-copy");
            return Ok(Gated::TooSimilar { similarity_score });
        }

        let request = JudgeRequest::new(
            &self.judge_model,
            prompt::summary(original_text, student_summary),
        )
        .system(prompt::SUMMARY_SYSTEM)
        .json_mode(true);
        let verdict = self.run_judge(request, CATEGORIES).await?;

        Ok(Gated::Scored(SummaryReport {
            similarity_score,
            scores: verdict.scores,
            feedback: verdict.feedback,
            improvements: verdict.improvements,
            overall_summary: verdict.overall_summary,
        }))
    }

    /// Score an essay written for a question prompt.
    ///
    /// Rejects essays that largely restate the question, then derives a
    /// weighted final score from the four category scores.
    #[instrument(skip_all)]
    pub async fn evaluate_essay(
        &self,
        question: &str,
        student_essay: &str,
    ) -> Result<Gated<EssayReport>> {
        let result = self.evaluate_essay_inner(question, student_essay).await;
        record_evaluation("essay", result.is_ok());
        result
    }

    async fn evaluate_essay_inner(
        &self,
        question: &str,
        student_essay: &str,
    ) -> Result<Gated<EssayReport>> {
        const CATEGORIES: &[&str] = &["Relevance", "Coherence", "Grammar", "Creativity"];

        if question.trim().is_empty() || student_essay.trim().is_empty() {
            return Err(ElocuteError::InvalidInput(
                "both question and student_essay are required".into(),
            ));
        }

        let similarity_score = similarity::similarity_ratio(question, student_essay);
        if similarity_score > similarity::REJECT_THRESHOLD {
            debug!(similarity_score, "essay rejected as prompt restatement");
            return Ok(Gated::TooSimilar { similarity_score });
        }

        let request = JudgeRequest::new(
            &self.judge_model,
            prompt::essay(question, student_essay),
        )
        .system(prompt::ESSAY_SYSTEM)
        .json_mode(true);
        let verdict = self.run_judge(request, CATEGORIES).await?;

        let final_score = essay_final_score(&verdict);

        Ok(Gated::Scored(EssayReport {
            similarity_score,
            final_score,
            scores: verdict.scores,
            feedback: verdict.feedback,
            improvements: verdict.improvements,
            overall_summary: verdict.overall_summary,
        }))
    }
}

/// Weighted essay blend: relevance 35%, coherence 25%, grammar 20%,
/// creativity 20%. `None` unless the judge scored all four.
fn essay_final_score(verdict: &Verdict) -> Option<u8> {
    let relevance = verdict.score("Relevance")?;
    let coherence = verdict.score("Coherence")?;
    let grammar = verdict.score("Grammar")?;
    let creativity = verdict.score("Creativity")?;
    let weighted = f64::from(relevance) * 0.35
        + f64::from(coherence) * 0.25
        + f64::from(grammar) * 0.2
        + f64::from(creativity) * 0.2;
    Some(weighted.round_ties_even().clamp(0.0, 100.0) as u8)
}

fn record_evaluation(task: &'static str, ok: bool) {
    metrics::counter!(telemetry::EVALUATIONS_TOTAL,
        "task" => task,
        "status" => if ok { "ok" } else { "error" },
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::essay_final_score;
    use crate::judge::Verdict;

    #[test]
    fn essay_blend_weights() {
        let v = Verdict::parse_lenient(
            r#"{"scores": {"Relevance": 80, "Coherence": 60, "Grammar": 90, "Creativity": 70}}"#,
            &[],
        );
        // 28 + 15 + 18 + 14 = 75
        assert_eq!(essay_final_score(&v), Some(75));
    }

    #[test]
    fn essay_blend_requires_all_categories() {
        let v = Verdict::parse_lenient(r#"{"scores": {"Relevance": 80}}"#, &[]);
        assert_eq!(essay_final_score(&v), None);
    }
}
