//! Provider traits for the external transcription and judging services.
//!
//! The scoring core is pure; everything that talks to the network sits
//! behind these seams so the evaluator can be exercised with mocks.

use async_trait::async_trait;

use crate::Result;

/// Options for a transcription request.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    /// Speech-to-text model identifier (e.g. `whisper-1`).
    pub model: String,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_owned(),
        }
    }
}

impl TranscribeOptions {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Plain-text transcript of an audio payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

/// One-shot judging request: a prompt in, raw model text out.
#[derive(Debug, Clone)]
pub struct JudgeRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider to force a JSON object response.
    pub json_mode: bool,
}

impl JudgeRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn json_mode(mut self, on: bool) -> Self {
        self.json_mode = on;
        self
    }
}

/// Speech-to-text service.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Human-readable name for logging/metrics (e.g. "openai").
    fn name(&self) -> &str;

    /// Transcribe an audio payload. `filename` hints the container
    /// format to the service (e.g. `answer.webm`).
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        options: &TranscribeOptions,
    ) -> Result<Transcript>;
}

/// Text-generation service used as the scoring judge.
#[async_trait]
pub trait JudgeProvider: Send + Sync {
    /// Human-readable name for logging/metrics.
    fn name(&self) -> &str;

    /// Run one judging prompt and return the raw model text. Parsing
    /// into a [`Verdict`](crate::judge::Verdict) is the caller's job —
    /// malformed output is a recoverable condition, not a provider
    /// error.
    async fn judge(&self, request: &JudgeRequest) -> Result<String>;
}
