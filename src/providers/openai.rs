//! OpenAI-compatible HTTP provider for transcription and judging.
//!
//! Talks to `/v1/audio/transcriptions` (multipart upload) and
//! `/v1/chat/completions` (JSON) on any endpoint that speaks the OpenAI
//! wire format. The base URL is overridable for tests.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::telemetry;
use crate::{ElocuteError, Result};

use super::traits::{
    JudgeProvider, JudgeRequest, TranscribeOptions, Transcript, TranscriptionProvider,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Provider backed by an OpenAI-compatible HTTP API.
///
/// Implements both [`TranscriptionProvider`] and [`JudgeProvider`] so a
/// single API key and connection pool serve both calls of an
/// evaluation.
pub struct OpenAiProvider {
    api_key: String,
    name: String,
    base_url: String,
    timeout_secs: u64,
    http_client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http_client(api_key, reqwest::Client::new())
    }

    /// Prefer this over [`new`](Self::new) when other components should
    /// share the connection pool.
    pub fn with_http_client(api_key: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.into(),
            name: "openai".to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 120,
            http_client,
        }
    }

    /// Override the API base URL (testing, self-hosted gateways).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn record_request(&self, operation: &'static str, status: &'static str, started: Instant) {
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => self.name.clone(),
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => self.name.clone(),
            "operation" => operation,
        )
        .record(started.elapsed().as_secs_f64());
    }
}

/// Map a non-success response to the matching error variant.
async fn error_for_status(response: reqwest::Response) -> ElocuteError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(std::time::Duration::from_secs);
    let message = response.text().await.unwrap_or_default();
    match status.as_u16() {
        401 | 403 => ElocuteError::AuthenticationFailed,
        404 => ElocuteError::ModelNotFound(message),
        429 => ElocuteError::RateLimited { retry_after },
        s => ElocuteError::Api { status: s, message },
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, audio), fields(provider = %self.name, bytes = audio.len()))]
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        options: &TranscribeOptions,
    ) -> Result<Transcript> {
        if audio.is_empty() {
            return Err(ElocuteError::InvalidInput("empty audio payload".into()));
        }
        let started = Instant::now();

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_owned())
            .mime_str("application/octet-stream")
            .map_err(|e| ElocuteError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", options.model.clone());

        let response = self
            .http_client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ElocuteError::Http(e.to_string()))?;

        if !response.status().is_success() {
            self.record_request("transcribe", "error", started);
            return Err(error_for_status(response).await);
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ElocuteError::Http(e.to_string()))?;
        self.record_request("transcribe", "ok", started);
        debug!(chars = body.text.len(), "transcription complete");
        Ok(Transcript {
            text: body.text.trim().to_owned(),
        })
    }
}

#[async_trait]
impl JudgeProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, request), fields(provider = %self.name, model = %request.model))]
    async fn judge(&self, request: &JudgeRequest) -> Result<String> {
        let started = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_mode
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| ElocuteError::Http(e.to_string()))?;

        if !response.status().is_success() {
            self.record_request("judge", "error", started);
            return Err(error_for_status(response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ElocuteError::Http(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ElocuteError::EmptyResponse)?;
        self.record_request("judge", "ok", started);
        Ok(content)
    }
}
