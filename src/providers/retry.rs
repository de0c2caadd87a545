//! Retry configuration and provider decorators.
//!
//! Provides [`RetryConfig`] for controlling retry behaviour and
//! `Retrying*Provider` decorators that wrap the provider traits with
//! automatic retry on transient errors.
//!
//! Both decorators delegate to the shared `with_retry()` helper,
//! keeping retry logic in a single place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::telemetry;
use crate::{ElocuteError, Result};

use super::traits::{
    JudgeProvider, JudgeRequest, TranscribeOptions, Transcript, TranscriptionProvider,
};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff:
///
/// ```rust
/// # use elocute::providers::retry::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the cap on exponential delay growth.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay for a given attempt number (0-indexed): `initial * 2^n`,
    /// capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Effective delay, respecting a provider `retry_after` hint over
    /// the calculated backoff.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation with retry on transient errors.
///
/// Retries errors classified by [`ElocuteError::is_transient()`] up to
/// `config.max_attempts`, using exponential backoff and respecting
/// `retry_after` hints from rate-limit errors. Permanent errors are
/// returned immediately.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    provider_name: &str,
    operation: &'static str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "provider" => provider_name.to_owned(),
                    "operation" => operation,
                )
                .increment(1);
                if attempt + 1 < config.max_attempts {
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        provider = provider_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or(ElocuteError::Configuration(
        "retry loop ran zero attempts".into(),
    )))
}

/// Decorator that wraps a [`TranscriptionProvider`] with retry logic.
pub struct RetryingTranscriptionProvider {
    inner: Arc<dyn TranscriptionProvider>,
    config: RetryConfig,
}

impl RetryingTranscriptionProvider {
    pub fn new(inner: Arc<dyn TranscriptionProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl TranscriptionProvider for RetryingTranscriptionProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        options: &TranscribeOptions,
    ) -> Result<Transcript> {
        with_retry(&self.config, self.inner.name(), "transcribe", || {
            self.inner.transcribe(audio, filename, options)
        })
        .await
    }
}

/// Decorator that wraps a [`JudgeProvider`] with retry logic.
pub struct RetryingJudgeProvider {
    inner: Arc<dyn JudgeProvider>,
    config: RetryConfig,
}

impl RetryingJudgeProvider {
    pub fn new(inner: Arc<dyn JudgeProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl JudgeProvider for RetryingJudgeProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn judge(&self, request: &JudgeRequest) -> Result<String> {
        with_retry(&self.config, self.inner.name(), "judge", || {
            self.inner.judge(request)
        })
        .await
    }
}
