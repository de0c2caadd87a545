//! Retry decorator behavior: transient errors retried, permanent errors
//! surfaced immediately, attempts bounded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use elocute::providers::retry::{RetryingJudgeProvider, RetryingTranscriptionProvider};
use elocute::providers::{
    JudgeProvider, JudgeRequest, TranscribeOptions, Transcript, TranscriptionProvider,
};
use elocute::{ElocuteError, Result, RetryConfig};

/// Mock provider that fails N times then succeeds.
struct FailThenSucceed {
    fail_count: AtomicU32,
    fail_with: fn() -> ElocuteError,
    total_calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(failures: u32, fail_with: fn() -> ElocuteError) -> Self {
        Self {
            fail_count: AtomicU32::new(failures),
            fail_with,
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }

    fn next(&self) -> Result<()> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_count.load(Ordering::Relaxed) > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err((self.fail_with)());
        }
        Ok(())
    }
}

#[async_trait]
impl JudgeProvider for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn judge(&self, _request: &JudgeRequest) -> Result<String> {
        self.next()?;
        Ok("ok".into())
    }
}

#[async_trait]
impl TranscriptionProvider for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
        _options: &TranscribeOptions,
    ) -> Result<Transcript> {
        self.next()?;
        Ok(Transcript { text: "ok".into() })
    }
}

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig::new()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn retries_on_transient_error_then_succeeds() {
    let inner = Arc::new(FailThenSucceed::new(2, || ElocuteError::RateLimited {
        retry_after: None,
    }));
    let provider = RetryingJudgeProvider::new(inner.clone(), fast_config(3));

    let result = provider.judge(&JudgeRequest::new("test", "prompt")).await;

    assert!(result.is_ok());
    assert_eq!(inner.call_count(), 3); // 2 failures + 1 success
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let inner = Arc::new(FailThenSucceed::new(10, || {
        ElocuteError::Http("timeout".into())
    }));
    let provider = RetryingJudgeProvider::new(inner.clone(), fast_config(3));

    let result = provider.judge(&JudgeRequest::new("test", "prompt")).await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 3);
}

#[tokio::test]
async fn does_not_retry_permanent_errors() {
    let inner = Arc::new(FailThenSucceed::new(5, || ElocuteError::AuthenticationFailed));
    let provider = RetryingJudgeProvider::new(inner.clone(), fast_config(3));

    let result = provider.judge(&JudgeRequest::new("test", "prompt")).await;

    assert!(matches!(result, Err(ElocuteError::AuthenticationFailed)));
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn transcription_decorator_retries_server_errors() {
    let inner = Arc::new(FailThenSucceed::new(1, || ElocuteError::Api {
        status: 503,
        message: "overloaded".into(),
    }));
    let provider = RetryingTranscriptionProvider::new(inner.clone(), fast_config(3));

    let result = provider
        .transcribe(b"bytes", "answer.webm", &TranscribeOptions::default())
        .await;

    assert!(result.is_ok());
    assert_eq!(inner.call_count(), 2);
}

#[tokio::test]
async fn transcription_decorator_does_not_retry_bad_input() {
    let inner = Arc::new(FailThenSucceed::new(5, || ElocuteError::Api {
        status: 400,
        message: "unsupported format".into(),
    }));
    let provider = RetryingTranscriptionProvider::new(inner.clone(), fast_config(3));

    let result = provider
        .transcribe(b"bytes", "answer.webm", &TranscribeOptions::default())
        .await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn disabled_config_makes_a_single_attempt() {
    let inner = Arc::new(FailThenSucceed::new(1, || ElocuteError::Http("io".into())));
    let provider = RetryingJudgeProvider::new(inner.clone(), RetryConfig::disabled());

    let result = provider.judge(&JudgeRequest::new("test", "prompt")).await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 1);
}
