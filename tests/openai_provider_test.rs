//! Wiremock integration tests for the OpenAI-compatible provider:
//! request shapes, response parsing, and status-code error mapping.

use std::time::Duration;

use elocute::providers::{JudgeProvider, JudgeRequest, TranscribeOptions, TranscriptionProvider};
use elocute::{ElocuteError, OpenAiProvider};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn provider(mock_url: &str) -> OpenAiProvider {
    OpenAiProvider::new("test-key").base_url(mock_url.to_owned())
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn judge_returns_model_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(r#"{"scores":{}}"#)))
        .mount(&server)
        .await;

    let text = provider(&server.uri())
        .judge(&JudgeRequest::new("gpt-4o-mini", "score this"))
        .await
        .expect("judge should succeed");
    assert_eq!(text, r#"{"scores":{}}"#);
}

#[tokio::test]
async fn judge_sends_json_mode_and_system_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("json_object"))
        .and(body_string_contains("You are an examiner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let request = JudgeRequest::new("gpt-4o-mini", "score this")
        .system("You are an examiner")
        .temperature(0.0)
        .max_tokens(400)
        .json_mode(true);
    provider(&server.uri())
        .judge(&request)
        .await
        .expect("judge should succeed");
}

#[tokio::test]
async fn judge_maps_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .judge(&JudgeRequest::new("gpt-4o-mini", "score this"))
        .await
        .expect_err("401 should fail");
    assert!(matches!(err, ElocuteError::AuthenticationFailed));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn judge_maps_rate_limit_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_string("slow down"),
        )
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .judge(&JudgeRequest::new("gpt-4o-mini", "score this"))
        .await
        .expect_err("429 should fail");
    assert!(err.is_transient());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn judge_maps_server_error_as_transient_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .judge(&JudgeRequest::new("gpt-4o-mini", "score this"))
        .await
        .expect_err("503 should fail");
    match err {
        ElocuteError::Api { status, ref message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn judge_rejects_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("  ")))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .judge(&JudgeRequest::new("gpt-4o-mini", "score this"))
        .await
        .expect_err("blank content should fail");
    assert!(matches!(err, ElocuteError::EmptyResponse));
}

#[tokio::test]
async fn transcribe_posts_multipart_and_parses_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"text": "  the quick brown fox  "})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transcript = provider(&server.uri())
        .transcribe(b"fake-webm-bytes", "answer.webm", &TranscribeOptions::default())
        .await
        .expect("transcription should succeed");
    // surrounding whitespace is trimmed like the service's text field
    assert_eq!(transcript.text, "the quick brown fox");

    let requests = server.received_requests().await.expect("recorded requests");
    let request: &Request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("whisper-1"));
    assert!(body.contains("answer.webm"));
}

#[tokio::test]
async fn transcribe_rejects_empty_audio_locally() {
    let server = MockServer::start().await;
    // no mock mounted: the call must fail before any HTTP traffic
    let err = provider(&server.uri())
        .transcribe(b"", "answer.webm", &TranscribeOptions::default())
        .await
        .expect_err("empty audio should fail");
    assert!(matches!(err, ElocuteError::InvalidInput(_)));
    assert!(server.received_requests().await.expect("recorded").is_empty());
}

#[tokio::test]
async fn transcribe_maps_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unsupported format"))
        .mount(&server)
        .await;

    let err = provider(&server.uri())
        .transcribe(b"bytes", "answer.webm", &TranscribeOptions::default())
        .await
        .expect_err("400 should fail");
    match err {
        ElocuteError::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("expected Api error, got {other:?}"),
    }
}
