//! External service providers: speech-to-text and LLM judging.

mod openai;
pub mod retry;
pub mod traits;

pub use openai::OpenAiProvider;
pub use retry::{RetryConfig, RetryingJudgeProvider, RetryingTranscriptionProvider};
pub use traits::{JudgeProvider, JudgeRequest, TranscribeOptions, Transcript, TranscriptionProvider};
