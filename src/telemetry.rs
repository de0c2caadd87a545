//! Telemetry metric name constants.
//!
//! Centralised metric names for elocute operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `elocute_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai")
//! - `operation` — capability invoked (e.g. "transcribe", "judge")
//! - `task` — evaluation task (e.g. "compare_audio", "retell")
//! - `status` — outcome: "ok" or "error"

/// Total provider requests dispatched.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "elocute_requests_total";

/// Provider request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "elocute_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`, `operation`.
pub const RETRIES_TOTAL: &str = "elocute_retries_total";

/// Total evaluations run through the [`Evaluator`](crate::Evaluator).
///
/// Labels: `task`, `status` ("ok" | "error").
pub const EVALUATIONS_TOTAL: &str = "elocute_evaluations_total";
