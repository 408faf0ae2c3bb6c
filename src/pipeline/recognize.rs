//! Recognition client: submit a document to the OCR read service and poll
//! the asynchronous operation until a terminal status.
//!
//! The service is asynchronous by design: a `POST` of the raw bytes returns
//! `202 Accepted` with an `Operation-Location` header naming the operation
//! URL, and the result is fetched by polling that URL until the reported
//! status is `Succeeded`.
//!
//! ## Poll budget
//!
//! Polling is a fixed-interval loop (sleep, then GET), with the sleep issued
//! *before* each request to match the service's documented cadence. Unlike
//! the service samples, the loop is bounded: after `max_polls` attempts it
//! returns [`SplitError::PollBudgetExhausted`], and a terminal `Failed`
//! status fails fast instead of being polled again. Statuses we do not
//! recognise are treated as still-running until the budget runs out.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::progress::ProgressCallback;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

/// Header carrying the subscription key on every request.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Path of the batch-read submission endpoint, relative to the service base.
const SUBMIT_PATH: &str = "/vision/v2.0/read/core/asyncBatchAnalyze";

// ── Wire types ───────────────────────────────────────────────────────────

/// Status of an asynchronous read operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Any status string this client does not know; treated as still running.
    #[serde(other)]
    Unknown,
}

impl ReadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::NotStarted => "NotStarted",
            ReadStatus::Running => "Running",
            ReadStatus::Succeeded => "Succeeded",
            ReadStatus::Failed => "Failed",
            ReadStatus::Unknown => "Unknown",
        }
    }
}

/// Body of a poll response.
#[derive(Debug, Deserialize)]
pub struct ReadOperation {
    pub status: ReadStatus,
    #[serde(rename = "recognitionResults", default)]
    pub recognition_results: Vec<PageRecognition>,
}

/// Recognition result for one physical page, 1-indexed.
///
/// Page numbers are unique within a result and correspond 1:1 with the
/// physical pages of the submitted document, in the same order.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecognition {
    pub page: u32,
    #[serde(rename = "clockwiseOrientation", default)]
    pub clockwise_orientation: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Recognized lines, top to bottom. Empty for a blank page.
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// One recognized line of text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextLine {
    /// Plain recognized text, case and whitespace as recognized.
    pub text: String,
    #[serde(rename = "boundingBox", default)]
    pub bounding_box: Vec<f32>,
    #[serde(default)]
    pub words: Vec<RecognizedWord>,
}

/// One recognized word within a line.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    #[serde(rename = "boundingBox", default)]
    pub bounding_box: Vec<f32>,
    /// The service reports confidence as a string, e.g. "Low".
    #[serde(default)]
    pub confidence: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────

/// The operation URL returned by a successful submission, used to poll for
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn as_url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The successful outcome of submit-and-poll.
#[derive(Debug)]
pub struct RecognitionOutcome {
    /// Per-page results, in the order the service reported them.
    pub pages: Vec<PageRecognition>,

    /// GET requests issued before `Succeeded` was observed.
    pub poll_attempts: u32,
}

/// Client for the asynchronous read service.
///
/// Holds its credentials explicitly; nothing here is process-global, so two
/// clients in one process can point at two different services.
#[derive(Debug)]
pub struct RecognitionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl RecognitionClient {
    /// Build a client from the invocation config.
    ///
    /// Endpoint and key come from the config when set, else from the
    /// `SCANSPLIT_OCR_ENDPOINT` / `SCANSPLIT_OCR_KEY` environment variables.
    pub fn from_config(config: &SplitConfig) -> Result<Self, SplitError> {
        let endpoint = resolve_setting(config.endpoint.as_deref(), "SCANSPLIT_OCR_ENDPOINT")
            .ok_or_else(|| SplitError::RecognitionNotConfigured {
                hint: "Set --endpoint or the SCANSPLIT_OCR_ENDPOINT environment variable.".into(),
            })?;
        let api_key = resolve_setting(config.api_key.as_deref(), "SCANSPLIT_OCR_KEY").ok_or_else(
            || SplitError::RecognitionNotConfigured {
                hint: "Set --api-key or the SCANSPLIT_OCR_KEY environment variable.".into(),
            },
        )?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| SplitError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        })
    }

    /// Submit raw document bytes for recognition.
    ///
    /// Returns the operation handle extracted from the `Operation-Location`
    /// response header.
    pub async fn submit(&self, bytes: &[u8]) -> Result<OperationHandle, SplitError> {
        let url = format!("{}{}", self.endpoint, SUBMIT_PATH);
        debug!("Submitting {} bytes to {}", bytes.len(), url);

        let response = self
            .http
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| SplitError::SubmissionFailed {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SplitError::SubmissionFailed {
                detail: format!("HTTP {status}: {}", snippet(&body)),
            });
        }

        let handle = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(|s| OperationHandle(s.to_string()))
            .ok_or(SplitError::MissingOperationLocation)?;

        debug!("Operation handle: {}", handle);
        Ok(handle)
    }

    /// Poll the operation until it succeeds, fails, or the budget runs out.
    ///
    /// Sleeps one interval before every poll, so a result that is ready
    /// immediately still costs one interval. A `Failed` status returns
    /// [`SplitError::RecognitionFailed`] on the spot.
    pub async fn await_result(
        &self,
        handle: &OperationHandle,
        progress: Option<&ProgressCallback>,
    ) -> Result<RecognitionOutcome, SplitError> {
        for attempt in 1..=self.max_polls {
            sleep(self.poll_interval).await;

            let operation = self.poll_once(handle).await?;
            if let Some(cb) = progress {
                cb.on_poll(attempt, operation.status.as_str());
            }

            match operation.status {
                ReadStatus::Succeeded => {
                    debug!(
                        "Recognition succeeded after {} poll(s), {} page(s)",
                        attempt,
                        operation.recognition_results.len()
                    );
                    return Ok(RecognitionOutcome {
                        pages: operation.recognition_results,
                        poll_attempts: attempt,
                    });
                }
                ReadStatus::Failed => {
                    return Err(SplitError::RecognitionFailed {
                        status: "Failed".into(),
                    });
                }
                status => {
                    trace!("Poll {}: status {}", attempt, status.as_str());
                    if matches!(status, ReadStatus::Unknown) {
                        warn!("Poll {}: unrecognised operation status", attempt);
                    }
                }
            }
        }

        Err(SplitError::PollBudgetExhausted {
            attempts: self.max_polls,
            waited_secs: (self.max_polls as u128 * self.poll_interval.as_millis() / 1000) as u64,
        })
    }

    /// Issue one GET against the operation URL and parse the body.
    async fn poll_once(&self, handle: &OperationHandle) -> Result<ReadOperation, SplitError> {
        let response = self
            .http
            .get(handle.as_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| SplitError::PollFailed {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SplitError::PollFailed {
                detail: format!("HTTP {status}"),
            });
        }

        let body = response.text().await.map_err(|e| SplitError::PollFailed {
            detail: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| SplitError::MalformedPollResponse {
            detail: format!("{e} in body: {}", snippet(&body)),
        })
    }
}

/// Prefer the explicit config value; fall back to a non-empty env var.
fn resolve_setting(configured: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(value) = configured {
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    std::env::var(env_var).ok().filter(|v| !v.is_empty())
}

/// First 200 bytes of a body, for error messages.
fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .take_while(|(i, _)| *i < 200)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &body[..end]
}
