//! Error types for the scansplit library.
//!
//! One invocation of the pipeline either succeeds completely or fails as a
//! whole: there is no partial-success path ("3 of 5 documents saved" is never
//! reported). Every variant of [`SplitError`] is therefore fatal for the
//! invocation that raised it, and the caller receives no output references.
//!
//! Variants group into the pipeline's failure surfaces:
//!
//! * **Input** — the supplied path/URL could not be turned into PDF bytes.
//! * **Recognition** — the read service rejected the submission, returned a
//!   terminal `Failed` status, produced an unparseable body, or never
//!   finished inside the poll budget.
//! * **Segmentation** — the source PDF could not be parsed or a segment
//!   could not be serialised.
//! * **Persistence** — the output sink refused the finished document bytes.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the scansplit library.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes were read successfully but are not a PDF.
    #[error("Input is not a valid PDF. First bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    // ── Recognition errors ────────────────────────────────────────────────
    /// No read-service endpoint or API key was supplied.
    #[error("Recognition service is not configured.\n{hint}")]
    RecognitionNotConfigured { hint: String },

    /// The submission request could not be sent, or the service rejected it.
    #[error("Failed to submit document for recognition: {detail}")]
    SubmissionFailed { detail: String },

    /// The submission response carried no `Operation-Location` header,
    /// so there is nothing to poll.
    #[error("Recognition service accepted the document but returned no Operation-Location header")]
    MissingOperationLocation,

    /// A poll request failed at the transport level or returned non-2xx.
    #[error("Failed to poll recognition operation: {detail}")]
    PollFailed { detail: String },

    /// A poll response body did not deserialize as a read operation.
    #[error("Malformed recognition response: {detail}")]
    MalformedPollResponse { detail: String },

    /// The service reported a terminal non-success status.
    #[error("Recognition failed with terminal status '{status}'")]
    RecognitionFailed { status: String },

    /// The operation never reached a terminal status inside the poll budget.
    #[error(
        "Recognition did not complete after {attempts} polls (~{waited_secs}s).\n\
         Increase --max-polls or check the service status."
    )]
    PollBudgetExhausted { attempts: u32, waited_secs: u64 },

    // ── Segmentation errors ───────────────────────────────────────────────
    /// The source PDF could not be parsed.
    #[error("Source PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// Copying pages into output document `segment` (0-indexed) failed.
    #[error("Failed to assemble output document {segment}: {detail}")]
    SegmentationFailed { segment: usize, detail: String },

    // ── Persistence errors ────────────────────────────────────────────────
    /// The output sink failed to store a finished document.
    #[error("Failed to persist output document '{name}': {detail}")]
    PersistenceFailed { name: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
