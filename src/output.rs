//! Result types returned by the splitting pipeline.
//!
//! [`SplitOutput`] is the full invocation result. Its `files` field is the
//! caller-facing payload: an ordered list of output references, in document
//! finalisation order (which equals physical page order). `documents` and
//! `stats` carry the richer per-document and timing detail the CLI renders
//! and `--json` serialises.

use serde::Serialize;

/// The complete result of one split invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SplitOutput {
    /// Ordered output references, one per emitted document.
    ///
    /// This mirrors the `{files: [...]}` payload of the reference service.
    pub files: Vec<String>,

    /// Per-document detail, same order as `files`.
    pub documents: Vec<DocumentResult>,

    /// Classification and timing statistics.
    pub stats: SplitStats,
}

/// One persisted output document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    /// 0-indexed emission sequence number.
    pub seq: usize,

    /// 1-indexed physical page numbers copied into this document, in order.
    /// Empty for an empty emission (e.g. two adjacent separator pages).
    pub pages: Vec<u32>,

    /// Serialized size of the document in bytes.
    pub bytes_len: usize,

    /// Retrievable reference returned by the output sink.
    pub reference: String,
}

/// Statistics for one split invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitStats {
    /// Physical page count of the source PDF.
    pub page_count: u32,

    /// Number of pages classified as separators.
    pub separator_pages: usize,

    /// Number of pages classified as blank.
    pub blank_pages: usize,

    /// Number of documents emitted (including empty ones).
    pub documents_emitted: usize,

    /// Total pages copied across all output documents.
    pub pages_copied: usize,

    /// GET requests issued before the recognition result was ready.
    pub poll_attempts: u32,

    /// Wall-clock time spent in submit + poll.
    pub recognize_duration_ms: u64,

    /// Wall-clock time spent copying pages and serialising documents.
    pub segment_duration_ms: u64,

    /// Total invocation time.
    pub total_duration_ms: u64,
}

/// Basic facts about a PDF, available without contacting the recognition
/// service. Returned by [`crate::split::inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// Physical page count.
    pub page_count: u32,

    /// PDF version string from the header, e.g. "1.5".
    pub pdf_version: String,
}
