//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SplitConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline submits, polls, and persists.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a Tokio channel, a WebSocket, a database record, or a
//! terminal progress bar without the library knowing anything about how the
//! host application communicates. The trait is `Send + Sync` so a single
//! callback can serve concurrent invocations.

use std::sync::Arc;

/// Called by the pipeline as it advances through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline itself is sequential within one
/// invocation, but one callback instance may be shared across concurrent
/// invocations, so implementations must still synchronise shared state.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once when the document is submitted for recognition.
    ///
    /// # Arguments
    /// * `bytes_len` — size of the submitted PDF in bytes
    fn on_submit(&self, bytes_len: usize) {
        let _ = bytes_len;
    }

    /// Called after each poll of the recognition operation.
    ///
    /// # Arguments
    /// * `attempt` — 1-indexed poll attempt number
    /// * `status`  — status string reported by the service
    fn on_poll(&self, attempt: u32, status: &str) {
        let _ = (attempt, status);
    }

    /// Called once the recognition result is available.
    ///
    /// # Arguments
    /// * `recognized_pages` — number of pages in the recognition result
    /// * `poll_attempts`    — polls issued before success
    fn on_recognition_complete(&self, recognized_pages: usize, poll_attempts: u32) {
        let _ = (recognized_pages, poll_attempts);
    }

    /// Called after each output document is persisted.
    ///
    /// # Arguments
    /// * `seq`        — 0-indexed emission sequence number
    /// * `page_count` — pages copied into this document (may be 0)
    /// * `reference`  — reference returned by the sink
    fn on_document_persisted(&self, seq: usize, page_count: usize, reference: &str) {
        let _ = (seq, page_count, reference);
    }

    /// Called once after every document has been persisted.
    ///
    /// # Arguments
    /// * `documents` — total documents emitted
    fn on_split_complete(&self, documents: usize) {
        let _ = documents;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SplitConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;
