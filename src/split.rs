//! Eager (full-invocation) splitting entry points.
//!
//! This is the simpler API: run the whole pipeline and return every output
//! reference at once. Use [`crate::stream::split_stream`] instead when you
//! want each persisted document as soon as it lands.
//!
//! One invocation is one strictly sequential flow:
//! submit, poll, classify, segment, persist. Pages must be walked in
//! physical order because which document a page belongs to depends on every
//! separator seen before it. The only suspension point is the poll wait,
//! which is a plain `tokio::time::sleep` and never blocks a worker thread.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::output::{DocumentInfo, DocumentResult, SplitOutput, SplitStats};
use crate::pipeline::persist::{generate_name, LocalDirSink, OutputSink};
use crate::pipeline::recognize::RecognitionClient;
use crate::pipeline::{classify, input, segment};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Split a PDF file or URL into per-document PDFs at separator pages.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config`    — Invocation configuration
///
/// # Errors
/// Any failure aborts the whole invocation; no references are returned for
/// documents that were persisted before the failure.
pub async fn split(
    input_str: impl AsRef<str>,
    config: &SplitConfig,
) -> Result<SplitOutput, SplitError> {
    let input_str = input_str.as_ref();
    info!("Starting split: {}", input_str);

    let bytes = input::resolve_input(input_str, config.download_timeout_secs).await?;
    split_from_bytes(bytes, config).await
}

/// Split in-memory PDF bytes.
///
/// This is the recommended API when the PDF arrives from a request body,
/// queue message, or database rather than a file on disk.
pub async fn split_from_bytes(
    bytes: Vec<u8>,
    config: &SplitConfig,
) -> Result<SplitOutput, SplitError> {
    let total_start = Instant::now();
    input::validate_magic(&bytes)?;

    // ── Step 1: Collaborators ────────────────────────────────────────────
    let client = RecognitionClient::from_config(config)?;
    let sink = resolve_sink(config);

    // ── Step 2: Page count ───────────────────────────────────────────────
    let info = segment::inspect_bytes(bytes.clone()).await?;
    let page_count = info.page_count;
    info!("PDF has {} pages", page_count);

    // ── Step 3: Submit and poll ──────────────────────────────────────────
    let recognize_start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_submit(bytes.len());
    }
    let handle = client.submit(&bytes).await?;
    let outcome = client
        .await_result(&handle, config.progress_callback.as_ref())
        .await?;
    let recognize_duration_ms = recognize_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_recognition_complete(outcome.pages.len(), outcome.poll_attempts);
    }

    if outcome.pages.len() as u32 != page_count {
        warn!(
            "Recognition reported {} page(s) but the PDF has {}",
            outcome.pages.len(),
            page_count
        );
    }

    // ── Step 4: Classify ─────────────────────────────────────────────────
    let classification = classify::classify_pages(&outcome.pages, &config.separator_tokens);
    debug!(
        "Classified {} separator page(s), {} blank page(s)",
        classification.separator_pages.len(),
        classification.blank_pages.len()
    );

    // ── Step 5: Plan and copy ────────────────────────────────────────────
    let segment_start = Instant::now();
    let plan = segment::plan_segments(page_count, &classification, config.trailing);
    let documents = segment::split_document(bytes, plan.clone()).await?;
    let segment_duration_ms = segment_start.elapsed().as_millis() as u64;

    // ── Step 6: Persist in emission order ────────────────────────────────
    let mut results: Vec<DocumentResult> = Vec::with_capacity(documents.len());
    for (seq, (doc_bytes, pages)) in documents.into_iter().zip(plan).enumerate() {
        let name = generate_name();
        let reference = sink.store(&name, &doc_bytes).await?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_persisted(seq, pages.len(), &reference);
        }
        results.push(DocumentResult {
            seq,
            pages,
            bytes_len: doc_bytes.len(),
            reference,
        });
    }

    // ── Step 7: Assemble result ──────────────────────────────────────────
    let stats = SplitStats {
        page_count,
        separator_pages: classification.separator_pages.len(),
        blank_pages: classification.blank_pages.len(),
        documents_emitted: results.len(),
        pages_copied: results.iter().map(|d| d.pages.len()).sum(),
        poll_attempts: outcome.poll_attempts,
        recognize_duration_ms,
        segment_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Split complete: {} document(s) from {} page(s) in {}ms",
        stats.documents_emitted, stats.page_count, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_split_complete(results.len());
    }

    Ok(SplitOutput {
        files: results.iter().map(|d| d.reference.clone()).collect(),
        documents: results,
        stats,
    })
}

/// Synchronous wrapper around [`split`].
///
/// Creates a temporary tokio runtime internally.
pub fn split_sync(
    input_str: impl AsRef<str>,
    config: &SplitConfig,
) -> Result<SplitOutput, SplitError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SplitError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(split(input_str, config))
}

/// Report page count and PDF version without contacting the recognition
/// service. Does not require an endpoint or API key.
///
/// `download_timeout_secs` applies only when the input is a URL.
pub async fn inspect(
    input_str: impl AsRef<str>,
    download_timeout_secs: u64,
) -> Result<DocumentInfo, SplitError> {
    let bytes = input::resolve_input(input_str.as_ref(), download_timeout_secs).await?;
    segment::inspect_bytes(bytes).await
}

/// Resolve the output sink, from most-specific to least-specific.
///
/// 1. **Pre-built sink** (`config.sink`) — the caller constructed and
///    configured the sink entirely; used as-is. Useful in tests or when the
///    caller persists to object storage.
/// 2. **Configured directory** (`config.output_dir`) — wrapped in a
///    [`LocalDirSink`].
/// 3. **`SCANSPLIT_OUTPUT_DIR`** — directory chosen at the execution
///    environment level (Makefile, shell script, CI).
/// 4. **`./split-output`** — so `scansplit scan.pdf` works with no other
///    configuration.
pub(crate) fn resolve_sink(config: &SplitConfig) -> Arc<dyn OutputSink> {
    if let Some(ref sink) = config.sink {
        return Arc::clone(sink);
    }
    if let Some(ref dir) = config.output_dir {
        return Arc::new(LocalDirSink::new(dir.clone()));
    }
    if let Ok(dir) = std::env::var("SCANSPLIT_OUTPUT_DIR") {
        if !dir.is_empty() {
            return Arc::new(LocalDirSink::new(PathBuf::from(dir)));
        }
    }
    Arc::new(LocalDirSink::new("split-output"))
}
