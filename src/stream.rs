//! Streaming API: yield each output document as it is persisted.
//!
//! Recognition and segmentation must finish before the first document can
//! exist, because which document a page belongs to depends on every
//! separator before it. What *can* stream is persistence: the assembled
//! documents are handed to the sink one by one, and each reference is
//! yielded as soon as the sink returns it. Callers get early references for
//! large batches instead of waiting for the last store to finish.
//!
//! Documents are always yielded in emission order. A persistence failure is
//! yielded as the stream's final `Err` item; per the pipeline's
//! no-partial-success contract, callers must treat the invocation as failed
//! even if earlier items were yielded.

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::output::DocumentResult;
use crate::pipeline::persist::generate_name;
use crate::pipeline::recognize::RecognitionClient;
use crate::pipeline::{classify, input, segment};
use crate::split::resolve_sink;
use futures::future;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of persisted documents.
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<DocumentResult, SplitError>> + Send>>;

/// Split a PDF file or URL, streaming each document as it is persisted.
///
/// Fatal errors before the first persistence (bad input, recognition
/// failure, corrupt PDF) are returned as `Err` from this function; errors
/// during persistence arrive as stream items.
pub async fn split_stream(
    input_str: impl AsRef<str>,
    config: &SplitConfig,
) -> Result<DocumentStream, SplitError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming split: {}", input_str);

    let bytes = input::resolve_input(input_str, config.download_timeout_secs).await?;
    split_stream_from_bytes(bytes, config).await
}

/// Streaming equivalent of [`crate::split::split_from_bytes`].
pub async fn split_stream_from_bytes(
    bytes: Vec<u8>,
    config: &SplitConfig,
) -> Result<DocumentStream, SplitError> {
    input::validate_magic(&bytes)?;

    let client = RecognitionClient::from_config(config)?;
    let sink = resolve_sink(config);

    let info = segment::inspect_bytes(bytes.clone()).await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_submit(bytes.len());
    }
    let handle = client.submit(&bytes).await?;
    let outcome = client
        .await_result(&handle, config.progress_callback.as_ref())
        .await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_recognition_complete(outcome.pages.len(), outcome.poll_attempts);
    }

    let classification = classify::classify_pages(&outcome.pages, &config.separator_tokens);
    let plan = segment::plan_segments(info.page_count, &classification, config.trailing);
    let documents = segment::split_document(bytes, plan.clone()).await?;

    let progress = config.progress_callback.clone();
    let s = stream::iter(documents.into_iter().zip(plan).enumerate())
        .then(move |(seq, (doc_bytes, pages))| {
            let sink = sink.clone();
            let progress = progress.clone();
            async move {
                let name = generate_name();
                let reference = sink.store(&name, &doc_bytes).await?;
                if let Some(cb) = progress {
                    cb.on_document_persisted(seq, pages.len(), &reference);
                }
                Ok(DocumentResult {
                    seq,
                    pages,
                    bytes_len: doc_bytes.len(),
                    reference,
                })
            }
        })
        // An Err must be the final item: stop polling the inner stream
        // afterwards so no further document is persisted.
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        });

    Ok(Box::pin(s))
}
