//! # scansplit
//!
//! Split scanned multi-document PDFs at separator pages, using an
//! asynchronous OCR read service to decide where the boundaries are.
//!
//! ## Why this crate?
//!
//! Bulk scanners produce one giant PDF per hopper load. Operators drop a
//! printed separator sheet (a stamp such as "Separator - Invoice") between
//! documents; this crate reads every page through an OCR service, finds
//! those sheets, and reassembles the batch into one PDF per document.
//! Separator pages are never copied into any output, and pages the service
//! recognised no text on are dropped as scanner artefacts.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Recognize submit bytes, poll the read operation until Succeeded
//!  ├─ 3. Classify  separator pages + blank pages (pure functions)
//!  ├─ 4. Segment   partition pages at separators, copy via lopdf
//!  └─ 5. Persist   store each document, collect ordered references
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scansplit::{split, SplitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoint/key fall back to SCANSPLIT_OCR_ENDPOINT / SCANSPLIT_OCR_KEY
//!     let config = SplitConfig::default();
//!     let output = split("batch.pdf", &config).await?;
//!     for file in &output.files {
//!         println!("{file}");
//!     }
//!     eprintln!(
//!         "{} documents from {} pages",
//!         output.stats.documents_emitted, output.stats.page_count
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scansplit` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! scansplit = { version = "0.3", default-features = false }
//! ```
//!
//! ## Guarantees
//!
//! * Output order equals physical page order; pages never reorder inside a
//!   document.
//! * At least one output document is emitted, even with no separators.
//! * Every error aborts the whole invocation; there is no partial-success
//!   result.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod split;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SplitConfig, SplitConfigBuilder, TrailingPolicy, DEFAULT_SEPARATOR_TOKENS};
pub use error::SplitError;
pub use output::{DocumentInfo, DocumentResult, SplitOutput, SplitStats};
pub use pipeline::classify::{classify_pages, find_blank_pages, find_separator_pages, PageClassification};
pub use pipeline::persist::{LocalDirSink, MemorySink, OutputSink, StoredDocument};
pub use pipeline::recognize::{
    OperationHandle, PageRecognition, ReadStatus, RecognitionClient, RecognitionOutcome, TextLine,
};
pub use pipeline::segment::plan_segments;
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
pub use split::{inspect, split, split_from_bytes, split_sync};
pub use stream::{split_stream, split_stream_from_bytes, DocumentStream};
