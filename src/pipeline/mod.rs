//! Pipeline stages for separator-driven PDF splitting.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different output sink) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ recognize ──▶ classify ──▶ segment ──▶ persist
//! (URL/path)  (OCR poll)   (sep/blank)  (lopdf)     (sink)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to PDF bytes
//! 2. [`recognize`] — submit the bytes to the read service and poll the
//!    returned operation until it succeeds; the only stage with network I/O
//! 3. [`classify`]  — pure functions computing the separator-page and
//!    blank-page sets from the recognition result
//! 4. [`segment`]   — partition the page sequence at separators and copy
//!    pages into new documents; runs in `spawn_blocking` because parsing
//!    and re-serialising PDFs is CPU-bound
//! 5. [`persist`]   — hand each finished document to the output sink and
//!    collect its reference

pub mod classify;
pub mod input;
pub mod persist;
pub mod recognize;
pub mod segment;
