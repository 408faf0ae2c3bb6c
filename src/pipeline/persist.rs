//! Output persistence: the [`OutputSink`] seam and its built-in
//! implementations.
//!
//! The segmenter only needs two things from storage: "store these bytes
//! under this name" and "give me back a reference a caller can retrieve the
//! content with". Everything else (which cloud, which container, access
//! tokens) stays behind the trait. Implementations backed by
//! access-controlled storage should return a reference carrying a
//! time-bounded read-only grant rather than a permanently public URL.
//!
//! A persistence failure is fatal for the whole invocation; sinks should
//! not retry internally.

use crate::error::SplitError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Destination for finished output documents.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Persist `bytes` under `name` and return a retrievable reference.
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, SplitError>;
}

/// Generate a unique output name: `split-{timestamp}-{random}.pdf`.
///
/// Uniqueness is the only hard requirement; the scheme is not a
/// compatibility surface. The random suffix keeps names collision-free when
/// concurrent invocations persist within the same second.
pub fn generate_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("split-{timestamp}-{}.pdf", &suffix[..8])
}

// ── Local directory sink ─────────────────────────────────────────────────

/// Sink that writes each document into a directory and returns its path.
///
/// The directory is created on first store if it does not exist.
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl OutputSink for LocalDirSink {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, SplitError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SplitError::PersistenceFailed {
                name: name.to_string(),
                detail: format!("create {}: {e}", self.dir.display()),
            })?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| SplitError::PersistenceFailed {
                name: name.to_string(),
                detail: e.to_string(),
            })?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}

// ── In-memory sink ───────────────────────────────────────────────────────

/// One document held by a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps documents in memory and returns `mem://{name}`
/// references. Intended for tests and embedding.
#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Vec<StoredDocument>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far, in store order.
    ///
    /// A poisoned lock is recovered; the snapshot then reflects whatever
    /// was stored before the poisoning panic.
    pub fn documents(&self) -> Vec<StoredDocument> {
        match self.stored.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn store(&self, name: &str, bytes: &[u8]) -> Result<String, SplitError> {
        self.stored
            .lock()
            .map_err(|_| SplitError::Internal("sink lock poisoned".into()))?
            .push(StoredDocument {
                name: name.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(format!("mem://{name}"))
    }
}
