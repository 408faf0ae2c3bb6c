//! Input resolution: normalise a user-supplied path or URL to PDF bytes.
//!
//! ## Why bytes rather than a temp file?
//!
//! Everything downstream consumes memory: the recognition service takes the
//! raw bytes as an `application/octet-stream` body, and lopdf parses from a
//! byte slice. Resolving straight to `Vec<u8>` avoids temp-file lifetime
//! bookkeeping entirely. We validate the PDF magic bytes (`%PDF`) before
//! returning so callers get a meaningful error rather than a parser failure
//! deep inside segmentation.

use crate::error::SplitError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to validated PDF bytes.
///
/// If the input is a URL, download it. If it is a local file, read it,
/// mapping missing-file and permission failures to their own variants.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Vec<u8>, SplitError> {
    if input.trim().is_empty() {
        return Err(SplitError::InvalidInput {
            input: input.to_string(),
        });
    }
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    validate_magic(&bytes)?;
    Ok(bytes)
}

/// Verify the `%PDF` header.
pub fn validate_magic(bytes: &[u8]) -> Result<(), SplitError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(SplitError::NotAPdf { magic });
    }
    Ok(())
}

/// Read a local file, distinguishing not-found from permission errors.
async fn read_local(path_str: &str) -> Result<Vec<u8>, SplitError> {
    let path = PathBuf::from(path_str);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(SplitError::PermissionDenied { path })
        }
        Err(_) => Err(SplitError::FileNotFound { path }),
    }
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, SplitError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SplitError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SplitError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SplitError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SplitError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SplitError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
