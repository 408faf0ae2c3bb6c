//! Configuration types for the splitting pipeline.
//!
//! All pipeline behaviour is controlled through [`SplitConfig`], built via
//! its [`SplitConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across invocations and to diff two runs to
//! understand why their outputs differ.
//!
//! The recognition endpoint and API key live here rather than in any
//! process-global state: a [`crate::pipeline::recognize::RecognitionClient`]
//! is constructed from an explicit config value, so two invocations in the
//! same process can talk to two different services.

use crate::error::SplitError;
use crate::pipeline::persist::OutputSink;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default line tokens that mark a page as a separator.
///
/// A page is a separator when at least one recognized line contains *all*
/// tokens, case-insensitively, as substrings.
pub const DEFAULT_SEPARATOR_TOKENS: &[&str] = &["separator", "invoice"];

/// Configuration for one split invocation.
///
/// Built via [`SplitConfig::builder()`] or [`SplitConfig::default()`].
///
/// # Example
/// ```rust
/// use scansplit::SplitConfig;
///
/// let config = SplitConfig::builder()
///     .endpoint("https://westus.api.example.com")
///     .api_key("secret")
///     .poll_interval_ms(2000)
///     .max_polls(150)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// Base URL of the recognition service, e.g.
    /// `https://westeurope.api.cognitive.microsoft.com`. If `None`, the
    /// `SCANSPLIT_OCR_ENDPOINT` environment variable is consulted when the
    /// client is constructed.
    pub endpoint: Option<String>,

    /// Subscription key sent as `Ocp-Apim-Subscription-Key` on every
    /// recognition request. If `None`, falls back to `SCANSPLIT_OCR_KEY`.
    pub api_key: Option<String>,

    /// Delay between recognition polls in milliseconds. Default: 2000.
    ///
    /// The service processes asynchronously; 2 seconds matches the cadence
    /// it documents and keeps request volume negligible. The wait happens
    /// *before* each poll, so the first GET is issued one interval after
    /// submission.
    pub poll_interval_ms: u64,

    /// Maximum number of polls before giving up. Default: 150.
    ///
    /// At the default cadence this bounds the wait to roughly five minutes.
    /// An operation that is still running after that returns
    /// [`SplitError::PollBudgetExhausted`] rather than hanging the
    /// invocation forever.
    pub max_polls: u32,

    /// Tokens that must all appear (case-insensitive substrings) in a single
    /// recognized line for a page to count as a separator.
    /// Default: `["separator", "invoice"]`.
    ///
    /// Matching is deliberately substring-based, not word-boundary-based:
    /// OCR output of a stamp like "Separator - Invoice" is noisy, and the
    /// looser rule tolerates run-together words.
    pub separator_tokens: Vec<String>,

    /// What to do with the final document when it contains no pages.
    /// Default: [`TrailingPolicy::EmitEmpty`].
    pub trailing: TrailingPolicy,

    /// Directory used to build the default local sink when no explicit
    /// [`OutputSink`] is configured. Default: `split-output`.
    pub output_dir: Option<PathBuf>,

    /// Pre-constructed output sink. Takes precedence over `output_dir`.
    pub sink: Option<Arc<dyn OutputSink>>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-HTTP-request timeout for recognition calls in seconds. Default: 60.
    ///
    /// This bounds a single submit or poll request, not the whole poll loop;
    /// the loop is bounded separately by `max_polls`.
    pub api_timeout_secs: u64,

    /// Progress callback invoked as the pipeline advances. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            poll_interval_ms: 2000,
            max_polls: 150,
            separator_tokens: DEFAULT_SEPARATOR_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trailing: TrailingPolicy::default(),
            output_dir: None,
            sink: None,
            download_timeout_secs: 120,
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_polls", &self.max_polls)
            .field("separator_tokens", &self.separator_tokens)
            .field("trailing", &self.trailing)
            .field("output_dir", &self.output_dir)
            .field("sink", &self.sink.as_ref().map(|_| "<dyn OutputSink>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder for `SplitConfig`.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn max_polls(mut self, n: u32) -> Self {
        self.config.max_polls = n.max(1);
        self
    }

    pub fn separator_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.separator_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn trailing(mut self, policy: TrailingPolicy) -> Self {
        self.config.trailing = policy;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.config.sink = Some(sink);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, SplitError> {
        let c = &self.config;
        if c.max_polls == 0 {
            return Err(SplitError::InvalidConfig("max_polls must be ≥ 1".into()));
        }
        if c.separator_tokens.is_empty() {
            return Err(SplitError::InvalidConfig(
                "separator_tokens must not be empty (every non-blank page would match)".into(),
            ));
        }
        if c.separator_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(SplitError::InvalidConfig(
                "separator_tokens must not contain blank tokens".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// What to do with the unconditional final emission when it is empty.
///
/// The segmenter always finalizes whatever the current document holds once
/// the page loop ends. When the last physical page is a separator, that
/// final document holds zero pages. Emitting it preserves a signal of
/// "nothing followed the last separator"; suppressing it keeps the output
/// list free of empty PDFs. Empty documents *between* two adjacent
/// separators are emitted under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrailingPolicy {
    /// Emit the trailing document even when it contains no pages. (default)
    #[default]
    EmitEmpty,
    /// Drop an empty trailing document, unless doing so would leave zero
    /// output documents.
    SuppressEmpty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens_match_reference() {
        let config = SplitConfig::default();
        assert_eq!(config.separator_tokens, vec!["separator", "invoice"]);
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.trailing, TrailingPolicy::EmitEmpty);
    }

    #[test]
    fn builder_rejects_empty_token_list() {
        let result = SplitConfig::builder()
            .separator_tokens(Vec::<String>::new())
            .build();
        assert!(matches!(result, Err(SplitError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_blank_token() {
        let result = SplitConfig::builder().separator_tokens(["ok", " "]).build();
        assert!(matches!(result, Err(SplitError::InvalidConfig(_))));
    }

    #[test]
    fn max_polls_clamped_to_one() {
        let config = SplitConfig::builder().max_polls(0).build().unwrap();
        assert_eq!(config.max_polls, 1);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SplitConfig::builder()
            .api_key("very-secret")
            .build()
            .unwrap();
        let dump = format!("{config:?}");
        assert!(!dump.contains("very-secret"));
        assert!(dump.contains("<redacted>"));
    }
}
