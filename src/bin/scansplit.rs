//! CLI binary for scansplit.
//!
//! A thin shim over the library crate that maps CLI flags to `SplitConfig`
//! and prints the resulting references.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scansplit::{
    inspect, split, NoopProgressCallback, SplitConfig, SplitProgressCallback, TrailingPolicy,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner while the recognition operation is polled,
/// then one log line per persisted document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_submit(&self, bytes_len: usize) {
        self.bar.set_prefix("Recognizing");
        self.bar
            .set_message(format!("submitted {} bytes", bytes_len));
    }

    fn on_poll(&self, attempt: u32, status: &str) {
        self.bar.set_message(format!("poll {attempt}: {status}"));
    }

    fn on_recognition_complete(&self, recognized_pages: usize, poll_attempts: u32) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Recognized {recognized_pages} pages after {poll_attempts} polls"
            ))
        ));
        self.bar.set_prefix("Splitting");
        self.bar.set_message("copying pages");
    }

    fn on_document_persisted(&self, seq: usize, page_count: usize, reference: &str) {
        self.bar.println(format!(
            "  {} Document {:>2}  {:<10}  {}",
            green("✓"),
            seq + 1,
            dim(&format!("{page_count} pages")),
            reference,
        ));
    }

    fn on_split_complete(&self, documents: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} documents written",
            green("✔"),
            bold(&documents.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Split a scanned batch into ./split-output/
  scansplit batch.pdf

  # Choose the output directory
  scansplit batch.pdf -o ./invoices

  # Explicit service configuration
  scansplit --endpoint https://westeurope.api.example.com --api-key $KEY batch.pdf

  # Custom separator stamp
  scansplit --token cover --token sheet batch.pdf

  # Drop the empty trailing document produced by a separator on the last page
  scansplit --suppress-empty-trailing batch.pdf

  # Split a PDF fetched over HTTP
  scansplit https://example.com/scans/batch.pdf

  # Page count and PDF version only (no service contact, no API key needed)
  scansplit --inspect-only batch.pdf

  # Machine-readable result
  scansplit --json batch.pdf > result.json

ENVIRONMENT VARIABLES:
  SCANSPLIT_OCR_ENDPOINT  Recognition service base URL
  SCANSPLIT_OCR_KEY       Recognition service subscription key
  SCANSPLIT_OUTPUT_DIR    Default output directory
  RUST_LOG                Log filter, e.g. RUST_LOG=scansplit=debug

SEPARATOR DETECTION:
  A page is a separator when one recognized line contains every token
  (default: "separator" and "invoice") as a case-insensitive substring.
  Separator pages are never copied into any output document; pages with
  no recognized text are dropped."#;

/// Split scanned multi-document PDFs at separator pages.
#[derive(Parser, Debug)]
#[command(name = "scansplit", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Input PDF: local path or HTTP/HTTPS URL
    input: String,

    /// Directory for output documents
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Recognition service base URL
    #[arg(long, env = "SCANSPLIT_OCR_ENDPOINT")]
    endpoint: Option<String>,

    /// Recognition service subscription key
    #[arg(long, env = "SCANSPLIT_OCR_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Milliseconds between recognition polls
    #[arg(long, default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Maximum recognition polls before giving up
    #[arg(long, default_value_t = 150)]
    max_polls: u32,

    /// Separator token; repeat to require several on one line
    #[arg(long = "token", value_name = "TOKEN")]
    tokens: Vec<String>,

    /// Do not emit an empty document when the last page is a separator
    #[arg(long)]
    suppress_empty_trailing: bool,

    /// Download timeout for URL inputs, in seconds
    #[arg(long, default_value_t = 120, value_name = "SECS")]
    download_timeout: u64,

    /// Report page count and PDF version, then exit
    #[arg(long)]
    inspect_only: bool,

    /// Print the full result as JSON instead of one reference per line
    #[arg(long)]
    json: bool,

    /// Disable the progress display
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.inspect_only {
        let info = inspect(&cli.input, cli.download_timeout).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("pages: {}", info.page_count);
            println!("pdf_version: {}", info.pdf_version);
        }
        return Ok(());
    }

    let mut builder = SplitConfig::builder()
        .poll_interval_ms(cli.poll_interval_ms)
        .max_polls(cli.max_polls)
        .download_timeout_secs(cli.download_timeout);

    if let Some(endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint);
    }
    if let Some(key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if !cli.tokens.is_empty() {
        builder = builder.separator_tokens(cli.tokens);
    }
    if cli.suppress_empty_trailing {
        builder = builder.trailing(TrailingPolicy::SuppressEmpty);
    }
    builder = if cli.quiet || cli.json {
        builder.progress_callback(Arc::new(NoopProgressCallback))
    } else {
        builder.progress_callback(CliProgressCallback::new())
    };

    let config = builder.build().context("invalid configuration")?;
    let output = split(&cli.input, &config)
        .await
        .context("split failed; no documents were reported")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for file in &output.files {
            println!("{file}");
        }
        eprintln!(
            "{}",
            dim(&format!(
                "{} pages, {} separators, {} blank, {} documents, {}ms",
                output.stats.page_count,
                output.stats.separator_pages,
                output.stats.blank_pages,
                output.stats.documents_emitted,
                output.stats.total_duration_ms
            ))
        );
    }

    Ok(())
}
