//! # chat_md_export
//!
//! Exports a conversation from a saved AI chat page to a single Markdown
//! transcript that no longer depends on the site that rendered it.
//!
//! ## Features
//!
//! - Supports ChatGPT, Perplexity, DeepSeek, OpenRouter, Claude, Gemini and
//!   Google AI Studio, one extraction strategy per site
//! - Reads the saved HTML, a flattened text dump, or (Perplexity) the site's
//!   thread API
//! - Normalizes every site into the same `### User` / `### Assistant` layout
//! - Names the file after the conversation title
//!
//! ## Usage
//!
//! ```sh
//! chat_md_export -u https://chatgpt.com/c/abc -i page.html -o ./exports
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Dispatch**: Pick the site adapter from the page URL
//! 2. **Extraction**: Collect the ordered turns (and a title) from the page or API
//! 3. **Assembly**: Render the transcript as Markdown and derive the filename
//! 4. **Output**: Write `<title>.md` into the output directory

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod adapters;
mod api;
mod cli;
mod config;
mod errors;
mod export;
mod models;
mod outputs;
mod page;
mod utils;

use adapters::ExtractContext;
use api::ApiSettings;
use cli::Cli;
use config::{load_config, MarkerSet};
use errors::ExportError;
use export::export_page;
use outputs::file::write_artifact;
use page::Page;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("chat_md_export starting up");

    let args = Cli::parse();
    debug!(url = %args.url, html = ?args.html, text = ?args.text, "Parsed CLI arguments");

    // Fail early if the artifact could not be saved anyway.
    if !args.stdout {
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            warn!(path = %args.output_dir, "Output directory is not writable");
            return Err(report(e));
        }
    }

    let (page, ctx) = match prepare(&args).await {
        Ok(prepared) => prepared,
        Err(e) => return Err(report(e)),
    };

    let artifact = match export_page(&page, &ctx).await {
        Ok(artifact) => artifact,
        Err(e) => return Err(report(e)),
    };

    if args.stdout {
        print!("{}", artifact.markdown);
    } else {
        let path = write_artifact(&artifact, &args.output_dir).await?;
        eprintln!("Saved {}", path.display());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Load configuration and inputs into a page plus extraction context.
#[instrument(level = "info", skip_all)]
async fn prepare(args: &Cli) -> Result<(Page, ExtractContext), ExportError> {
    let config = load_config(args.config.as_deref()).await?;
    let markers = MarkerSet::compile(&config.flat_text)?;

    let url = Url::parse(&args.url)?;
    let html = match &args.html {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => String::new(),
    };
    let mut page = Page::new(url, &html);
    if let Some(path) = &args.text {
        page = page.with_flat_text(tokio::fs::read_to_string(path).await?);
    }
    info!(html_bytes = html.len(), has_text_dump = args.text.is_some(), "Loaded page");

    let api = ApiSettings {
        base: args.api_base.as_deref().map(Url::parse).transpose()?,
        cookie: args.cookie.clone(),
    };
    Ok((page, ExtractContext { markers, api }))
}

/// Log a run-ending failure and show the user a one-line notification.
fn report(e: ExportError) -> Box<dyn Error> {
    error!(error = %e, "Export failed");
    eprintln!("{}", e.user_message());
    Box::new(e)
}
