//! The export pipeline: dispatch, extract, assemble, name.
//!
//! Delivery of the artifact is left to the caller so the pipeline stays free
//! of side effects apart from the Perplexity API request.

use crate::adapters::{Adapter, ExtractContext};
use crate::errors::ExportError;
use crate::models::{Artifact, Transcript};
use crate::outputs::markdown::transcript_to_markdown;
use crate::page::Page;
use crate::utils::derive_filename;
use tracing::{info, instrument, warn};

/// Run one export over `page`.
///
/// # Errors
///
/// - [`ExportError::UnsupportedSource`] before anything is extracted or fetched
/// - [`ExportError::RemoteFetch`] when the Perplexity thread cannot be loaded
/// - [`ExportError::EmptyResult`] when no turns were found
#[instrument(level = "info", skip_all, fields(origin = %page.url))]
pub async fn export_page(page: &Page, ctx: &ExtractContext) -> Result<Artifact, ExportError> {
    let adapter = Adapter::detect(&page.url)?;
    info!(source = adapter.source_name(), "Selected adapter");

    let extraction = adapter.extract(page, ctx).await?;
    if extraction.turns.is_empty() {
        warn!(source = adapter.source_name(), "Adapter produced no turns");
        return Err(ExportError::EmptyResult {
            source_name: adapter.source_name().to_string(),
        });
    }

    let transcript = Transcript {
        source_name: adapter.source_name().to_string(),
        origin_url: page.url.to_string(),
        separator: adapter.separator(),
        turns: extraction.turns,
    };
    let markdown = transcript_to_markdown(&transcript);
    let filename = derive_filename(extraction.title.as_deref(), adapter.default_filename());
    info!(
        turns = transcript.turns.len(),
        bytes = markdown.len(),
        %filename,
        "Assembled transcript"
    );
    Ok(Artifact { markdown, filename })
}
