//! Perplexity conversation extractor.
//!
//! With a thread id in the URL (`/search/<id>`) the whole thread is pulled
//! from the REST API (see [`crate::api`]); that is the only extraction path
//! whose failure is reported to the user. Without one, query and answer blocks
//! are scraped from the page and paired by index.

use super::pair_positionally;
use crate::api::{fetch_thread, turns_from_envelope, ApiSettings};
use crate::errors::ExportError;
use crate::models::{Extraction, Turn};
use crate::page::{inner_text, text_content, Page};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use url::Url;

const QUERY_SELECTOR: &str = r#"[class*="group/query"]"#;
const ANSWER_SELECTOR: &str = r#"div[class*="prose dark:prose-invert inline leading-relaxed"]"#;

static SOURCES_BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:Sources|Reviewed \d+ sources?)\s*").expect("sources banner regex")
});

/// Extract a Perplexity thread.
///
/// # Arguments
///
/// * `page` - Saved page; its URL decides between the API and the DOM
/// * `api` - Base override and cookie for the thread API
///
/// # Errors
///
/// [`ExportError::RemoteFetch`] when the thread API cannot be read. The DOM
/// path never fails.
pub async fn extract(page: &Page, api: &ApiSettings) -> Result<Extraction, ExportError> {
    let title = page.title();
    match thread_id(&page.url) {
        Some(id) => {
            let envelope = fetch_thread(api, &page.url, &id).await?;
            Ok(Extraction::new(turns_from_envelope(&envelope), title))
        }
        None => {
            info!("No thread id in URL; scraping page");
            Ok(Extraction::new(scrape(page), title))
        }
    }
}

/// The percent-decoded path segment following `/search/`, if any.
///
/// The endpoint builder encodes the id again, so it must leave here decoded.
pub fn thread_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "search")?;
    let raw = segments.next().filter(|id| !id.is_empty())?;
    match urlencoding::decode(raw) {
        Ok(id) => Some(id.into_owned()),
        Err(e) => {
            warn!(raw, error = %e, "Thread id is not valid UTF-8 once decoded; using it as is");
            Some(raw.to_string())
        }
    }
}

fn scrape(page: &Page) -> Vec<Turn> {
    let queries = page
        .select_all(QUERY_SELECTOR)
        .into_iter()
        .map(text_content)
        .collect();
    let answers = page
        .select_all(ANSWER_SELECTOR)
        .into_iter()
        .map(|node| strip_sources_banner(&inner_text(node)))
        .collect();
    pair_positionally(queries, answers)
}

fn strip_sources_banner(text: &str) -> String {
    SOURCES_BANNER.replace(text, "").trim().to_string()
}
