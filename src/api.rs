//! Perplexity thread API client.
//!
//! Perplexity virtualises its conversation view, so a saved page rarely holds
//! the whole thread. Instead the thread is fetched from the site's REST
//! endpoint, authenticated with whatever cookie the caller forwards.
//!
//! # Wire Format
//!
//! `GET <base>/rest/thread/<thread-id>` returns
//!
//! ```text
//! { "entries": [ { "text": "<JSON-encoded list of steps>" }, ... ] }
//! ```
//!
//! where each step is `{ "step_type": "INITIAL_QUERY" | "FINAL" | ..., "content": {...} }`.
//! The `FINAL` step's `content.answer` is itself usually a JSON document with
//! an `answer` field.
//!
//! There is no retry policy: a failed request is reported once.

use crate::errors::ExportError;
use crate::models::Turn;
use crate::utils::truncate_for_log;
use reqwest::header::COOKIE;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const INITIAL_QUERY: &str = "INITIAL_QUERY";
pub const FINAL: &str = "FINAL";

/// Where and how to reach the thread API.
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
    /// Overrides the page origin as the base of the REST endpoint.
    pub base: Option<Url>,
    /// Raw `Cookie` header value forwarded with the request.
    pub cookie: Option<String>,
}

/// Response envelope of the thread endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ThreadEnvelope {
    #[serde(default)]
    pub entries: Vec<ThreadEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreadEntry {
    /// JSON-encoded list of steps.
    #[serde(default)]
    pub text: String,
}

/// Build the endpoint URL for a thread.
pub fn thread_endpoint(base: &Url, thread_id: &str) -> Result<Url, ExportError> {
    let path = format!("rest/thread/{}", urlencoding::encode(thread_id));
    let mut root = base.clone();
    root.set_path("/");
    Ok(root.join(&path)?)
}

/// Fetch and decode the thread envelope.
#[instrument(level = "info", skip_all, fields(%thread_id))]
pub async fn fetch_thread(
    settings: &ApiSettings,
    origin: &Url,
    thread_id: &str,
) -> Result<ThreadEnvelope, ExportError> {
    let base = settings.base.as_ref().unwrap_or(origin);
    let endpoint = thread_endpoint(base, thread_id)?;
    info!(%endpoint, "Fetching Perplexity thread");

    let t0 = Instant::now();
    let client = reqwest::Client::new();
    let mut request = client.get(endpoint.clone());
    if let Some(cookie) = settings.cookie.as_deref() {
        request = request.header(COOKIE, cookie);
    }
    let response = request
        .send()
        .await
        .map_err(|e| ExportError::RemoteFetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "Thread API returned non-success status");
        return Err(ExportError::RemoteFetch(format!("API returned {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ExportError::RemoteFetch(e.to_string()))?;
    let envelope: ThreadEnvelope = serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, body_preview = %truncate_for_log(&body, 300), "Undecodable thread envelope");
        ExportError::RemoteFetch(format!("invalid response body: {e}"))
    })?;
    info!(
        entries = envelope.entries.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched thread"
    );
    Ok(envelope)
}

/// Turn the envelope into ordered turns, skipping entries that fail to decode.
pub fn turns_from_envelope(envelope: &ThreadEnvelope) -> Vec<Turn> {
    let mut turns = Vec::new();
    for (index, entry) in envelope.entries.iter().enumerate() {
        match entry_turns(index, entry) {
            Ok(entry_turns) => turns.extend(entry_turns),
            Err(e) => warn!(error = %e, "Skipping thread entry"),
        }
    }
    turns
}

fn entry_turns(index: usize, entry: &ThreadEntry) -> Result<Vec<Turn>, ExportError> {
    let steps: Vec<Value> =
        serde_json::from_str(&entry.text).map_err(|e| ExportError::MalformedEntry {
            index,
            reason: e.to_string(),
        })?;

    let query = step_field(&steps, INITIAL_QUERY, "query");
    let answer = step_field(&steps, FINAL, "answer");
    debug!(index, has_query = query.is_some(), has_answer = answer.is_some(), "Decoded entry");

    let mut turns = Vec::new();
    turns.extend(query.and_then(Turn::user));
    let answer = answer.and_then(decode_answer);
    turns.extend(answer.as_deref().and_then(Turn::assistant));
    Ok(turns)
}

/// String `content.<field>` of the first step of `step_type`.
///
/// Steps are left untyped: other step kinds carry arbitrary content shapes
/// (`null`, nested objects) that must not spoil the entry.
fn step_field<'a>(steps: &'a [Value], step_type: &str, field: &str) -> Option<&'a str> {
    steps
        .iter()
        .find(|step| step.get("step_type").and_then(Value::as_str) == Some(step_type))?
        .get("content")?
        .get(field)?
        .as_str()
}

/// Recover the displayed answer from a `FINAL` step.
///
/// The payload is normally a JSON document whose `answer` field holds the text;
/// when it is not JSON at all the raw string is the answer. A JSON document
/// without a string `answer` yields nothing.
pub fn decode_answer(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value
            .get("answer")
            .and_then(|a| a.as_str())
            .map(str::to_string),
        Err(_) => Some(raw.to_string()),
    }
}
