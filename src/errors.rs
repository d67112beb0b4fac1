//! Error taxonomy for a single export run.
//!
//! Only whole-run failures leave the pipeline. [`ExportError::MalformedEntry`]
//! is built and logged inside the Perplexity API path and then dropped, so a
//! bad entry never aborts the run.

use thiserror::Error;

/// Failures surfaced by the export pipeline and the CLI shell around it.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The origin host matched none of the known chat sites.
    #[error("unsupported chat site: {origin}")]
    UnsupportedSource { origin: String },

    /// An adapter ran but produced no non-empty turns.
    #[error("no conversation found on {source_name} page")]
    EmptyResult { source_name: String },

    /// Non-success status, transport failure or undecodable body from the thread API.
    #[error("failed to fetch thread: {0}")]
    RemoteFetch(String),

    /// A single thread entry whose nested steps payload could not be decoded.
    #[error("malformed thread entry {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// One-line notification shown to the user when a run aborts.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::UnsupportedSource { .. } => format!(
                "Unsupported chat site. Supported: {}",
                crate::adapters::Adapter::supported_sites().join(", ")
            ),
            ExportError::EmptyResult { .. } => "No conversation found to export".to_string(),
            ExportError::RemoteFetch(message) => {
                format!("Failed to fetch Perplexity thread: {message}")
            }
            other => other.to_string(),
        }
    }
}
