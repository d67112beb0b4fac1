//! Optional YAML configuration.
//!
//! The only configurable behaviour is the marker set of the OpenRouter
//! flat-text tokenizer: its literals track how the site renders its page and
//! go stale, so they live outside the code.
//!
//! ```yaml
//! flat_text:
//!   user_markers: ["User", "Chris"]
//!   assistant_pattern: '(free|paid)\)$'
//!   deleted_marker: Deleted
//!   relative_time_pattern: '^\d+ (second|minute|hour|day|week|month|year)s? ago$'
//!   reasoning_prefix: Reasoning
//!   collapse_sentinel: Collapse reasoning
//! ```

use crate::errors::ExportError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub flat_text: FlatTextConfig,
}

/// Literal and pattern markers for the flat-text tokenizer, as written in YAML.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlatTextConfig {
    /// Lines that announce a user message (the account's display name, or `User`).
    pub user_markers: Vec<String>,
    /// Regex matched against a line that announces an assistant reply.
    pub assistant_pattern: String,
    /// Line rendered in place of the model name for a deleted model.
    pub deleted_marker: String,
    /// Regex for relative timestamps such as `3 minutes ago`.
    pub relative_time_pattern: String,
    pub reasoning_prefix: String,
    pub collapse_sentinel: String,
}

impl Default for FlatTextConfig {
    fn default() -> Self {
        Self {
            user_markers: vec!["User".to_string()],
            assistant_pattern: r"(free|paid)\)$".to_string(),
            deleted_marker: "Deleted".to_string(),
            relative_time_pattern: r"^\d+ (second|minute|hour|day|week|month|year)s? ago$"
                .to_string(),
            reasoning_prefix: "Reasoning".to_string(),
            collapse_sentinel: "Collapse reasoning".to_string(),
        }
    }
}

/// Compiled form of [`FlatTextConfig`].
#[derive(Debug, Clone)]
pub struct MarkerSet {
    pub user_markers: Vec<String>,
    pub assistant: Regex,
    pub deleted_marker: String,
    pub relative_time: Regex,
    pub reasoning_prefix: String,
    pub collapse_sentinel: String,
}

impl MarkerSet {
    pub fn compile(config: &FlatTextConfig) -> Result<Self, ExportError> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern).map_err(|e| ExportError::Config(format!("{name}: {e}")))
        };
        if config.user_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ExportError::Config(
                "flat_text.user_markers must name at least one marker".to_string(),
            ));
        }
        Ok(Self {
            user_markers: config.user_markers.clone(),
            assistant: compile("flat_text.assistant_pattern", &config.assistant_pattern)?,
            deleted_marker: config.deleted_marker.clone(),
            relative_time: compile(
                "flat_text.relative_time_pattern",
                &config.relative_time_pattern,
            )?,
            reasoning_prefix: config.reasoning_prefix.clone(),
            collapse_sentinel: config.collapse_sentinel.clone(),
        })
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::compile(&FlatTextConfig::default()).expect("default markers compile")
    }
}

/// Parse a configuration document.
pub fn parse_config(yaml: &str) -> Result<ExportConfig, ExportError> {
    serde_yaml::from_str(yaml).map_err(|e| ExportError::Config(e.to_string()))
}

/// Load the configuration file at `path`, or the defaults when no path is given.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<ExportConfig, ExportError> {
    let Some(path) = path else {
        return Ok(ExportConfig::default());
    };
    let yaml = tokio::fs::read_to_string(path).await?;
    let config = parse_config(&yaml)?;
    info!(
        path,
        user_markers = ?config.flat_text.user_markers,
        "Loaded configuration"
    );
    Ok(config)
}
