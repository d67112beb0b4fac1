//! Utility functions for text normalization, filename derivation and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Blank-line collapsing shared by every adapter
//! - Character-safe truncation for titles and log previews
//! - Filename derivation from a page or conversation title
//! - File system validation for the output directory

use once_cell::sync::Lazy;
use regex::Regex;
use crate::errors::ExportError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Maximum length of a derived filename stem, in characters.
pub const FILENAME_MAX_CHARS: usize = 60;

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-run regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapse three or more consecutive newlines into exactly one blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// Keep at most `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head = truncate_chars(s, max);
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Turn a title into a filesystem-safe filename stem.
///
/// Everything except ASCII letters, digits, `_` and whitespace is removed,
/// whitespace runs become a single `_`, leading and trailing underscores are
/// stripped and the result is cut to [`FILENAME_MAX_CHARS`]. Case is preserved.
/// Returns an empty string when nothing survives.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_title("Hello, World!! — Test"), "Hello_World_Test");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    let joined = WHITESPACE_RUN.replace_all(&kept, "_");
    let trimmed = joined.trim_matches('_');
    truncate_chars(trimmed, FILENAME_MAX_CHARS)
}

/// Derive the artifact filename (`<stem>.md`) from an optional title.
///
/// Falls back to `default_stem` when the title is missing or sanitizes to nothing.
pub fn derive_filename(title: Option<&str>, default_stem: &str) -> String {
    let stem = title.map(sanitize_title).unwrap_or_default();
    let stem = if stem.is_empty() {
        default_stem.to_string()
    } else {
        stem
    };
    debug!(?title, %stem, "Derived filename");
    format!("{stem}.md")
}

/// Create `path` if needed and check that files can be created in it.
///
/// # Arguments
///
/// * `path` - Output directory for the Markdown artifact
///
/// # Errors
///
/// [`ExportError::Io`] when the directory cannot be created, or a probe file
/// cannot be written into it (read-only mount, missing permissions).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), ExportError> {
    let dir = Path::new(path);
    fs::create_dir_all(dir).await?;
    let probe = dir.join(".chat_md_export_probe");
    fs::write(&probe, b"").await?;
    if let Err(e) = fs::remove_file(&probe).await {
        debug!(probe = %probe.display(), error = %e, "Could not remove probe file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\nb"), "a\nb");
    }

    #[test]
    fn test_sanitize_title_strips_punctuation() {
        assert_eq!(sanitize_title("Hello, World!! — Test"), "Hello_World_Test");
        assert_eq!(sanitize_title("  __Rust  tips__ "), "Rust_tips");
        assert_eq!(sanitize_title("snake_case stays"), "snake_case_stays");
    }

    #[test]
    fn test_sanitize_title_truncates_to_sixty() {
        let title = "word ".repeat(40);
        let stem = sanitize_title(&title);
        assert_eq!(stem.chars().count(), FILENAME_MAX_CHARS);
        assert!(stem.starts_with("word_word_"));
    }

    #[test]
    fn test_derive_filename_defaults() {
        assert_eq!(derive_filename(None, "chat_export"), "chat_export.md");
        assert_eq!(derive_filename(Some("!!!"), "gemini_chat"), "gemini_chat.md");
        assert_eq!(
            derive_filename(Some("Trip plan: Oslo"), "chat_export"),
            "Trip_plan_Oslo.md"
        );
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("out/nested");
        let nested = nested.to_str().unwrap();
        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
        assert_eq!(std::fs::read_dir(nested).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_file_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ensure_writable_dir(file.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
