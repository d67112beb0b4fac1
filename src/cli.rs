//! Command-line interface definitions for chat_md_export.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and the API base can also be provided via environment variables.

use clap::Parser;

/// Command-line arguments for the chat_md_export application.
///
/// # Examples
///
/// ```sh
/// # Export a saved ChatGPT page into ./exports
/// chat_md_export -u https://chatgpt.com/c/abc -i page.html -o ./exports
///
/// # OpenRouter from a copied text dump, with a custom marker config
/// chat_md_export -u https://openrouter.ai/chat -t dump.txt -c markers.yaml --stdout
///
/// # Perplexity thread fetched through the API
/// CHAT_EXPORT_COOKIE="session=..." chat_md_export -u https://www.perplexity.ai/search/xyz
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the conversation page (selects the site adapter)
    #[arg(short, long)]
    pub url: String,

    /// Saved HTML of the conversation page
    #[arg(short = 'i', long)]
    pub html: Option<String>,

    /// Flattened visible text of the page (used instead of the HTML body text)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Directory the Markdown file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Print the Markdown to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Cookie header forwarded to the Perplexity thread API
    #[arg(long, env = "CHAT_EXPORT_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Base URL of the thread API (defaults to the page origin)
    #[arg(long, env = "CHAT_EXPORT_API_BASE")]
    pub api_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "chat_md_export",
            "--url",
            "https://chatgpt.com/c/1",
            "--html",
            "page.html",
            "--output-dir",
            "./exports",
        ]);

        assert_eq!(cli.url, "https://chatgpt.com/c/1");
        assert_eq!(cli.html.as_deref(), Some("page.html"));
        assert_eq!(cli.output_dir, "./exports");
        assert!(!cli.stdout);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "chat_md_export",
            "-u",
            "https://openrouter.ai/chat",
            "-t",
            "/tmp/dump.txt",
            "-c",
            "/tmp/markers.yaml",
            "--stdout",
        ]);

        assert_eq!(cli.text.as_deref(), Some("/tmp/dump.txt"));
        assert_eq!(cli.config.as_deref(), Some("/tmp/markers.yaml"));
        assert_eq!(cli.output_dir, ".");
        assert!(cli.stdout);
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["chat_md_export", "-i", "page.html"]).is_err());
    }
}
