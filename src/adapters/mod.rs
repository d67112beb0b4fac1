//! Per-site extraction strategies.
//!
//! Each supported chat site gets one [`Adapter`] variant. Dispatch is a pure
//! function of the page's origin host: the first matcher whose needle occurs
//! in the host wins.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | ChatGPT | [`chatgpt`] | `data-message-author-role` attributes | Groups split assistant replies; shared links paired by index |
//! | Perplexity | [`perplexity`] | REST thread API | Falls back to class heuristics without a thread id |
//! | DeepSeek | [`deepseek`] | Class heuristics | Rule after every turn |
//! | OpenRouter | [`openrouter`] | Flat-text state machine | Markers are configurable |
//! | Claude | [`claude`] | Class heuristics | Speaker from the `font-user` ancestor |
//! | Gemini | [`gemini`] | Custom elements | Title from the active sidebar entry |
//! | Google AI Studio | [`aistudio`] | Class heuristics | Strips UI chrome tokens |
//!
//! # Common Patterns
//!
//! Every adapter exposes the same async `extract()`; only Perplexity actually
//! awaits anything. Tree adapters have no error channel: a missing or
//! unexpected node set yields fewer turns, which the pipeline reports as an
//! empty result.

pub mod aistudio;
pub mod chatgpt;
pub mod claude;
pub mod deepseek;
pub mod gemini;
pub mod openrouter;
pub mod perplexity;

use crate::api::ApiSettings;
use crate::config::MarkerSet;
use crate::errors::ExportError;
use crate::models::{Extraction, SeparatorStyle, Turn};
use crate::page::Page;
use itertools::{EitherOrBoth, Itertools};
use tracing::{debug, info, instrument};
use url::Url;

/// Everything an adapter may need besides the page itself.
#[derive(Debug, Clone, Default)]
pub struct ExtractContext {
    pub markers: MarkerSet,
    pub api: ApiSettings,
}

/// The closed set of supported chat sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    ChatGpt,
    Perplexity,
    DeepSeek,
    OpenRouter,
    Claude,
    Gemini,
    AiStudio,
}

/// Host needles in match order.
const MATCHERS: &[(&str, Adapter)] = &[
    ("chatgpt.com", Adapter::ChatGpt),
    ("perplexity.ai", Adapter::Perplexity),
    ("deepseek.com", Adapter::DeepSeek),
    ("openrouter.ai", Adapter::OpenRouter),
    ("claude.ai", Adapter::Claude),
    ("gemini.google.com", Adapter::Gemini),
    ("aistudio.google.com", Adapter::AiStudio),
];

impl Adapter {
    /// Pick the adapter for an origin URL.
    pub fn detect(origin: &Url) -> Result<Self, ExportError> {
        let host = origin.host_str().unwrap_or_default();
        let adapter = MATCHERS
            .iter()
            .find(|(needle, _)| !host.is_empty() && host.contains(needle))
            .map(|(_, adapter)| *adapter);
        debug!(host, ?adapter, "Source detection");
        adapter.ok_or_else(|| ExportError::UnsupportedSource {
            origin: origin.to_string(),
        })
    }

    /// Display names of every supported site, in match order.
    pub fn supported_sites() -> Vec<&'static str> {
        MATCHERS.iter().map(|(_, a)| a.source_name()).collect()
    }

    /// Name used in the transcript header.
    pub fn source_name(&self) -> &'static str {
        match self {
            Adapter::ChatGpt => "ChatGPT",
            Adapter::Perplexity => "Perplexity",
            Adapter::DeepSeek => "DeepSeek",
            Adapter::OpenRouter => "OpenRouter",
            Adapter::Claude => "Claude",
            Adapter::Gemini => "Gemini",
            Adapter::AiStudio => "Google AI Studio",
        }
    }

    /// Filename stem used when the page offers no usable title.
    pub fn default_filename(&self) -> &'static str {
        match self {
            Adapter::OpenRouter => "openrouter_chat",
            Adapter::Gemini => "gemini_chat",
            Adapter::AiStudio => "ai_studio_chat",
            _ => "chat_export",
        }
    }

    /// Where horizontal rules go in this site's transcript.
    pub fn separator(&self) -> SeparatorStyle {
        match self {
            Adapter::DeepSeek => SeparatorStyle::AfterEach,
            Adapter::Claude | Adapter::AiStudio => SeparatorStyle::BeforeEach,
            _ => SeparatorStyle::BeforeUser,
        }
    }

    /// Extract the ordered turns and a title candidate from `page`.
    #[instrument(level = "info", skip_all, fields(source = self.source_name()))]
    pub async fn extract(
        &self,
        page: &Page,
        ctx: &ExtractContext,
    ) -> Result<Extraction, ExportError> {
        let extraction = match self {
            Adapter::ChatGpt => chatgpt::extract(page),
            Adapter::Perplexity => perplexity::extract(page, &ctx.api).await?,
            Adapter::DeepSeek => deepseek::extract(page),
            Adapter::OpenRouter => openrouter::extract(page, &ctx.markers),
            Adapter::Claude => claude::extract(page),
            Adapter::Gemini => gemini::extract(page),
            Adapter::AiStudio => aistudio::extract(page),
        };
        info!(
            turns = extraction.turns.len(),
            title = ?extraction.title,
            "Extracted conversation"
        );
        Ok(extraction)
    }
}

/// Pair the `i`-th query with the `i`-th answer.
///
/// Iterates to the longer of the two lists; a missing or blank half is omitted.
pub(crate) fn pair_positionally(queries: Vec<String>, answers: Vec<String>) -> Vec<Turn> {
    queries
        .into_iter()
        .zip_longest(answers)
        .flat_map(|pair| {
            let (query, answer) = match pair {
                EitherOrBoth::Both(q, a) => (Some(q), Some(a)),
                EitherOrBoth::Left(q) => (Some(q), None),
                EitherOrBoth::Right(a) => (None, Some(a)),
            };
            let user = query.as_deref().and_then(Turn::user);
            let assistant = answer.as_deref().and_then(Turn::assistant);
            user.into_iter().chain(assistant)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Speaker;

    fn detect(url: &str) -> Result<Adapter, ExportError> {
        Adapter::detect(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_detect_every_site() {
        let cases = [
            ("https://chatgpt.com/c/abc", Adapter::ChatGpt),
            ("https://www.perplexity.ai/search/xyz", Adapter::Perplexity),
            ("https://chat.deepseek.com/a/chat/s/1", Adapter::DeepSeek),
            ("https://openrouter.ai/chat?room=1", Adapter::OpenRouter),
            ("https://claude.ai/chat/42", Adapter::Claude),
            ("https://gemini.google.com/app/7", Adapter::Gemini),
            ("https://aistudio.google.com/prompts/9", Adapter::AiStudio),
        ];
        for (url, expected) in cases {
            assert_eq!(detect(url).unwrap(), expected, "{url}");
        }
    }

    #[test]
    fn test_detect_unsupported() {
        let err = detect("https://example.com/chat").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedSource { ref origin } if origin.contains("example.com")));
        assert!(detect("file:///tmp/page.html").is_err());
    }

    #[test]
    fn test_detect_only_looks_at_host() {
        assert!(detect("https://example.com/chatgpt.com").is_err());
    }

    #[test]
    fn test_site_metadata() {
        assert_eq!(Adapter::supported_sites().len(), MATCHERS.len());
        assert_eq!(Adapter::AiStudio.source_name(), "Google AI Studio");
        assert_eq!(Adapter::OpenRouter.default_filename(), "openrouter_chat");
        assert_eq!(Adapter::ChatGpt.default_filename(), "chat_export");
        assert_eq!(Adapter::DeepSeek.separator(), SeparatorStyle::AfterEach);
        assert_eq!(Adapter::Claude.separator(), SeparatorStyle::BeforeEach);
        assert_eq!(Adapter::Gemini.separator(), SeparatorStyle::BeforeUser);
    }

    #[test]
    fn test_pair_positionally_unequal_lengths() {
        let turns = pair_positionally(
            vec!["q1".into(), "q2".into(), "q3".into()],
            vec!["a1".into(), "  ".into()],
        );
        let speakers: Vec<_> = turns.iter().map(|t| (t.speaker, t.content.as_str())).collect();
        assert_eq!(
            speakers,
            vec![
                (Speaker::User, "q1"),
                (Speaker::Assistant, "a1"),
                (Speaker::User, "q2"),
                (Speaker::User, "q3"),
            ]
        );
    }

    #[test]
    fn test_pair_positionally_extra_answers() {
        let turns = pair_positionally(vec![], vec!["a1".into()]);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].speaker, Speaker::Assistant);
    }
}
