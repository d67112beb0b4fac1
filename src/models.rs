//! Data models for extracted conversations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Turn`]: One speaker's normalized contribution
//! - [`Extraction`]: What a source adapter hands back (turns plus a title candidate)
//! - [`Transcript`]: Header plus ordered turns, ready for Markdown assembly
//! - [`Artifact`]: The final Markdown text and its filename
//!
//! Turns can only be built through constructors that normalize their text, so an
//! emitted turn is never empty.

use crate::utils::collapse_blank_lines;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn heading(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

/// A bolded block rendered ahead of an assistant reply, e.g. a reasoning trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    /// Rendered as `**heading**`.
    pub heading: String,
    /// Each line becomes its own paragraph.
    pub lines: Vec<String>,
}

/// One speaker's contribution, in conversation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    /// Optional qualifier shown in the heading, e.g. a model name.
    pub label: Option<String>,
    pub reasoning: Option<Subsection>,
    /// Normalized plain text.
    pub content: String,
}

impl Turn {
    /// Build a user turn; `None` when the text is blank.
    pub fn user(text: &str) -> Option<Self> {
        let content = normalize(text);
        if content.is_empty() {
            return None;
        }
        Some(Self {
            speaker: Speaker::User,
            label: None,
            reasoning: None,
            content,
        })
    }

    /// Build an assistant turn; `None` when the text is blank.
    pub fn assistant(text: &str) -> Option<Self> {
        Self::labelled_assistant(text, None, None)
    }

    /// Build an assistant turn carrying a heading label and an optional reasoning block.
    ///
    /// The turn survives an empty body only when the reasoning block has content.
    pub fn labelled_assistant(
        text: &str,
        label: Option<String>,
        reasoning: Option<Subsection>,
    ) -> Option<Self> {
        let content = normalize(text);
        let reasoning = reasoning.filter(|r| !r.heading.trim().is_empty() || !r.lines.is_empty());
        if content.is_empty() && reasoning.is_none() {
            return None;
        }
        Some(Self {
            speaker: Speaker::Assistant,
            label: label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            reasoning,
            content,
        })
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

fn normalize(text: &str) -> String {
    collapse_blank_lines(text.trim()).trim().to_string()
}

/// Where horizontal rules go when a transcript is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorStyle {
    /// `---` precedes every user turn.
    #[default]
    BeforeUser,
    /// `---` precedes every turn.
    BeforeEach,
    /// `---` and a blank line follow every turn.
    AfterEach,
}

/// Output of a source adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub turns: Vec<Turn>,
    /// Candidate for the filename, adapter specific.
    pub title: Option<String>,
}

impl Extraction {
    pub fn new(turns: Vec<Turn>, title: Option<String>) -> Self {
        Self { turns, title }
    }
}

/// Header plus the ordered turns of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub source_name: String,
    pub origin_url: String,
    pub separator: SeparatorStyle,
    pub turns: Vec<Turn>,
}

/// The text handed to the file-save collaborator together with its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub markdown: String,
    pub filename: String,
}
