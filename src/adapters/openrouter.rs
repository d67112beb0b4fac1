//! OpenRouter conversation extractor.
//!
//! OpenRouter's chat view has no usable structure, so this adapter works on the
//! page's visible text: split into lines, trimmed, blank lines dropped. A small
//! state machine walks that line stream and recognises role changes purely from
//! marker lines (see [`MarkerSet`]):
//!
//! ```text
//! Scanning ──user marker──▶ UserTurn ──▶ Scanning
//!    │
//!    └──assistant marker──▶ AssistantTurn ──reasoning header──▶ Reasoning
//!                                │                                  │
//!                                └────────────▶ AssistantBody ◀─────┘
//!                                                    │
//!                                                    ▼
//!                                                Scanning
//! ```
//!
//! Relative timestamps (`2 minutes ago`) only ever delimit turns and are never
//! emitted. Marker literals follow the site's current rendering and are
//! configurable.

use crate::config::MarkerSet;
use crate::models::{Extraction, Subsection, Turn};
use crate::page::Page;
use crate::utils::truncate_chars;
use tracing::{debug, trace};

/// Characters of the first query kept as a title candidate.
const TITLE_EXCERPT_CHARS: usize = 60;

/// Tokenize the page's visible text into turns.
///
/// # Arguments
///
/// * `page` - Page whose text dump (or rendered body) is read
/// * `markers` - Compiled marker set recognising role changes
///
/// # Returns
///
/// The turns plus the first query, cut to 60 characters, as title candidate.
pub fn extract(page: &Page, markers: &MarkerSet) -> Extraction {
    let text = page.visible_text();
    let lines = flatten_lines(&text);
    debug!(lines = lines.len(), "Tokenizing flat text");
    let (turns, title) = Tokenizer::new(&lines, markers).run();
    Extraction::new(turns, title)
}

/// Split into trimmed, non-empty lines.
pub fn flatten_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

impl MarkerSet {
    pub fn is_user_marker(&self, line: &str) -> bool {
        self.user_markers.iter().any(|m| m == line)
    }

    /// Heading label when `line` announces an assistant reply.
    pub fn assistant_label(&self, line: &str) -> Option<String> {
        if line == self.deleted_marker {
            Some("Assistant".to_string())
        } else if self.assistant.is_match(line) {
            Some(line.to_string())
        } else {
            None
        }
    }

    pub fn is_turn_marker(&self, line: &str) -> bool {
        self.is_user_marker(line) || self.assistant_label(line).is_some()
    }

    pub fn is_relative_time(&self, line: &str) -> bool {
        self.relative_time.is_match(line)
    }

    pub fn is_reasoning_header(&self, line: &str) -> bool {
        !self.reasoning_prefix.is_empty() && line.starts_with(&self.reasoning_prefix)
    }

    pub fn is_collapse_sentinel(&self, line: &str) -> bool {
        line == self.collapse_sentinel
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Scanning,
    UserTurn,
    AssistantTurn,
    Reasoning { label: String },
    AssistantBody {
        label: String,
        reasoning: Option<Subsection>,
    },
    Done,
}

struct Tokenizer<'a> {
    lines: &'a [&'a str],
    markers: &'a MarkerSet,
    pos: usize,
    turns: Vec<Turn>,
    first_query: Option<String>,
}

impl<'a> Tokenizer<'a> {
    fn new(lines: &'a [&'a str], markers: &'a MarkerSet) -> Self {
        Self {
            lines,
            markers,
            pos: 0,
            turns: Vec::new(),
            first_query: None,
        }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn run(mut self) -> (Vec<Turn>, Option<String>) {
        let mut state = State::Scanning;
        while state != State::Done {
            trace!(pos = self.pos, ?state, "step");
            state = match state {
                State::Scanning => self.scan(),
                State::UserTurn => self.user_turn(),
                State::AssistantTurn => self.assistant_turn(),
                State::Reasoning { label } => self.reasoning(label),
                State::AssistantBody { label, reasoning } => self.assistant_body(label, reasoning),
                State::Done => State::Done,
            };
        }
        (self.turns, self.first_query)
    }

    fn scan(&mut self) -> State {
        let Some(line) = self.current() else {
            return State::Done;
        };
        if self.markers.is_user_marker(line) {
            State::UserTurn
        } else if self.markers.assistant_label(line).is_some() {
            State::AssistantTurn
        } else {
            self.pos += 1;
            State::Scanning
        }
    }

    /// On the user marker; the next line is the query.
    fn user_turn(&mut self) -> State {
        self.pos += 1;
        let Some(query) = self.current() else {
            return State::Done;
        };
        if self.first_query.is_none() {
            self.first_query = Some(truncate_chars(query, TITLE_EXCERPT_CHARS));
        }
        self.turns.extend(Turn::user(query));
        self.pos += 1;
        self.skip_relative_times();
        State::Scanning
    }

    /// On the assistant marker.
    fn assistant_turn(&mut self) -> State {
        let label = self
            .current()
            .and_then(|line| self.markers.assistant_label(line))
            .unwrap_or_else(|| "Assistant".to_string());
        self.pos += 1;
        match self.current() {
            Some(line) if self.markers.is_reasoning_header(line) => State::Reasoning { label },
            _ => State::AssistantBody {
                label,
                reasoning: None,
            },
        }
    }

    /// On the reasoning header. The line after it is a toggle and is skipped.
    fn reasoning(&mut self, label: String) -> State {
        let heading = self.current().unwrap_or_default().to_string();
        self.pos += 2;
        let mut lines = Vec::new();
        while let Some(line) = self.current() {
            if self.markers.is_collapse_sentinel(line) {
                break;
            }
            lines.push(line.to_string());
            self.pos += 1;
        }
        // Consume the sentinel.
        self.pos += 1;
        State::AssistantBody {
            label,
            reasoning: Some(Subsection { heading, lines }),
        }
    }

    fn assistant_body(&mut self, label: String, reasoning: Option<Subsection>) -> State {
        let mut body = Vec::new();
        while let Some(line) = self.current() {
            if self.markers.is_relative_time(line) || self.markers.is_turn_marker(line) {
                break;
            }
            body.push(line);
            self.pos += 1;
        }
        self.turns.extend(Turn::labelled_assistant(
            &body.join("\n\n"),
            Some(label),
            reasoning,
        ));
        self.skip_relative_times();
        State::Scanning
    }

    fn skip_relative_times(&mut self) {
        while self
            .current()
            .is_some_and(|line| self.markers.is_relative_time(line))
        {
            self.pos += 1;
        }
    }
}
