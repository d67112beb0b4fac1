//! Markdown assembly.
//!
//! A [`Transcript`] renders as a header link to the conversation followed by
//! one `###` section per turn:
//!
//! ```text
//! [ChatGPT](https://chatgpt.com/c/…)
//!
//! ---
//! ### User
//!
//! How do lifetimes work?
//!
//! ### Assistant
//!
//! They describe how long references stay valid.
//!
//! ```
//!
//! Where horizontal rules go depends on the transcript's [`SeparatorStyle`].
//! Rendering is a pure function of the transcript, so identical input always
//! yields byte-identical output.

use crate::models::{SeparatorStyle, Transcript, Turn};
use std::fmt::Write;

const RULE: &str = "---";

/// Render a full transcript.
pub fn transcript_to_markdown(transcript: &Transcript) -> String {
    let mut md = String::new();
    let _ = write!(
        md,
        "[{}]({})\n\n",
        transcript.source_name, transcript.origin_url
    );
    for turn in &transcript.turns {
        render_turn(&mut md, turn, transcript.separator);
    }
    md
}

fn render_turn(md: &mut String, turn: &Turn, separator: SeparatorStyle) {
    let rule_before = match separator {
        SeparatorStyle::BeforeUser => turn.is_user(),
        SeparatorStyle::BeforeEach => true,
        SeparatorStyle::AfterEach => false,
    };
    if rule_before {
        md.push_str(RULE);
        md.push('\n');
    }

    let _ = write!(md, "### {}\n\n", heading(turn));
    if let Some(reasoning) = &turn.reasoning {
        let _ = write!(md, "**{}**\n\n", reasoning.heading);
        for line in &reasoning.lines {
            let _ = write!(md, "{line}\n\n");
        }
    }
    if !turn.content.is_empty() {
        let _ = write!(md, "{}\n\n", turn.content);
    }

    if separator == SeparatorStyle::AfterEach {
        md.push_str(RULE);
        md.push_str("\n\n");
    }
}

fn heading(turn: &Turn) -> String {
    match &turn.label {
        Some(label) => format!("{} ({})", turn.speaker.heading(), label),
        None => turn.speaker.heading().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subsection;
    use pretty_assertions::assert_eq;

    fn transcript(separator: SeparatorStyle, turns: Vec<Turn>) -> Transcript {
        Transcript {
            source_name: "ChatGPT".to_string(),
            origin_url: "https://chatgpt.com/c/1".to_string(),
            separator,
            turns,
        }
    }

    fn exchange() -> Vec<Turn> {
        vec![
            Turn::user("Hi").unwrap(),
            Turn::assistant("Hello!").unwrap(),
        ]
    }

    #[test]
    fn test_rule_before_user() {
        let md = transcript_to_markdown(&transcript(SeparatorStyle::BeforeUser, exchange()));
        assert_eq!(
            md,
            "[ChatGPT](https://chatgpt.com/c/1)\n\n---\n### User\n\nHi\n\n### Assistant\n\nHello!\n\n"
        );
    }

    #[test]
    fn test_rule_before_each() {
        let md = transcript_to_markdown(&transcript(SeparatorStyle::BeforeEach, exchange()));
        assert_eq!(
            md,
            "[ChatGPT](https://chatgpt.com/c/1)\n\n---\n### User\n\nHi\n\n---\n### Assistant\n\nHello!\n\n"
        );
    }

    #[test]
    fn test_rule_after_each() {
        let md = transcript_to_markdown(&transcript(SeparatorStyle::AfterEach, exchange()));
        assert_eq!(
            md,
            "[ChatGPT](https://chatgpt.com/c/1)\n\n### User\n\nHi\n\n---\n\n### Assistant\n\nHello!\n\n---\n\n"
        );
    }

    #[test]
    fn test_label_and_reasoning() {
        let turn = Turn::labelled_assistant(
            "Answer body",
            Some("Model (paid)".to_string()),
            Some(Subsection {
                heading: "Reasoning for 3s".to_string(),
                lines: vec!["step one".to_string(), "step two".to_string()],
            }),
        )
        .unwrap();
        let md = transcript_to_markdown(&transcript(SeparatorStyle::BeforeUser, vec![turn]));
        assert_eq!(
            md,
            "[ChatGPT](https://chatgpt.com/c/1)\n\n### Assistant (Model (paid))\n\n\
             **Reasoning for 3s**\n\nstep one\n\nstep two\n\nAnswer body\n\n"
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let t = transcript(SeparatorStyle::BeforeUser, exchange());
        assert_eq!(transcript_to_markdown(&t), transcript_to_markdown(&t.clone()));
    }

    #[test]
    fn test_empty_transcript_is_header_only() {
        let md = transcript_to_markdown(&transcript(SeparatorStyle::BeforeUser, vec![]));
        assert_eq!(md, "[ChatGPT](https://chatgpt.com/c/1)\n\n");
    }
}
