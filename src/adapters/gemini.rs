//! Gemini conversation extractor.
//!
//! Each exchange lives in a `.conversation-container` holding a `user-query`
//! and a `model-response` custom element. The document title is generic, so
//! the title comes from the active entry of the sidebar conversation list.

use crate::models::{Extraction, Turn};
use crate::page::{inner_text, select_within, text_content, Page};
use once_cell::sync::Lazy;
use regex::Regex;

const CONTAINER_SELECTOR: &str = ".conversation-container";
const ACTIVE_CONVERSATION_SELECTOR: &str =
    ".conversation.active, .conversation.selected, .conversation[aria-current=\"page\"]";

static SHOW_THINKING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Show thinking\s*").expect("show-thinking regex"));

/// Extract one user and one model turn per conversation container.
///
/// # Returns
///
/// The turns plus the sidebar title, or the document title when no sidebar
/// entry is active.
pub fn extract(page: &Page) -> Extraction {
    let mut turns = Vec::new();
    for container in page.select_all(CONTAINER_SELECTOR) {
        if let Some(query) = select_within(container, "user-query") {
            turns.extend(Turn::user(&inner_text(query)));
        }
        if let Some(response) = select_within(container, "model-response") {
            let text = inner_text(response);
            turns.extend(Turn::assistant(&SHOW_THINKING.replace(&text, "")));
        }
    }
    Extraction::new(turns, sidebar_title(page).or_else(|| page.title()))
}

fn sidebar_title(page: &Page) -> Option<String> {
    let active = page.select_first(ACTIVE_CONVERSATION_SELECTOR)?;
    let title = select_within(active, ".conversation-title")?;
    Some(text_content(title).trim().to_string()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Speaker;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::new(Url::parse("https://gemini.google.com/app/1").unwrap(), html)
    }

    #[test]
    fn test_pairs_within_containers_and_strips_thinking() {
        let html = r#"<html><head><title>Gemini</title></head><body>
            <nav>
              <div class="conversation"><span class="conversation-title">Old chat</span></div>
              <div class="conversation selected"><span class="conversation-title"> Tide tables </span></div>
            </nav>
            <div class="conversation-container">
              <user-query><p>When is high tide?</p></user-query>
              <model-response><div>Show thinking</div><p>At 14:05.</p></model-response>
            </div>
            <div class="conversation-container">
              <user-query><p>And low tide?</p></user-query>
            </div>
        </body></html>"#;
        let extraction = extract(&page(html));
        let turns: Vec<_> = extraction
            .turns
            .iter()
            .map(|t| (t.speaker, t.content.as_str()))
            .collect();
        assert_eq!(
            turns,
            vec![
                (Speaker::User, "When is high tide?"),
                (Speaker::Assistant, "At 14:05."),
                (Speaker::User, "And low tide?"),
            ]
        );
        assert_eq!(extraction.title.as_deref(), Some("Tide tables"));
    }

    #[test]
    fn test_title_falls_back_to_document() {
        let html = "<html><head><title>Gemini chat</title></head><body>\
            <div class=\"conversation-container\"><user-query>hi</user-query></div></body></html>";
        assert_eq!(extract(&page(html)).title.as_deref(), Some("Gemini chat"));
    }
}
