//! Google AI Studio conversation extractor.
//!
//! Turns are `.chat-turn-container` nodes classed `user` or `model`. Their raw
//! text includes icon ligatures and button labels (`edit`, `more_vert`,
//! `thumb_up`, ...), which are stripped from both ends.

use crate::models::{Extraction, Turn};
use crate::page::{text_content, Page};
use once_cell::sync::Lazy;
use regex::Regex;

const TURN_SELECTOR: &str = ".chat-turn-container";

static LEADING_CHROME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:edit|more_vert|User|Model|Thoughts|Expand to view model thoughts|chevron_right|content_copy|thumb_up|thumb_down|flag|share)+\s*",
    )
    .expect("leading chrome regex")
});
static TRAILING_CHROME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+(?:edit|more_vert|content_copy|thumb_up|thumb_down|flag|share)\s*$")
        .expect("trailing chrome regex")
});
static SEARCH_SUGGESTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Google Search Suggestions.*$").expect("suggestions regex"));

/// Extract user and model turns with their UI chrome removed.
///
/// The title is the page `<h1>`, falling back to the document title.
pub fn extract(page: &Page) -> Extraction {
    let turns = page
        .select_all(TURN_SELECTOR)
        .into_iter()
        .filter_map(|node| {
            let is_user = node.value().classes().any(|c| c == "user");
            let is_model = node.value().classes().any(|c| c == "model");
            if !is_user && !is_model {
                return None;
            }
            let text = strip_chrome(text_content(node).trim());
            if is_user {
                Turn::user(&text)
            } else {
                Turn::assistant(&text)
            }
        })
        .collect();
    let title = page
        .select_first("h1")
        .map(|h1| text_content(h1).trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| page.title());
    Extraction::new(turns, title)
}

fn strip_chrome(text: &str) -> String {
    let text = LEADING_CHROME.replace(text, "");
    let text = TRAILING_CHROME.replace(&text, "");
    SEARCH_SUGGESTIONS.replace(&text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Speaker;
    use url::Url;

    #[test]
    fn test_strip_chrome() {
        assert_eq!(strip_chrome("editmore_vertUser Explain monads"), "Explain monads");
        assert_eq!(
            strip_chrome("Model A monad is a monoid. thumb_up"),
            "A monad is a monoid."
        );
        assert_eq!(
            strip_chrome("Answer text\nGoogle Search Suggestions\nmonads explained"),
            "Answer text"
        );
    }

    #[test]
    fn test_extracts_user_and_model_turns() {
        let html = r#"<html><head><title>AI Studio</title></head><body>
            <h1> Monad chat </h1>
            <div class="chat-turn-container user"><span>edit</span><span>more_vert</span> What is a monad?</div>
            <div class="chat-turn-container model"><span>Model</span> A burrito. <span>thumb_up</span></div>
            <div class="chat-turn-container system">ignored</div>
            <div class="chat-turn-container model"><span>edit</span></div>
        </body></html>"#;
        let page = Page::new(Url::parse("https://aistudio.google.com/prompts/1").unwrap(), html);
        let extraction = extract(&page);
        let turns: Vec<_> = extraction
            .turns
            .iter()
            .map(|t| (t.speaker, t.content.as_str()))
            .collect();
        assert_eq!(
            turns,
            vec![
                (Speaker::User, "What is a monad?"),
                (Speaker::Assistant, "A burrito."),
            ]
        );
        assert_eq!(extraction.title.as_deref(), Some("Monad chat"));
    }
}
