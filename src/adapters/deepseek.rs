//! DeepSeek conversation extractor.
//!
//! DeepSeek exposes no role attribute. User bubbles and rendered answers are
//! told apart by their (generated) class names; both are collected in
//! document order.

use crate::models::{Extraction, Turn};
use crate::page::{inner_text, Page};

const USER_CLASS: &str = "fbb737a4";
const MESSAGE_SELECTOR: &str = "div.fbb737a4, div.ds-markdown";
const TITLE_SUFFIX: &str = " - DeepSeek";

/// Extract turns from a saved DeepSeek chat; the title drops the site suffix.
pub fn extract(page: &Page) -> Extraction {
    let turns = page
        .select_all(MESSAGE_SELECTOR)
        .into_iter()
        .filter_map(|node| {
            let text = inner_text(node);
            if node.value().classes().any(|c| c == USER_CLASS) {
                Turn::user(&text)
            } else {
                Turn::assistant(&text)
            }
        })
        .collect();
    let title = page
        .title()
        .map(|t| t.replace(TITLE_SUFFIX, "").trim().to_string());
    Extraction::new(turns, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Speaker;
    use url::Url;

    #[test]
    fn test_classes_decide_speaker() {
        let html = r#"<html><head><title>Sorting help - DeepSeek</title></head><body>
            <div class="fbb737a4">How do I sort?</div>
            <div class="ds-markdown"><p>Use <code>sort()</code>.</p><p>Or sort_by.</p></div>
            <div class="fbb737a4">   </div>
            <div class="other">noise</div>
        </body></html>"#;
        let page = Page::new(Url::parse("https://chat.deepseek.com/a/chat/s/1").unwrap(), html);
        let extraction = extract(&page);
        assert_eq!(extraction.turns.len(), 2);
        assert_eq!(extraction.turns[0].speaker, Speaker::User);
        assert_eq!(extraction.turns[1].content, "Use sort().\n\nOr sort_by.");
        assert_eq!(extraction.title.as_deref(), Some("Sorting help"));
    }
}
