//! Claude conversation extractor.
//!
//! Every message is a `div[data-test-render-count]`. User messages sit inside
//! a container whose class list mentions `font-user`; everything else is an
//! assistant reply.

use crate::models::{Extraction, Turn};
use crate::page::{inner_text, Page};
use scraper::ElementRef;

const MESSAGE_SELECTOR: &str = "div[data-test-render-count]";
const USER_CLASS_FRAGMENT: &str = "font-user";

/// Extract turns from a saved Claude chat.
pub fn extract(page: &Page) -> Extraction {
    let turns = page
        .select_all(MESSAGE_SELECTOR)
        .into_iter()
        .filter_map(|node| {
            let text = inner_text(node);
            if within_user_container(node) {
                Turn::user(&text)
            } else {
                Turn::assistant(&text)
            }
        })
        .collect();
    Extraction::new(turns, page.title())
}

/// Whether `node` or one of its ancestors has a class containing `font-user`.
fn within_user_container(node: ElementRef<'_>) -> bool {
    std::iter::once(node)
        .chain(node.ancestors().filter_map(ElementRef::wrap))
        .any(|el| {
            el.value()
                .attr("class")
                .is_some_and(|class| class.contains(USER_CLASS_FRAGMENT))
        })
}
