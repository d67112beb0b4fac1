//! ChatGPT conversation extractor.
//!
//! Every message node carries `data-message-author-role`. A single assistant
//! reply may be rendered as several consecutive nodes, so non-user nodes are
//! grouped until the next user node. Shared (read-only) links render user
//! messages as bubbles instead; those are paired with assistant nodes by index.

use super::pair_positionally;
use crate::models::{Extraction, Turn};
use crate::page::{inner_text, select_within, text_content, Page};
use scraper::ElementRef;
use tracing::debug;

const ROLE_ATTR: &str = "data-message-author-role";
const MESSAGE_SELECTOR: &str = "div[data-message-author-role]";
const SHARED_USER_SELECTOR: &str = ".user-message-bubble-color";
const SHARED_ASSISTANT_SELECTOR: &str = "div[data-message-author-role='assistant']";

/// Extract turns from a saved ChatGPT conversation.
///
/// # Arguments
///
/// * `page` - Saved conversation page
///
/// # Returns
///
/// The turns in page order, titled with the document `<title>`.
pub fn extract(page: &Page) -> Extraction {
    let shared_users = page.select_all(SHARED_USER_SELECTOR);
    let turns = if shared_users.is_empty() {
        group_by_role(&page.select_all(MESSAGE_SELECTOR))
    } else {
        debug!(users = shared_users.len(), "Shared conversation layout");
        let queries = shared_users.into_iter().map(text_content).collect();
        let answers = page
            .select_all(SHARED_ASSISTANT_SELECTOR)
            .into_iter()
            .map(text_content)
            .collect();
        pair_positionally(queries, answers)
    };
    Extraction::new(turns, page.title())
}

fn is_user(node: &ElementRef<'_>) -> bool {
    node.value().attr(ROLE_ATTR) == Some("user")
}

fn user_text(node: ElementRef<'_>) -> String {
    match select_within(node, ".whitespace-pre-wrap") {
        Some(pre_wrap) => inner_text(pre_wrap),
        None => text_content(node),
    }
}

/// Each user node opens a group; following non-user nodes merge into one reply.
fn group_by_role(nodes: &[ElementRef<'_>]) -> Vec<Turn> {
    let mut turns = Vec::new();
    let mut i = 0;
    while i < nodes.len() {
        if !is_user(&nodes[i]) {
            i += 1;
            continue;
        }
        turns.extend(Turn::user(&user_text(nodes[i])));
        i += 1;

        let mut fragments = Vec::new();
        while i < nodes.len() && !is_user(&nodes[i]) {
            let text = text_content(nodes[i]);
            let text = text.trim();
            if !text.is_empty() {
                fragments.push(text.to_string());
            }
            i += 1;
        }
        turns.extend(Turn::assistant(&fragments.join("\n\n")));
    }
    turns
}
