//! The read-only source a run extracts from.
//!
//! A [`Page`] bundles the parsed document tree, the origin URL it was saved
//! from and, optionally, a flattened visible-text dump. Adapters only ever read
//! from it.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;
use url::Url;

/// Elements that start a new line in rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hr", "li", "main", "nav",
    "ol", "pre", "section", "summary", "table", "tbody", "thead", "tfoot", "tr", "ul",
];

/// Elements separated from their neighbours by a blank line.
const PARAGRAPH_ELEMENTS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A saved chat page.
pub struct Page {
    pub url: Url,
    pub document: Html,
    flat_text: Option<String>,
}

impl Page {
    /// Parse `html` as the document saved from `url`.
    pub fn new(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
            flat_text: None,
        }
    }

    /// Attach a flattened visible-text dump used instead of the rendered body text.
    pub fn with_flat_text(mut self, text: impl Into<String>) -> Self {
        self.flat_text = Some(text.into());
        self
    }

    /// All elements matching `css`, in document order.
    ///
    /// An unparsable selector matches nothing.
    pub fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(css) {
            Some(sel) => self.document.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `css`, in document order.
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = parse_selector(css)?;
        self.document.select(&sel).next()
    }

    /// Trimmed `<title>` text, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(|t| text_content(t).trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// The page's visible text: the attached dump, else the rendered `<body>`.
    pub fn visible_text(&self) -> String {
        if let Some(text) = &self.flat_text {
            return text.clone();
        }
        self.select_first("body")
            .map(inner_text)
            .unwrap_or_else(|| inner_text(self.document.root_element()))
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(css, error = %e, "Invalid selector; treating as no match");
            None
        }
    }
}

/// First descendant of `element` matching `css`.
pub fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = parse_selector(css)?;
    element.select(&sel).next()
}

/// Raw concatenated text of all descendant text nodes, markup ignored.
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Approximation of the text a browser renders for `element`.
///
/// Whitespace inside text runs collapses to single spaces (except under `<pre>`),
/// block elements start new lines, paragraphs and headings are separated by a
/// blank line, `<br>` breaks the line and hidden elements are skipped.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_children(element, false, &mut out);
    let lines: Vec<&str> = out.lines().map(str::trim_end).collect();
    crate::utils::collapse_blank_lines(&lines.join("\n"))
        .trim()
        .to_string()
}

fn render_children(element: ElementRef<'_>, in_pre: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(out, &text.text, in_pre),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let paragraph = PARAGRAPH_ELEMENTS.contains(&name);
                let block = paragraph || BLOCK_ELEMENTS.contains(&name);
                if paragraph {
                    break_lines(out, 2);
                } else if block {
                    break_lines(out, 1);
                }
                render_children(child_ref, in_pre || name == "pre", out);
                if paragraph {
                    break_lines(out, 2);
                } else if block {
                    break_lines(out, 1);
                }
            }
            _ => {}
        }
    }
}

fn push_text(out: &mut String, text: &str, in_pre: bool) {
    if in_pre {
        out.push_str(text);
        return;
    }
    let leading = text.starts_with(char::is_whitespace);
    for (i, word) in text.split_whitespace().enumerate() {
        if (i > 0 || leading) && needs_space(out) {
            out.push(' ');
        }
        out.push_str(word);
    }
    if text.ends_with(char::is_whitespace) && needs_space(out) {
        out.push(' ');
    }
}

fn needs_space(out: &str) -> bool {
    !out.is_empty() && !out.ends_with(['\n', ' '])
}

/// Make sure `out` ends with at least `count` newlines (nothing at the very start).
fn break_lines(out: &mut String, count: usize) {
    if out.is_empty() {
        return;
    }
    while out.ends_with(' ') {
        out.pop();
    }
    let present = out.chars().rev().take_while(|c| *c == '\n').count();
    for _ in present..count {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::new(Url::parse("https://chatgpt.com/c/1").unwrap(), html)
    }

    #[test]
    fn test_title_is_trimmed() {
        let p = page("<html><head><title>  My chat \n</title></head><body></body></html>");
        assert_eq!(p.title().as_deref(), Some("My chat"));
        assert_eq!(page("<html><body></body></html>").title(), None);
    }

    #[test]
    fn test_inner_text_breaks_blocks_and_paragraphs() {
        let p = page(
            "<body><div><p>First   para\n with wrap</p><p>Second</p><ul><li>one</li><li>two</li></ul>\
             <span>a</span> <b>b</b><br>c</div></body>",
        );
        let body = p.select_first("body").unwrap();
        assert_eq!(
            inner_text(body),
            "First para with wrap\n\nSecond\n\none\ntwo\na b\nc"
        );
    }

    #[test]
    fn test_inner_text_skips_hidden_and_keeps_pre() {
        let p = page("<body><script>var x = 1;</script><pre>fn main() {\n    run();\n}</pre></body>");
        let body = p.select_first("body").unwrap();
        assert_eq!(inner_text(body), "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_text_content_ignores_layout() {
        let p = page("<body><div id='x'><p>a</p><p>b</p></div></body>");
        let div = p.select_first("#x").unwrap();
        assert_eq!(text_content(div), "ab");
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let p = page("<body><p>x</p></body>");
        assert!(p.select_all("p[").is_empty());
        assert!(p.select_first("::nope(").is_none());
    }

    #[test]
    fn test_visible_text_prefers_dump() {
        let p = page("<body><p>rendered</p></body>");
        assert_eq!(p.visible_text(), "rendered");
        let p = p.with_flat_text("User\nhello");
        assert_eq!(p.visible_text(), "User\nhello");
    }
}
