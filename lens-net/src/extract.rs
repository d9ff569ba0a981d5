//! HTML text extraction
//!
//! Turns fetched pages into plain text: drops non-content elements, picks
//! the primary content container and flattens it to one text line per node.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use lens_core::TRUNCATION_MARKER;

/// Elements whose text never counts as page content
pub const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

/// Text extracted from a page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Page title (if found)
    pub title: Option<String>,
    /// Extracted text content
    pub text: String,
    /// Character count of `text` before truncation
    pub char_count: usize,
    /// Whether content was truncated
    pub truncated: bool,
}

/// Extract the `<title>` and the text of the first matching container.
/// `containers` are CSS selectors tried in order.
pub fn extract_page(html: &str, containers: &[&str], max_chars: usize) -> ExtractedPage {
    let document = Html::parse_document(html);
    let title = page_title(&document);

    let text = select_container(&document, containers)
        .map(flatten_text)
        .unwrap_or_default();

    let char_count = text.chars().count();
    let (text, truncated) = truncate_chars(&text, max_chars);

    ExtractedPage {
        title,
        text,
        char_count,
        truncated,
    }
}

/// Trimmed `<title>` text, if present and non-empty
pub fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// First element matching any selector, trying selectors in order
pub fn select_container<'a>(document: &'a Html, containers: &[&str]) -> Option<ElementRef<'a>> {
    containers.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).next()
    })
}

/// Each non-empty text node under `element`, trimmed, one per line.
/// Text inside a stripped element is skipped.
pub fn flatten_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for node_ref in element.descendants() {
        if let Node::Text(text_node) = node_ref.value() {
            let in_excluded = node_ref.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| STRIPPED_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            });

            if !in_excluded {
                let trimmed = text_node.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
    }

    parts.join("\n")
}

/// Elements that break text flow; inline markup between them joins as-is
const BLOCK_ELEMENTS: &[&str] = &[
    "jats:p", "jats:title", "jats:sec", "p", "div", "sec", "title", "br", "li", "h1", "h2",
    "h3", "h4",
];

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let block = BLOCK_ELEMENTS.contains(&child_el.value().name());
            if block {
                out.push(' ');
            }
            push_text(child_el, out);
            if block {
                out.push(' ');
            }
        }
    }
}

/// Plain text of an HTML (or JATS) fragment with whitespace collapsed.
/// Text nodes are concatenated; only block elements add a separator.
pub fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let mut text = String::new();
    push_text(document.root_element(), &mut text);
    normalize_whitespace(&text)
}

/// Cap `text` at `max_chars` characters, appending the truncation marker
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}{}", &text[..cut], TRUNCATION_MARKER), true),
        None => (text.to_string(), false),
    }
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
