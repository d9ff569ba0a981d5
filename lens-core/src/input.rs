//! Input routing
//!
//! Decides whether user input is a URL or raw paper text, and which
//! source resolver a URL belongs to.

use url::Url;

use crate::{PaperSource, ValidationError, SCHOLAR_HOST_MARKER, SCHOLAR_PROFILE_MARKER};

/// How a piece of user input should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Fetch and resolve it
    Url,
    /// Analyze it as pasted paper text
    Text,
}

impl InputKind {
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url)
    }
}

/// Domain markers checked in order against the URL host
pub static SOURCE_DOMAINS: &[(&str, PaperSource)] = &[
    ("arxiv.org", PaperSource::Arxiv),
    ("semanticscholar.org", PaperSource::SemanticScholar),
    ("doi.org", PaperSource::Doi),
];

/// A string is a URL iff it starts with `http://`, `https://` or `www.`
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("http://") || text.starts_with("https://") || text.starts_with("www.")
}

/// Whether a string points at a Google Scholar citations profile
pub fn is_scholar_profile_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(SCHOLAR_HOST_MARKER) && lower.contains(SCHOLAR_PROFILE_MARKER)
}

/// Classify user input as URL or raw text
pub fn classify(input: &str) -> InputKind {
    if is_url(input) {
        InputKind::Url
    } else {
        InputKind::Text
    }
}

/// Trim and give scheme-less input a scheme so it parses
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Lowercased host of a URL, if it parses
pub fn host_of(input: &str) -> Option<String> {
    Url::parse(&normalize_url(input))
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Pick the resolver for a URL; anything unrecognized is a generic web page
pub fn detect_source(input: &str) -> PaperSource {
    let input = input.trim();
    if input.starts_with("10.") {
        return PaperSource::Doi;
    }

    let host = host_of(input).unwrap_or_default();
    SOURCE_DOMAINS
        .iter()
        .find(|(marker, _)| host.contains(marker))
        .map(|(_, source)| *source)
        .unwrap_or(PaperSource::Web)
}

/// Reject input that is empty or out of bounds
pub fn validate_input(
    content: &str,
    min_length: usize,
    max_length: Option<usize>,
) -> Result<(), ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if trimmed.chars().count() < min_length {
        return Err(ValidationError::InputTooShort { min: min_length });
    }
    if let Some(max) = max_length {
        if content.chars().count() > max {
            return Err(ValidationError::InputTooLong { max });
        }
    }
    Ok(())
}
