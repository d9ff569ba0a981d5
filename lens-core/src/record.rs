//! Normalized paper records
//!
//! Every resolver, whatever the upstream source, produces a [`PaperRecord`].
//! Records are built once per request and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a paper record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    Arxiv,
    SemanticScholar,
    Doi,
    Web,
    Text,
}

impl PaperSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arxiv => "arxiv",
            Self::SemanticScholar => "semantic_scholar",
            Self::Doi => "doi",
            Self::Web => "web",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paper fetched from any source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Full text when available, otherwise the abstract
    pub content: String,
    pub source: PaperSource,
    pub url: Option<String>,
}

impl PaperRecord {
    /// Record whose content is the abstract (no full text obtained)
    pub fn abstract_only(
        title: impl Into<String>,
        authors: Vec<String>,
        abstract_text: impl Into<String>,
        source: PaperSource,
        url: Option<String>,
    ) -> Self {
        let abstract_text = abstract_text.into();
        Self {
            title: title.into(),
            authors,
            content: abstract_text.clone(),
            abstract_text,
            source,
            url,
        }
    }

    /// Record wrapping raw pasted text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            authors: Vec::new(),
            abstract_text: String::new(),
            content: text.into(),
            source: PaperSource::Text,
            url: None,
        }
    }

    /// Replace the content with full text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether there is any non-whitespace content to analyze
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Whether the content is something other than the abstract
    pub fn is_full_text(&self) -> bool {
        self.content != self.abstract_text
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}
