//! arXiv resolver
//!
//! Metadata always comes from the Atom API. Links using the `/html/` or
//! `/pdf/` forms additionally try the HTML rendering for full text.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, info};

use lens_core::{PaperRecord, PaperSource};
use lens_net::{extract_page, normalize_whitespace, Fetcher};

use crate::{
    Endpoints, Resolver, SourceError, ARXIV_HTML_MAX_CHARS, ARXIV_HTML_MIN_CHARS,
};

static ARXIV_PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"arxiv\.org/(?:abs|pdf|html)/([^\s?#]+)").unwrap());

static ARXIV_BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}\.\d{4,5}(?:v\d+)?)").unwrap());

/// Containers tried in order when extracting the HTML rendering
const ARXIV_CONTAINERS: &[&str] = &["article", "div.ltx_document", "main", "body"];

/// Path form of an arXiv link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArxivUrlFormat {
    Abs,
    Pdf,
    Html,
}

impl ArxivUrlFormat {
    pub fn detect(url: &str) -> Self {
        if url.contains("/html/") {
            Self::Html
        } else if url.contains("/pdf/") {
            Self::Pdf
        } else {
            Self::Abs
        }
    }

    /// Whether the HTML rendering is worth trying for this form
    pub fn wants_full_text(&self) -> bool {
        matches!(self, Self::Pdf | Self::Html)
    }
}

/// Extract the arXiv identifier from any abs/pdf/html link or bare ID
pub fn extract_arxiv_id(url: &str) -> Result<String, SourceError> {
    if let Some(caps) = ARXIV_PATH_ID.captures(url) {
        let raw = caps[1].trim_end_matches('/');
        let id = raw.strip_suffix(".pdf").unwrap_or(raw).trim_end_matches('/');
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    ARXIV_BARE_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| SourceError::parse(format!("Cannot extract arXiv ID from: {}", url)))
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    #[serde(default)]
    name: String,
}

/// Metadata of one arXiv paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
}

/// Parse the first entry of an Atom feed
pub fn parse_atom_entry(xml: &str, id: &str) -> Result<ArxivMetadata, SourceError> {
    let feed: AtomFeed = quick_xml::de::from_str(xml)?;
    let entry = feed
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::parse(format!("No arXiv entry found for ID {}", id)))?;

    Ok(ArxivMetadata {
        title: normalize_whitespace(&entry.title),
        authors: entry
            .authors
            .into_iter()
            .map(|a| normalize_whitespace(&a.name))
            .filter(|name| !name.is_empty())
            .collect(),
        summary: normalize_whitespace(&entry.summary),
    })
}

/// Resolver for arxiv.org links
#[derive(Debug, Clone)]
pub struct ArxivResolver {
    fetcher: Fetcher,
    endpoints: Endpoints,
}

impl ArxivResolver {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Title, authors and abstract from the Atom API
    pub async fn fetch_metadata(&self, id: &str) -> Result<ArxivMetadata, SourceError> {
        let url = format!(
            "{}?id_list={}",
            self.endpoints.arxiv_api,
            urlencoding::encode(id)
        );
        let body = self.fetcher.get_text(&url).await?;
        parse_atom_entry(&body, id)
    }

    /// Full text of the HTML rendering, or `None` when it is unavailable
    /// or too short to be the paper
    pub async fn fetch_html_content(&self, id: &str) -> Option<String> {
        let url = format!("{}/{}", self.endpoints.arxiv_html, id);

        let html = match self.fetcher.get_text(&url).await {
            Ok(html) => html,
            Err(e) => {
                info!("arXiv HTML rendering unavailable for {}: {}", id, e);
                return None;
            }
        };

        let page = extract_page(&html, ARXIV_CONTAINERS, ARXIV_HTML_MAX_CHARS);
        if page.char_count < ARXIV_HTML_MIN_CHARS {
            info!(
                "Discarding arXiv HTML for {}: {} chars is below the {} minimum",
                id, page.char_count, ARXIV_HTML_MIN_CHARS
            );
            return None;
        }

        info!(
            "Using arXiv HTML full text for {} ({} chars{})",
            id,
            page.char_count,
            if page.truncated { ", truncated" } else { "" }
        );
        Some(page.text)
    }
}

#[async_trait]
impl Resolver for ArxivResolver {
    fn source(&self) -> PaperSource {
        PaperSource::Arxiv
    }

    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        let id = extract_arxiv_id(url)?;
        let format = ArxivUrlFormat::detect(url);
        debug!("arXiv ID {} ({:?} link)", id, format);

        let metadata = self.fetch_metadata(&id).await?;
        let record = PaperRecord::abstract_only(
            metadata.title,
            metadata.authors,
            metadata.summary,
            PaperSource::Arxiv,
            Some(format!("https://arxiv.org/abs/{}", id)),
        );

        if !format.wants_full_text() {
            return Ok(record);
        }

        Ok(match self.fetch_html_content(&id).await {
            Some(text) => record.with_content(text),
            None => record,
        })
    }
}
