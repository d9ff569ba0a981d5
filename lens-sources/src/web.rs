//! Generic web page resolver

use async_trait::async_trait;
use tracing::debug;

use lens_core::{normalize_url, PaperRecord, PaperSource};
use lens_net::{extract_page, Fetcher};

use crate::{Resolver, SourceError, WEB_PAGE_MAX_CHARS};

const WEB_CONTAINERS: &[&str] = &["article", "main", "body"];

/// Best-effort resolver for any page no other resolver claims
#[derive(Debug, Clone)]
pub struct WebPageResolver {
    fetcher: Fetcher,
}

impl WebPageResolver {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Resolver for WebPageResolver {
    fn source(&self) -> PaperSource {
        PaperSource::Web
    }

    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        let url = normalize_url(url);
        let html = self.fetcher.get_text(&url).await?;
        let page = extract_page(&html, WEB_CONTAINERS, WEB_PAGE_MAX_CHARS);
        debug!("Extracted {} chars from {}", page.char_count, url);

        Ok(PaperRecord {
            title: page.title.unwrap_or_default(),
            authors: Vec::new(),
            abstract_text: String::new(),
            content: page.text,
            source: PaperSource::Web,
            url: Some(url),
        })
    }
}
