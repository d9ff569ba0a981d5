//! Errors from source resolvers and the profile scraper

use lens_core::ValidationError;
use lens_net::FetchError;
use thiserror::Error;

/// Errors from resolving a paper or scraping a profile
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying fetch failed after the fetcher's own retries
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An expected identifier or field was not found
    #[error("{0}")]
    Parse(String),

    /// The site served a CAPTCHA challenge instead of content
    #[error("{0}")]
    Blocked(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SourceError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("Unexpected JSON response: {}", err))
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("Unexpected XML response: {}", err))
    }
}
