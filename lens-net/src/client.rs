//! HTTP client construction
//!
//! Creates the reqwest client shared by every fetch, carrying the fixed
//! browser-like header set.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Accept-Language sent with every request
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    /// Backoff base; attempt `n` (0-based) waits `base * 2^n`
    pub base_delay: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 5,
            base_delay: Duration::from_secs(3),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Errors from the fetch layer
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP 429 Too Many Requests from {url}")]
    RateLimited {
        url: String,
        retry_after: Option<u64>,
    },

    #[error("HTTP {status} server error from {url}")]
    Server { url: String, status: u16 },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the fetcher retries this kind of failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RateLimited { .. } | Self::Server { .. }
        )
    }
}

/// Fixed identifying headers applied to every request
pub fn default_headers(config: &FetchConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FetchError::ClientBuild(format!("invalid user agent: {}", e)))?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|e| FetchError::ClientBuild(format!("invalid accept-language: {}", e)))?,
    );
    Ok(headers)
}

/// Create the shared HTTP client
pub fn create_client(config: &FetchConfig) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(default_headers(config)?)
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}
