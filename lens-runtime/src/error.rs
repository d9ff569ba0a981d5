//! Pipeline errors and their classification

use std::fmt;
use thiserror::Error;

use lens_agents::{AgentError, LlmError};
use lens_core::ValidationError;
use lens_net::FetchError;
use lens_sources::SourceError;

/// Errors from an orchestration workflow
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Acquisition(#[from] SourceError),

    #[error("Could not extract any content from the input: {0}")]
    EmptyContent(String),

    #[error("No publications found for {name}")]
    NoPublications { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Coarse failure category, for callers deciding what to tell the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection or server failure that outlasted the retries
    TransientNetwork,
    /// HTTP 429 that outlasted the retries
    RateLimit,
    /// Non-429 4xx
    PermanentHttp,
    /// An expected identifier or field was missing
    Parse,
    /// CAPTCHA challenge
    Blocked,
    /// Bad input shape
    Validation,
    /// LLM provider failure
    Provider,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransientNetwork => "transient_network",
            Self::RateLimit => "rate_limit",
            Self::PermanentHttp => "permanent_http",
            Self::Parse => "parse",
            Self::Blocked => "blocked",
            Self::Validation => "validation",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fetch_kind(err: &FetchError) -> ErrorKind {
    match err {
        FetchError::RateLimited { .. } => ErrorKind::RateLimit,
        FetchError::Http { .. } | FetchError::ClientBuild(_) => ErrorKind::PermanentHttp,
        FetchError::Transport { .. }
        | FetchError::Server { .. }
        | FetchError::Body { .. } => ErrorKind::TransientNetwork,
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Acquisition(source) => match source {
                SourceError::Fetch(fetch) => fetch_kind(fetch),
                SourceError::Parse(_) => ErrorKind::Parse,
                SourceError::Blocked(_) => ErrorKind::Blocked,
                SourceError::Validation(_) => ErrorKind::Validation,
            },
            Self::EmptyContent(_) | Self::NoPublications { .. } | Self::Validation(_) => {
                ErrorKind::Validation
            }
            Self::Agent(AgentError::Llm(_)) => ErrorKind::Provider,
            Self::Agent(AgentError::UnknownAgent { .. } | AgentError::Persona(_)) => {
                ErrorKind::Validation
            }
        }
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        Self::Agent(AgentError::Llm(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failures_are_classified() {
        let limited: PipelineError = SourceError::Fetch(FetchError::RateLimited {
            url: "u".to_string(),
            retry_after: Some(10),
        })
        .into();
        assert_eq!(limited.kind(), ErrorKind::RateLimit);

        let missing: PipelineError = SourceError::Fetch(FetchError::Http {
            url: "u".to_string(),
            status: 404,
        })
        .into();
        assert_eq!(missing.kind(), ErrorKind::PermanentHttp);

        let down: PipelineError = SourceError::Fetch(FetchError::Server {
            url: "u".to_string(),
            status: 503,
        })
        .into();
        assert_eq!(down.kind(), ErrorKind::TransientNetwork);
    }

    #[test]
    fn test_other_failures_are_classified() {
        let blocked: PipelineError = SourceError::Blocked("captcha".to_string()).into();
        assert_eq!(blocked.kind(), ErrorKind::Blocked);
        assert_eq!(blocked.to_string(), "captcha");

        let parse: PipelineError = SourceError::parse("Cannot extract arXiv ID from: x").into();
        assert_eq!(parse.kind(), ErrorKind::Parse);

        let empty = PipelineError::NoPublications {
            name: "Ada".to_string(),
        };
        assert_eq!(empty.kind(), ErrorKind::Validation);
        assert_eq!(empty.to_string(), "No publications found for Ada");

        let provider: PipelineError = LlmError::EmptyResponse.into();
        assert_eq!(provider.kind(), ErrorKind::Provider);
        assert_eq!(provider.kind().to_string(), "provider");
    }
}
