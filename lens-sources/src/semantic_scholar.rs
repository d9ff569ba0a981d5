//! Semantic Scholar resolver

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use lens_core::{PaperRecord, PaperSource};
use lens_net::Fetcher;

use crate::{Endpoints, Resolver, SourceError};

static SLUGGED_PAPER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"semanticscholar\.org/paper/[^/]*/([a-f0-9]+)").unwrap());

static PAPER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"semanticscholar\.org/paper/([a-f0-9]+)").unwrap());

/// Paper ID from `/paper/<slug>/<id>` or `/paper/<id>`
pub fn extract_paper_id(url: &str) -> Result<String, SourceError> {
    SLUGGED_PAPER_ID
        .captures(url)
        .or_else(|| PAPER_ID.captures(url))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            SourceError::parse(format!("Cannot extract Semantic Scholar ID from: {}", url))
        })
}

#[derive(Debug, Deserialize)]
struct GraphPaper {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
    #[serde(default)]
    authors: Vec<GraphAuthor>,
}

#[derive(Debug, Deserialize)]
struct GraphAuthor {
    #[serde(default)]
    name: Option<String>,
}

/// Resolver for semanticscholar.org paper pages
#[derive(Debug, Clone)]
pub struct SemanticScholarResolver {
    fetcher: Fetcher,
    endpoints: Endpoints,
}

impl SemanticScholarResolver {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }
}

#[async_trait]
impl Resolver for SemanticScholarResolver {
    fn source(&self) -> PaperSource {
        PaperSource::SemanticScholar
    }

    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        let id = extract_paper_id(url)?;
        let api_url = format!(
            "{}/paper/{}?fields=title,abstract,authors",
            self.endpoints.semantic_scholar_api, id
        );

        let body = self.fetcher.get_text(&api_url).await?;
        let paper: GraphPaper = serde_json::from_str(&body)?;

        let authors = paper
            .authors
            .into_iter()
            .filter_map(|a| a.name)
            .filter(|name| !name.trim().is_empty())
            .collect();

        Ok(PaperRecord::abstract_only(
            paper.title.unwrap_or_default(),
            authors,
            paper.abstract_text.unwrap_or_default(),
            PaperSource::SemanticScholar,
            Some(url.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_net::FetchConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> SemanticScholarResolver {
        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(2),
        )
        .unwrap();
        SemanticScholarResolver::new(fetcher, Endpoints::mock(&server.uri()))
    }

    #[test]
    fn test_extract_paper_id() {
        assert_eq!(
            extract_paper_id(
                "https://www.semanticscholar.org/paper/Attention-is-All-you-Need/204e3073870fae3d05bcbc2f6a8e263d9b72e776"
            )
            .unwrap(),
            "204e3073870fae3d05bcbc2f6a8e263d9b72e776"
        );
        assert_eq!(
            extract_paper_id("https://www.semanticscholar.org/paper/204e3073").unwrap(),
            "204e3073"
        );
    }

    #[test]
    fn test_extract_paper_id_failure() {
        let err = extract_paper_id("https://www.semanticscholar.org/author/Someone/123").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        assert!(err.to_string().starts_with("Cannot extract Semantic Scholar ID from:"));
    }

    #[tokio::test]
    async fn test_resolve_uses_abstract_as_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graph/v1/paper/abc123"))
            .and(query_param("fields", "title,abstract,authors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paperId": "abc123",
                "title": "Attention Is All You Need",
                "abstract": "The dominant sequence transduction models...",
                "authors": [
                    {"authorId": "1", "name": "Ashish Vaswani"},
                    {"authorId": "2", "name": "Noam Shazeer"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = "https://www.semanticscholar.org/paper/Attention/abc123";
        let record = resolver(&server).resolve(url).await.unwrap();

        assert_eq!(record.title, "Attention Is All You Need");
        assert_eq!(record.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(record.content, record.abstract_text);
        assert_eq!(record.source, PaperSource::SemanticScholar);
        assert_eq!(record.url.as_deref(), Some(url));
    }

    #[tokio::test]
    async fn test_null_abstract_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graph/v1/paper/def456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paperId": "def456",
                "title": "Untitled",
                "abstract": null,
                "authors": []
            })))
            .mount(&server)
            .await;

        let record = resolver(&server)
            .resolve("https://www.semanticscholar.org/paper/def456")
            .await
            .unwrap();

        assert!(record.abstract_text.is_empty());
        assert!(!record.has_content());
    }

    #[tokio::test]
    async fn test_missing_paper_surfaces_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graph/v1/paper/fff000"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve("https://www.semanticscholar.org/paper/fff000")
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Fetch(_)));
    }
}
