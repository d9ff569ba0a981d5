//! DOI resolver backed by the Crossref works API

use async_trait::async_trait;
use serde::Deserialize;

use lens_core::{PaperRecord, PaperSource};
use lens_net::{html_to_text, Fetcher};

use crate::{Endpoints, Resolver, SourceError};

/// Bare DOI from a `doi.org` link or a raw `10.` string
pub fn extract_doi(input: &str) -> Result<String, SourceError> {
    let input = input.trim();
    let doi = match input.split_once("doi.org/") {
        Some((_, rest)) => rest,
        None => input,
    };
    let doi = doi.trim_matches('/');

    if doi.starts_with("10.") && doi.contains('/') {
        Ok(doi.to_string())
    } else {
        Err(SourceError::parse(format!("Cannot extract DOI from: {}", input)))
    }
}

/// Percent-encode each path segment of a DOI, keeping the separators
fn encode_doi_path(doi: &str) -> String {
    doi.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: Option<CrossrefWork>,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
}

impl CrossrefAuthor {
    fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.given.as_deref().unwrap_or_default(),
            self.family.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Resolver for DOIs
#[derive(Debug, Clone)]
pub struct DoiResolver {
    fetcher: Fetcher,
    endpoints: Endpoints,
}

impl DoiResolver {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }
}

#[async_trait]
impl Resolver for DoiResolver {
    fn source(&self) -> PaperSource {
        PaperSource::Doi
    }

    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        let doi = extract_doi(url)?;
        let api_url = format!("{}/{}", self.endpoints.crossref_api, encode_doi_path(&doi));

        let body = self.fetcher.get_text(&api_url).await?;
        let response: CrossrefResponse = serde_json::from_str(&body)?;
        let work = response
            .message
            .ok_or_else(|| SourceError::parse(format!("Crossref returned no work for DOI {}", doi)))?;

        let title = work.title.into_iter().next().unwrap_or_default();
        let authors = work
            .author
            .iter()
            .map(CrossrefAuthor::display_name)
            .filter(|name| !name.is_empty())
            .collect();
        let abstract_text = work
            .abstract_text
            .as_deref()
            .map(html_to_text)
            .unwrap_or_default();

        Ok(PaperRecord::abstract_only(
            title,
            authors,
            abstract_text,
            PaperSource::Doi,
            Some(format!("https://doi.org/{}", doi)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_net::FetchConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> DoiResolver {
        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(2),
        )
        .unwrap();
        DoiResolver::new(fetcher, Endpoints::mock(&server.uri()))
    }

    #[test]
    fn test_extract_doi() {
        assert_eq!(
            extract_doi("https://doi.org/10.1038/nature14539").unwrap(),
            "10.1038/nature14539"
        );
        assert_eq!(
            extract_doi("https://dx.doi.org/10.1145/3292500.3330701/").unwrap(),
            "10.1145/3292500.3330701"
        );
        assert_eq!(extract_doi("10.1038/nature14539").unwrap(), "10.1038/nature14539");
        assert!(extract_doi("https://doi.org/").is_err());
    }

    #[test]
    fn test_encode_doi_path_keeps_slashes() {
        assert_eq!(encode_doi_path("10.1002/(SICI)1097"), "10.1002/%28SICI%291097");
    }

    #[tokio::test]
    async fn test_resolve_crossref_work() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/10.1038/nature14539"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "message": {
                    "title": ["Deep learning", "Deep learning (alt)"],
                    "author": [
                        {"given": "Yann", "family": "LeCun"},
                        {"given": "Yoshua", "family": "Bengio"},
                        {"name": "Consortium"}
                    ],
                    "abstract": "<jats:p>Deep learning allows <i>computational</i> models.</jats:p>"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = resolver(&server)
            .resolve("https://doi.org/10.1038/nature14539")
            .await
            .unwrap();

        assert_eq!(record.title, "Deep learning");
        assert_eq!(record.authors, vec!["Yann LeCun", "Yoshua Bengio"]);
        assert_eq!(record.abstract_text, "Deep learning allows computational models.");
        assert_eq!(record.content, record.abstract_text);
        assert_eq!(record.url.as_deref(), Some("https://doi.org/10.1038/nature14539"));
    }

    #[tokio::test]
    async fn test_missing_message_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/10.1000/xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok"
            })))
            .mount(&server)
            .await;

        let err = resolver(&server).resolve("10.1000/xyz").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/10.1000/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = resolver(&server).resolve("10.1000/bad").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
