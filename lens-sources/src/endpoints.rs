//! Upstream API locations
//!
//! Production values by default; tests point every base at a mock server.

/// Base URLs of every upstream the resolvers call
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// arXiv Atom metadata API (`?id_list=<id>` is appended)
    pub arxiv_api: String,
    /// arXiv HTML renderings (`/<id>` is appended)
    pub arxiv_html: String,
    /// Semantic Scholar Graph API root
    pub semantic_scholar_api: String,
    /// Crossref works endpoint (`/<doi>` is appended)
    pub crossref_api: String,
    /// Google Scholar origin
    pub scholar_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            arxiv_api: "http://export.arxiv.org/api/query".to_string(),
            arxiv_html: "https://arxiv.org/html".to_string(),
            semantic_scholar_api: "https://api.semanticscholar.org/graph/v1".to_string(),
            crossref_api: "https://api.crossref.org/works".to_string(),
            scholar_base: "https://scholar.google.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Every upstream served from one base URL, under fixed sub-paths
    pub fn mock(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            arxiv_api: format!("{}/api/query", base),
            arxiv_html: format!("{}/html", base),
            semantic_scholar_api: format!("{}/graph/v1", base),
            crossref_api: format!("{}/works", base),
            scholar_base: base.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_endpoints_share_base() {
        let endpoints = Endpoints::mock("http://127.0.0.1:4000/");
        assert_eq!(endpoints.arxiv_api, "http://127.0.0.1:4000/api/query");
        assert_eq!(endpoints.scholar_base, "http://127.0.0.1:4000");
    }
}
