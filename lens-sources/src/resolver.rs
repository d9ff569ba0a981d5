//! Resolver dispatch
//!
//! Routes a URL to the resolver for its source and bundles paper
//! resolution with profile scraping behind one acquisition interface.

use async_trait::async_trait;
use tracing::info;

use lens_core::{detect_source, PaperRecord, PaperSource, ResearcherProfile};
use lens_net::{FetchError, Fetcher};

use crate::{
    ArxivResolver, DoiResolver, Endpoints, ProfileScraper, SemanticScholarResolver, SourceError,
    WebPageResolver,
};

/// A source-specific strategy turning a URL into a paper record
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Source this resolver handles
    fn source(&self) -> PaperSource;

    /// Fetch and normalize the paper behind `url`
    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError>;
}

/// All paper resolvers, dispatched by source
#[derive(Debug, Clone)]
pub struct Resolvers {
    arxiv: ArxivResolver,
    semantic_scholar: SemanticScholarResolver,
    doi: DoiResolver,
    web: WebPageResolver,
}

impl Resolvers {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self {
            arxiv: ArxivResolver::new(fetcher.clone(), endpoints.clone()),
            semantic_scholar: SemanticScholarResolver::new(fetcher.clone(), endpoints.clone()),
            doi: DoiResolver::new(fetcher.clone(), endpoints),
            web: WebPageResolver::new(fetcher),
        }
    }

    /// Resolver responsible for `url`
    pub fn resolver_for(&self, url: &str) -> &dyn Resolver {
        match detect_source(url) {
            PaperSource::Arxiv => &self.arxiv,
            PaperSource::SemanticScholar => &self.semantic_scholar,
            PaperSource::Doi => &self.doi,
            PaperSource::Web | PaperSource::Text => &self.web,
        }
    }

    /// Resolve any supported URL; errors surface unchanged, with no
    /// fallback to generic page scraping
    pub async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        let url = url.trim();
        let resolver = self.resolver_for(url);
        info!("Resolving {} via {} resolver", url, resolver.source());
        resolver.resolve(url).await
    }
}

/// Everything the pipeline needs from the outside world
#[async_trait]
pub trait Acquisition: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError>;

    async fn fetch_profile(&self, url: &str) -> Result<ResearcherProfile, SourceError>;
}

/// Acquisition over live HTTP
#[derive(Debug, Clone)]
pub struct WebAcquisition {
    resolvers: Resolvers,
    scholar: ProfileScraper,
}

impl WebAcquisition {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints) -> Self {
        Self {
            resolvers: Resolvers::new(fetcher.clone(), endpoints.clone()),
            scholar: ProfileScraper::new(fetcher, endpoints),
        }
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Ok(Self::new(Fetcher::with_defaults()?, Endpoints::default()))
    }
}

#[async_trait]
impl Acquisition for WebAcquisition {
    async fn resolve(&self, url: &str) -> Result<PaperRecord, SourceError> {
        self.resolvers.resolve(url).await
    }

    async fn fetch_profile(&self, url: &str) -> Result<ResearcherProfile, SourceError> {
        self.scholar.fetch_profile(url).await
    }
}
