//! DeepLens Sources
//!
//! Source-specific strategies that turn a URL into a normalized record:
//! - **arXiv**: Atom metadata API, optional full text from the HTML rendering
//! - **Semantic Scholar**: Graph API metadata
//! - **DOI**: Crossref works lookup
//! - **Web**: best-effort extraction from any page
//! - **Scholar**: researcher profile and publication table scraping

pub mod arxiv;
pub mod doi;
pub mod endpoints;
pub mod error;
pub mod resolver;
pub mod scholar;
pub mod semantic_scholar;
pub mod web;

pub use arxiv::*;
pub use doi::*;
pub use endpoints::*;
pub use error::*;
pub use resolver::*;
pub use scholar::*;
pub use semantic_scholar::*;
pub use web::*;

/// Minimum plain-text length for an arXiv HTML rendering to count as the paper
pub const ARXIV_HTML_MIN_CHARS: usize = 500;

/// Cap on arXiv HTML full text
pub const ARXIV_HTML_MAX_CHARS: usize = 30_000;

/// Cap on generic web page text
pub const WEB_PAGE_MAX_CHARS: usize = 15_000;
