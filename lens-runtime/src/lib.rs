//! DeepLens Runtime
//!
//! Sequences content acquisition with the research agents:
//! - **understand**: resolve a paper (or take raw text), translate, analyze
//! - **evaluate researcher**: scrape a Scholar profile, classify the career pattern
//! - Supplementary single-agent operations and a combined analysis
//!
//! Every workflow is fail-fast: the first error propagates and no partial
//! result is returned.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::*;
pub use pipeline::*;
pub use report::*;
