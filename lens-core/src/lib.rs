//! DeepLens Core - record types and input routing
//!
//! This crate provides the foundational primitives:
//! - Normalized paper records produced by every source resolver
//! - Researcher profiles scraped from Google Scholar
//! - Input classification (URL vs. raw text, which source)
//! - Input validation errors

pub mod error;
pub mod input;
pub mod profile;
pub mod record;

pub use error::*;
pub use input::*;
pub use profile::*;
pub use record::*;

/// Host marker shared by every Google Scholar domain
pub const SCHOLAR_HOST_MARKER: &str = "scholar.google";

/// Path marker of a Scholar citations profile
pub const SCHOLAR_PROFILE_MARKER: &str = "citations";

/// Appended to any text cut short by a length cap
pub const TRUNCATION_MARKER: &str = "\n\n[... content truncated ...]";
