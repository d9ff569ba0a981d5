//! DeepLens Network Layer
//!
//! Provides the HTTP plumbing every source resolver builds on:
//! - Shared client with a fixed identifying header set
//! - GET with bounded exponential backoff on 429 / 5xx / transport errors
//! - HTML text extraction (element stripping, container choice, truncation)

pub mod client;
pub mod extract;
pub mod fetcher;

pub use client::*;
pub use extract::*;
pub use fetcher::*;
