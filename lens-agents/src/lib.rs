//! DeepLens Agents
//!
//! LLM-backed research agents:
//! - **Translation**: plain-language rendering of papers and buzzwords
//! - **Analysis**: fundamental problem, research stage, industry demand
//! - **Researcher**: career pattern from a publication history
//! - **Trend**: obsolescence, hype and oversupply assessment
//!
//! ## Personas
//!
//! Each agent's name and system prompt come from a TOML persona in
//! `prompts/`. See [`persona::PersonaRegistry`] for loading and overrides.
//!
//! ## Providers
//!
//! [`provider::ProviderConfig`] selects OpenAI, Azure OpenAI, Anthropic,
//! Gemini or Cohere and builds the [`backend::SharedBackend`] every agent uses.

pub mod agent;
pub mod analysis;
pub mod backend;
pub mod persona;
pub mod provider;
pub mod registry;
pub mod researcher;
pub mod translation;
pub mod trend;

pub use agent::*;
pub use backend::*;
pub use persona::*;
pub use provider::*;
pub use registry::*;
pub use researcher::ResearcherPublications;
