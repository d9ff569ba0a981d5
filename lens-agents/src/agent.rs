//! Common agent interface

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::{LlmError, Persona, SharedBackend};

/// Errors from agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    /// Provider failure, passed through unchanged
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Unknown agent: {name}. Available agents: {available}")]
    UnknownAgent { name: String, available: String },

    #[error("Persona error: {0}")]
    Persona(String),
}

/// The four research agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentKind {
    Translation,
    Analysis,
    Researcher,
    Trend,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Translation,
        AgentKind::Analysis,
        AgentKind::Researcher,
        AgentKind::Trend,
    ];

    /// Registry name, also the persona id
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Analysis => "analysis",
            Self::Researcher => "researcher",
            Self::Trend => "trend",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| AgentError::UnknownAgent {
                name: s.to_string(),
                available: AgentKind::ALL.map(|k| k.name()).join(", "),
            })
    }
}

/// An agent that answers one prompt with one completion
#[async_trait]
pub trait LensAgent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Display name
    fn name(&self) -> &str;

    async fn invoke(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Agent whose system prompt comes from a persona
pub struct PersonaAgent {
    kind: AgentKind,
    persona: Persona,
    backend: SharedBackend,
}

impl PersonaAgent {
    pub fn new(kind: AgentKind, persona: Persona, backend: SharedBackend) -> Self {
        Self {
            kind,
            persona,
            backend,
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.persona.system_prompt()
    }
}

#[async_trait]
impl LensAgent for PersonaAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.persona.persona.name
    }

    async fn invoke(&self, prompt: &str) -> Result<String, AgentError> {
        debug!(
            "{} agent invoking {} ({} prompt chars)",
            self.kind,
            self.backend.model_name(),
            prompt.chars().count()
        );
        Ok(self.backend.generate(self.system_prompt(), prompt).await?)
    }
}
