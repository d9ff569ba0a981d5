//! Explicit agent registry
//!
//! Built once at startup and handed to the orchestrator. Tests swap in
//! doubles with [`AgentRegistry::with_agent`].

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::{AgentError, AgentKind, LensAgent, PersonaAgent, PersonaRegistry, SharedBackend};

/// Mapping from agent kind to agent
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentKind, Arc<dyn LensAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One persona-backed agent per kind, all sharing `backend`
    pub fn from_personas(
        personas: &PersonaRegistry,
        backend: SharedBackend,
    ) -> Result<Self, AgentError> {
        let mut registry = Self::new();
        for kind in AgentKind::ALL {
            let persona = personas.get(kind.name()).cloned().ok_or_else(|| {
                AgentError::Persona(format!("No persona defined for agent {}", kind))
            })?;
            registry.insert(Arc::new(PersonaAgent::new(kind, persona, backend.clone())));
        }

        info!(
            "Registered {} agents on {}",
            registry.agents.len(),
            backend.model_name()
        );
        Ok(registry)
    }

    /// Add or replace the agent for its kind
    pub fn insert(&mut self, agent: Arc<dyn LensAgent>) {
        self.agents.insert(agent.kind(), agent);
    }

    pub fn with_agent(mut self, agent: Arc<dyn LensAgent>) -> Self {
        self.insert(agent);
        self
    }

    /// Agent for a kind
    pub fn agent(&self, kind: AgentKind) -> Result<Arc<dyn LensAgent>, AgentError> {
        self.agents
            .get(&kind)
            .cloned()
            .ok_or_else(|| self.unknown(kind.name()))
    }

    /// Agent by registry name
    pub fn get(&self, name: &str) -> Result<Arc<dyn LensAgent>, AgentError> {
        match name.parse::<AgentKind>() {
            Ok(kind) => self.agent(kind),
            Err(_) => Err(self.unknown(name)),
        }
    }

    /// Registered agent names
    pub fn names(&self) -> Vec<&'static str> {
        self.agents.keys().map(|k| k.name()).collect()
    }

    fn unknown(&self, name: &str) -> AgentError {
        AgentError::UnknownAgent {
            name: name.to_string(),
            available: self.names().join(", "),
        }
    }
}
