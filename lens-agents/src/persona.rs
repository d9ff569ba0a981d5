//! Persona management for research agents
//!
//! Loads agent persona definitions from TOML files. The built-in personas
//! are embedded at compile time; a directory of TOML files can override
//! any of them by id.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::AgentError;

/// A persona definition loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub persona: PersonaMetadata,
    #[serde(default)]
    pub expertise: ExpertiseConfig,
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaMetadata {
    /// Agent name this persona backs (`translation`, `analysis`, ...)
    pub id: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpertiseConfig {
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    pub system: String,
}

fn default_enabled() -> bool {
    true
}

const EMBEDDED_PERSONAS: &[(&str, &str)] = &[
    ("translation.toml", include_str!("../prompts/translation.toml")),
    ("analysis.toml", include_str!("../prompts/analysis.toml")),
    ("researcher.toml", include_str!("../prompts/researcher.toml")),
    ("trend.toml", include_str!("../prompts/trend.toml")),
];

/// Registry of all loaded personas
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    personas: HashMap<String, Persona>,
}

impl PersonaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the built-in personas
    pub fn load_embedded() -> Result<Self, AgentError> {
        let mut registry = Self::new();
        for (file, toml_str) in EMBEDDED_PERSONAS {
            registry.register_toml(file, toml_str)?;
        }
        Ok(registry)
    }

    /// Load every `.toml` persona in a directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, AgentError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| AgentError::Persona(format!("{}: {}", dir.display(), e)))?;

        let mut registry = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|e| AgentError::Persona(format!("{}: {}", dir.display(), e)))?
                .path();

            if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| AgentError::Persona(format!("{}: {}", path.display(), e)))?;
                registry.register_toml(&path.display().to_string(), &content)?;
            }
        }

        Ok(registry)
    }

    /// Built-in personas with any in `dir` taking precedence
    pub fn embedded_with_overrides<P: AsRef<Path>>(dir: P) -> Result<Self, AgentError> {
        let mut registry = Self::load_embedded()?;
        registry.extend(Self::load_from_dir(dir)?);
        Ok(registry)
    }

    fn register_toml(&mut self, origin: &str, toml_str: &str) -> Result<(), AgentError> {
        let persona = toml::from_str::<Persona>(toml_str)
            .map_err(|e| AgentError::Persona(format!("{}: {}", origin, e)))?;
        if persona.persona.enabled {
            debug!("Loaded persona {} from {}", persona.persona.id, origin);
            self.register(persona);
        }
        Ok(())
    }

    /// Register a persona
    pub fn register(&mut self, persona: Persona) {
        self.personas.insert(persona.persona.id.clone(), persona);
    }

    /// Merge `other` into this registry, replacing personas with the same id
    pub fn extend(&mut self, other: PersonaRegistry) {
        self.personas.extend(other.personas);
    }

    /// Get a persona by ID
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.get(id)
    }

    /// List all persona IDs
    pub fn list_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.personas.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Count of loaded personas
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Persona {
    /// Get the system prompt
    pub fn system_prompt(&self) -> &str {
        &self.prompt.system
    }

    /// Check if this persona covers a domain
    pub fn covers_domain(&self, domain: &str) -> bool {
        self.expertise.domains.iter().any(|d| d == domain)
    }
}
