//! Provider selection
//!
//! Credentials are read once from the environment into a
//! [`ProviderConfig`], which then builds the shared backend.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    AnthropicBackend, AzureOpenAIBackend, CohereBackend, GeminiBackend, GenerateOptions,
    LlmError, OpenAIBackend, SharedBackend,
};

/// Default Azure OpenAI API version
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-12-01-preview";

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    AzureOpenAI,
    Anthropic,
    Gemini,
    Cohere,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::OpenAI,
        Provider::AzureOpenAI,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::Cohere,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::AzureOpenAI => "azure-openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Cohere => "cohere",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "azure" | "azure-openai" | "azure_openai" => Ok(Self::AzureOpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            "cohere" => Ok(Self::Cohere),
            other => Err(LlmError::Config(format!(
                "Unknown provider '{}'. Supported: {}",
                other,
                Provider::ALL.map(|p| p.as_str()).join(", ")
            ))),
        }
    }
}

/// Resolved provider settings, one variant per provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        base_url: Option<String>,
        model: String,
    },
    AzureOpenAI {
        api_key: String,
        endpoint: String,
        api_version: String,
        deployment: String,
    },
    Anthropic {
        api_key: String,
        model: String,
    },
    Gemini {
        api_key: String,
        model: String,
    },
    Cohere {
        api_key: String,
        model: String,
    },
}

impl ProviderConfig {
    /// Read credentials for `provider` from the process environment
    pub fn from_env(provider: Provider, model: &str) -> Result<Self, LlmError> {
        Self::from_lookup(provider, model, |name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, treating blank values as unset
    pub fn from_lookup<F>(provider: Provider, model: &str, lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            optional(name).ok_or_else(|| {
                LlmError::Config(format!("{} is not set for provider {}", name, provider))
            })
        };
        let model = model.to_string();

        Ok(match provider {
            Provider::OpenAI => Self::OpenAI {
                api_key: required("OPENAI_API_KEY")?,
                base_url: optional("OPENAI_BASE_URL"),
                model,
            },
            Provider::AzureOpenAI => Self::AzureOpenAI {
                api_key: optional("AZURE_OPENAI_API_KEY")
                    .or_else(|| optional("AZURE_API_KEY"))
                    .ok_or_else(|| {
                        LlmError::Config(format!(
                            "AZURE_OPENAI_API_KEY is not set for provider {}",
                            provider
                        ))
                    })?,
                endpoint: required("AZURE_OPENAI_ENDPOINT")?,
                api_version: optional("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
                deployment: model,
            },
            Provider::Anthropic => Self::Anthropic {
                api_key: required("ANTHROPIC_API_KEY")?,
                model,
            },
            Provider::Gemini => Self::Gemini {
                api_key: required("GEMINI_API_KEY")?,
                model,
            },
            Provider::Cohere => Self::Cohere {
                api_key: required("COHERE_API_KEY")?,
                model,
            },
        })
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::OpenAI { .. } => Provider::OpenAI,
            Self::AzureOpenAI { .. } => Provider::AzureOpenAI,
            Self::Anthropic { .. } => Provider::Anthropic,
            Self::Gemini { .. } => Provider::Gemini,
            Self::Cohere { .. } => Provider::Cohere,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::AzureOpenAI { deployment, .. } => deployment,
            Self::OpenAI { model, .. }
            | Self::Anthropic { model, .. }
            | Self::Gemini { model, .. }
            | Self::Cohere { model, .. } => model,
        }
    }
}

/// Create the shared backend for a provider
pub fn create_backend(config: &ProviderConfig, options: GenerateOptions) -> SharedBackend {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => Arc::new(OpenAIBackend::new(api_key, base_url.as_deref(), model, options)),
        ProviderConfig::AzureOpenAI {
            api_key,
            endpoint,
            api_version,
            deployment,
        } => Arc::new(AzureOpenAIBackend::new(
            api_key,
            endpoint,
            api_version,
            deployment,
            options,
        )),
        ProviderConfig::Anthropic { api_key, model } => {
            Arc::new(AnthropicBackend::new(api_key, model, options))
        }
        ProviderConfig::Gemini { api_key, model } => {
            Arc::new(GeminiBackend::new(api_key, model, options))
        }
        ProviderConfig::Cohere { api_key, model } => {
            Arc::new(CohereBackend::new(api_key, model, options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!("Azure".parse::<Provider>().unwrap(), Provider::AzureOpenAI);
        assert_eq!("azure-openai".parse::<Provider>().unwrap(), Provider::AzureOpenAI);
        assert!(matches!(
            "mistral".parse::<Provider>(),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_openai_from_lookup() {
        let config = ProviderConfig::from_lookup(
            Provider::OpenAI,
            "gpt-4o-mini",
            env(&[("OPENAI_API_KEY", "sk-test")]),
        )
        .unwrap();

        assert_eq!(
            config,
            ProviderConfig::OpenAI {
                api_key: "sk-test".to_string(),
                base_url: None,
                model: "gpt-4o-mini".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_key_names_variable() {
        let err = ProviderConfig::from_lookup(Provider::Anthropic, "claude", env(&[])).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let blank = ProviderConfig::from_lookup(
            Provider::Gemini,
            "gemini-1.5-flash",
            env(&[("GEMINI_API_KEY", "  ")]),
        );
        assert!(blank.is_err());
    }

    #[test]
    fn test_azure_defaults_and_fallback_key() {
        let config = ProviderConfig::from_lookup(
            Provider::AzureOpenAI,
            "gpt-4o",
            env(&[
                ("AZURE_API_KEY", "az-key"),
                ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ]),
        )
        .unwrap();

        match &config {
            ProviderConfig::AzureOpenAI {
                api_key,
                api_version,
                deployment,
                ..
            } => {
                assert_eq!(api_key, "az-key");
                assert_eq!(api_version, DEFAULT_AZURE_API_VERSION);
                assert_eq!(deployment, "gpt-4o");
            }
            other => panic!("unexpected config {:?}", other),
        }
        assert_eq!(config.model(), "gpt-4o");
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let err = ProviderConfig::from_lookup(
            Provider::AzureOpenAI,
            "gpt-4o",
            env(&[("AZURE_OPENAI_API_KEY", "k")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_ENDPOINT"));
    }

    #[test]
    fn test_create_backend_reports_model() {
        let config = ProviderConfig::Cohere {
            api_key: "k".to_string(),
            model: "command-r".to_string(),
        };
        let backend = create_backend(&config, GenerateOptions::default());
        assert_eq!(backend.model_name(), "command-r");
        assert_eq!(config.provider(), Provider::Cohere);
    }
}
