//! LLM backend abstraction
//!
//! Supports OpenAI-compatible APIs, Azure OpenAI, Anthropic Claude,
//! Google Gemini and Cohere.

use async_openai::{
    config::{AzureConfig, Config, OpenAIConfig},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// LLM backend errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited by {0}")]
    RateLimited(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// Sampling options for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Generic LLM backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion with explicit options
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError>;

    /// Options used by [`LlmBackend::generate`]
    fn options(&self) -> GenerateOptions {
        GenerateOptions::default()
    }

    /// Generate a completion with system prompt
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let options = self.options();
        self.generate_with(system, user, &options).await
    }

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Thread-safe reference to an LLM backend
pub type SharedBackend = Arc<dyn LlmBackend>;

fn chat_request(
    model: &str,
    system: &str,
    user: &str,
    options: &GenerateOptions,
) -> Result<CreateChatCompletionRequest, LlmError> {
    let messages = vec![
        ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| LlmError::Api(e.to_string()))?,
        ),
        ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| LlmError::Api(e.to_string()))?,
        ),
    ];

    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .temperature(options.temperature)
        .max_tokens(options.max_tokens)
        .build()
        .map_err(|e| LlmError::Api(e.to_string()))
}

async fn chat_completion<C: Config>(
    client: &Client<C>,
    request: CreateChatCompletionRequest,
) -> Result<String, LlmError> {
    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| LlmError::Api(e.to_string()))?;

    response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .ok_or(LlmError::EmptyResponse)
}

/// OpenAI-compatible LLM backend
pub struct OpenAIBackend {
    client: Client<OpenAIConfig>,
    model: String,
    options: GenerateOptions,
}

impl OpenAIBackend {
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        model: &str,
        options: GenerateOptions,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            options,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let request = chat_request(&self.model, system, user, options)?;
        chat_completion(&self.client, request).await
    }

    fn options(&self) -> GenerateOptions {
        self.options
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Azure OpenAI backend; the deployment name doubles as the model name
pub struct AzureOpenAIBackend {
    client: Client<AzureConfig>,
    deployment: String,
    options: GenerateOptions,
}

impl AzureOpenAIBackend {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        api_version: &str,
        deployment: &str,
        options: GenerateOptions,
    ) -> Self {
        let config = AzureConfig::new()
            .with_api_base(endpoint)
            .with_api_key(api_key)
            .with_api_version(api_version)
            .with_deployment_id(deployment);

        Self {
            client: Client::with_config(config),
            deployment: deployment.to_string(),
            options,
        }
    }
}

#[async_trait]
impl LlmBackend for AzureOpenAIBackend {
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let request = chat_request(&self.deployment, system, user, options)?;
        chat_completion(&self.client, request).await
    }

    fn options(&self) -> GenerateOptions {
        self.options
    }

    fn model_name(&self) -> &str {
        &self.deployment
    }
}

/// Send a JSON request and decode the JSON reply, classifying 429s
async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Api(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimited(provider.to_string()));
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(LlmError::Api(format!("{} API error {}: {}", provider, status, text)));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::Api(format!("{} returned invalid JSON: {}", provider, e)))
}

fn text_at(value: &serde_json::Value, pointer: &str) -> Result<String, LlmError> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(LlmError::EmptyResponse)
}

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const COHERE_API_BASE: &str = "https://api.cohere.com/v2";

/// Anthropic Claude backend
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    options: GenerateOptions,
}

impl AnthropicBackend {
    pub fn new(api_key: &str, model: &str, options: GenerateOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: ANTHROPIC_API_BASE.to_string(),
            options,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let request = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_body);

        let json = send_json("Anthropic", request).await?;
        text_at(&json, "/content/0/text")
    }

    fn options(&self) -> GenerateOptions {
        self.options
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Google Gemini backend
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    options: GenerateOptions,
}

impl GeminiBackend {
    pub fn new(api_key: &str, model: &str, options: GenerateOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            options,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "systemInstruction": {"parts": [{"text": system}]},
            "contents": [
                {"role": "user", "parts": [{"text": user}]}
            ],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens
            }
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Gemini request to {}", url);

        let request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body);

        let json = send_json("Gemini", request).await?;
        text_at(&json, "/candidates/0/content/parts/0/text")
    }

    fn options(&self) -> GenerateOptions {
        self.options
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Cohere chat backend
pub struct CohereBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    options: GenerateOptions,
}

impl CohereBackend {
    pub fn new(api_key: &str, model: &str, options: GenerateOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: COHERE_API_BASE.to_string(),
            options,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmBackend for CohereBackend {
    async fn generate_with(
        &self,
        system: &str,
        user: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens
        });

        let request = self
            .client
            .post(format!("{}/chat", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body);

        let json = send_json("Cohere", request).await?;
        text_at(&json, "/message/content/0/text")
    }

    fn options(&self) -> GenerateOptions {
        self.options
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
