//! HTTP adapters for hosted LLM providers
//!
//! Both adapters use a blocking `reqwest` client with the configured timeout
//! and map transport failures onto [`ProviderError`].

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{LlmDelegate, Provider, ProviderError};
use crate::types::ExtractorConfig;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Builds the delegate described by `config`, reading the API key from the environment
///
/// Returns `Ok(None)` when no provider is configured.
pub fn delegate_from_config(
    config: &ExtractorConfig,
) -> Result<Option<Arc<dyn LlmDelegate>>, ProviderError> {
    let Some(provider) = config.provider else {
        return Ok(None);
    };
    let api_key = api_key(provider, |name| std::env::var(name).ok())?;
    let delegate: Arc<dyn LlmDelegate> = match provider {
        Provider::OpenAi => Arc::new(OpenAiDelegate::new(
            &api_key,
            &config.model,
            config.timeout_secs,
        )?),
        Provider::Anthropic => Arc::new(AnthropicDelegate::new(
            &api_key,
            &config.model,
            config.timeout_secs,
        )?),
    };
    debug!("Built {} delegate for model {}", provider, config.model);
    Ok(Some(delegate))
}

/// Looks up the provider's API key through `lookup`
fn api_key(
    provider: Provider,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ProviderError> {
    lookup(provider.api_key_env())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ProviderError::MissingApiKey(provider.api_key_env().to_string()))
}

fn build_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Unavailable(e.to_string()))
}

fn send_error(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> ProviderError {
    if e.is_connect() {
        ProviderError::Connection(base_url.to_string())
    } else if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::Unavailable(e.to_string())
    }
}

fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::Auth(body));
    }
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for /v1/chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-style chat completion delegate
pub struct OpenAiDelegate {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
    timeout_secs: u64,
}

impl OpenAiDelegate {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: build_client(timeout_secs)?,
            timeout_secs,
        })
    }

    /// Points the adapter at a compatible endpoint
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl LlmDelegate for OpenAiDelegate {
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| send_error(e, &self.base_url, self.timeout_secs))?;
        let parsed: ChatResponse = check_status(response)?
            .json()
            .map_err(|e| ProviderError::InvalidReply(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidReply("reply has no message content".to_string()))
    }
}

/// Request body for /v1/messages
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic-style messages delegate
pub struct AnthropicDelegate {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
    timeout_secs: u64,
}

impl AnthropicDelegate {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: build_client(timeout_secs)?,
            timeout_secs,
        })
    }

    /// Points the adapter at a compatible endpoint
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl LlmDelegate for AnthropicDelegate {
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            system: system_prompt,
            messages: vec![ChatMessage {
                role: "user",
                content: user_text,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| send_error(e, &self.base_url, self.timeout_secs))?;
        let parsed: MessagesResponse = check_status(response)?
            .json()
            .map_err(|e| ProviderError::InvalidReply(e.to_string()))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidReply("reply has no text block".to_string()))
    }
}
