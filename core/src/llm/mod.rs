//! LLM delegate capability
//!
//! An extractor may hold a delegate as its primary strategy. Any
//! [`ProviderError`] it returns is logged by the extractor, which then falls
//! back to the rule tables.

pub mod prompts;
#[cfg(feature = "providers")]
pub mod providers;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ExtractError;

/// Errors raised by an LLM delegate
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Cannot reach provider at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider rejected credentials: {0}")]
    Auth(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Unreadable provider reply: {0}")]
    InvalidReply(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Capability to turn a system prompt and clinical text into a raw reply
///
/// The reply is expected to be JSON (or contain the phrase "no data") but the
/// caller re-validates it either way.
pub trait LlmDelegate: Send + Sync {
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ProviderError>;
}

impl<F> LlmDelegate for F
where
    F: Fn(&str, &str) -> Result<String, ProviderError> + Send + Sync,
{
    fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ProviderError> {
        self(system_prompt, user_text)
    }
}

/// Delegate that answers every request with the same reply
///
/// Useful for tests and offline runs.
pub struct MockDelegate {
    reply: String,
}

impl MockDelegate {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl LlmDelegate for MockDelegate {
    fn complete(&self, _system_prompt: &str, _user_text: &str) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }
}

/// Known LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn simple_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            _ => Err(ExtractError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
