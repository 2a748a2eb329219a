use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::llm::Provider;
use crate::types::Modality;

/// Model requested from the provider when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// HTTP timeout for provider adapters, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for building an orchestrator
///
/// With no provider set every extractor runs rule-based only.
///
/// # Example
///
/// ```
/// use clinifind_core::{ExtractorConfig, Modality};
///
/// let config = ExtractorConfig::default()
///     .with_enabled_modalities(["echo", "CT"])
///     .unwrap()
///     .with_timeout_secs(30);
///
/// assert!(config.is_enabled(Modality::Echo));
/// assert!(!config.is_enabled(Modality::Mri));
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Modalities to run. `None` enables all of them.
    pub enabled_modalities: Option<HashSet<Modality>>,

    /// LLM provider used as the primary strategy
    pub provider: Option<Provider>,

    /// Model name passed to the provider
    pub model: String,

    /// Directory holding `<modality>_extraction.txt` prompt overrides
    pub prompts_dir: Option<PathBuf>,

    /// Provider request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            enabled_modalities: None,
            provider: None,
            model: DEFAULT_MODEL.to_string(),
            prompts_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ExtractorConfig {
    /// Rule-based configuration with every modality enabled
    ///
    /// # Example
    ///
    /// ```
    /// use clinifind_core::ExtractorConfig;
    ///
    /// let config = ExtractorConfig::all_modalities();
    /// assert_eq!(config.enabled().len(), 5);
    /// assert!(config.provider.is_none());
    /// ```
    pub fn all_modalities() -> Self {
        Self::default()
    }

    /// Builder: Restrict to the named modalities
    ///
    /// Names are matched case-insensitively. An unknown name fails with
    /// [`ExtractError::UnknownModality`](crate::ExtractError::UnknownModality).
    pub fn with_enabled_modalities<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let modalities = names
            .into_iter()
            .map(|name| name.as_ref().parse::<Modality>())
            .collect::<Result<HashSet<_>>>()?;
        self.enabled_modalities = Some(modalities);
        Ok(self)
    }

    /// Builder: Restrict to an already-typed set of modalities
    pub fn with_modalities(mut self, modalities: HashSet<Modality>) -> Self {
        self.enabled_modalities = Some(modalities);
        self
    }

    /// Builder: Set the LLM provider by name ("openai" or "anthropic")
    ///
    /// # Example
    ///
    /// ```
    /// use clinifind_core::{ExtractorConfig, Provider};
    ///
    /// let config = ExtractorConfig::default().with_provider("anthropic").unwrap();
    /// assert_eq!(config.provider, Some(Provider::Anthropic));
    /// assert!(ExtractorConfig::default().with_provider("ollama").is_err());
    /// ```
    pub fn with_provider(mut self, name: &str) -> Result<Self> {
        self.provider = Some(name.parse()?);
        Ok(self)
    }

    /// Builder: Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set the prompt override directory
    pub fn with_prompts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompts_dir = Some(dir.into());
        self
    }

    /// Builder: Set the provider timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Whether `modality` should be run
    pub fn is_enabled(&self, modality: Modality) -> bool {
        self.enabled_modalities
            .as_ref()
            .map_or(true, |set| set.contains(&modality))
    }

    /// Enabled modalities in canonical order
    pub fn enabled(&self) -> Vec<Modality> {
        Modality::ALL
            .into_iter()
            .filter(|m| self.is_enabled(*m))
            .collect()
    }
}
