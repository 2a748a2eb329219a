use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assembly::{combine, parse_llm_response};
use crate::error::{ExtractError, Result};
use crate::extraction::{detect_among, rule_based_extract};
use crate::llm::prompts::{default_prompt, load_system_prompt};
use crate::llm::LlmDelegate;
use crate::types::{
    CombinedExtraction, Extraction, ExtractorConfig, ImagingReport, Modality, Study,
};

/// Extractor for a single imaging modality
///
/// Runs the LLM delegate when one is attached and falls back to the
/// modality's rule table when the delegate fails or replies with something
/// unusable.
pub struct ImagingExtractor {
    modality: Modality,
    delegate: Option<Arc<dyn LlmDelegate>>,
    system_prompt: String,
}

impl ImagingExtractor {
    /// Rule-based extractor with the built-in system prompt
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            delegate: None,
            system_prompt: default_prompt(modality),
        }
    }

    /// Attaches an LLM delegate as the primary strategy
    pub fn with_delegate(mut self, delegate: Arc<dyn LlmDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Extractor using the prompt directory of `config`
    ///
    /// The delegate is not built here; see [`ImagingOrchestrator::from_config`].
    pub fn from_config(modality: Modality, config: &ExtractorConfig) -> Self {
        Self::new(modality)
            .with_system_prompt(load_system_prompt(modality, config.prompts_dir.as_deref()))
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Returns true when the text mentions this modality
    pub fn is_present(&self, text: &str) -> bool {
        self.modality.is_present(text)
    }

    /// Extracts this modality's studies from `text`
    ///
    /// # Algorithm
    ///
    /// 1. Blank text, or text that never mentions the modality, yields `NoData`
    /// 2. With a delegate attached, its validated reply is returned as is
    /// 3. A delegate error or malformed reply is logged and the rule table runs
    ///    instead
    pub fn extract(&self, text: &str) -> Extraction<Study> {
        if text.trim().is_empty() {
            return Extraction::NoData;
        }
        if !self.is_present(text) {
            debug!("{} not mentioned", self.modality);
            return Extraction::NoData;
        }

        if let Some(delegate) = &self.delegate {
            match self.delegate_extract(delegate.as_ref(), text) {
                Ok(result) => return result,
                Err(e) => warn!(
                    "{} delegate failed, using rules instead: {}",
                    self.modality, e
                ),
            }
        }

        rule_based_extract(self.modality, text)
    }

    fn delegate_extract(&self, delegate: &dyn LlmDelegate, text: &str) -> Result<Extraction<Study>> {
        let reply = delegate.complete(&self.system_prompt, text)?;
        parse_llm_response(self.modality, &reply)
    }
}

/// Runs every enabled modality extractor over a clinical note
///
/// # Example
///
/// ```
/// use clinifind_core::{ImagingOrchestrator, Modality};
///
/// let orchestrator = ImagingOrchestrator::new();
/// let note = "ECHO 09/15/2024: LVEF 35%, mild MR";
///
/// assert_eq!(orchestrator.detect_modalities(note), vec![Modality::Echo]);
///
/// let report = orchestrator.extract_all(note);
/// let echo = report.get(Modality::Echo).unwrap();
/// assert_eq!(echo[0].date.to_string(), "2024-09-15");
/// assert_eq!(echo[0].finding("Ejection Fraction").unwrap().value, "35%");
///
/// assert!(orchestrator.extract_all("Routine visit.").is_not_found());
/// ```
pub struct ImagingOrchestrator {
    extractors: Vec<ImagingExtractor>,
}

impl Default for ImagingOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingOrchestrator {
    /// Rule-based orchestrator over all five modalities
    pub fn new() -> Self {
        Self {
            extractors: Modality::ALL.into_iter().map(ImagingExtractor::new).collect(),
        }
    }

    /// Builds the orchestrator described by `config`
    ///
    /// A provider that cannot be set up (for example a missing API key) is
    /// logged and the extractors run rule-based.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` when a provider is configured but the crate
    /// was built without the `providers` feature.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let extractors = config
            .enabled()
            .into_iter()
            .map(|m| ImagingExtractor::from_config(m, config))
            .collect();
        let orchestrator = Self { extractors };

        match Self::delegate_for(config)? {
            Some(delegate) => Ok(orchestrator.with_delegate(delegate)),
            None => Ok(orchestrator),
        }
    }

    #[cfg(feature = "providers")]
    fn delegate_for(config: &ExtractorConfig) -> Result<Option<Arc<dyn LlmDelegate>>> {
        match crate::llm::providers::delegate_from_config(config) {
            Ok(delegate) => Ok(delegate),
            Err(e) => {
                warn!("LLM provider unavailable, using rules only: {}", e);
                Ok(None)
            }
        }
    }

    #[cfg(not(feature = "providers"))]
    fn delegate_for(config: &ExtractorConfig) -> Result<Option<Arc<dyn LlmDelegate>>> {
        match config.provider {
            Some(provider) => Err(ExtractError::UnknownProvider(provider.to_string())),
            None => Ok(None),
        }
    }

    /// Attaches the same delegate to every extractor
    pub fn with_delegate(mut self, delegate: Arc<dyn LlmDelegate>) -> Self {
        self.extractors = self
            .extractors
            .into_iter()
            .map(|e| e.with_delegate(Arc::clone(&delegate)))
            .collect();
        self
    }

    /// Enabled modalities in canonical order
    pub fn available_modalities(&self) -> Vec<Modality> {
        self.extractors.iter().map(ImagingExtractor::modality).collect()
    }

    /// Looks up the extractor for a modality name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `UnknownModality` when the name is unknown or the modality is
    /// not enabled.
    pub fn extractor(&self, name: &str) -> Result<&ImagingExtractor> {
        name.parse::<Modality>()
            .ok()
            .and_then(|m| self.extractors.iter().find(|e| e.modality() == m))
            .ok_or_else(|| {
                ExtractError::unknown_modality(
                    name,
                    self.extractors.iter().map(|e| e.modality().code()),
                )
            })
    }

    /// Enabled modalities mentioned in `text`
    pub fn detect_modalities(&self, text: &str) -> Vec<Modality> {
        detect_among(text, &self.available_modalities())
    }

    /// Extracts every enabled modality
    ///
    /// Modalities without data are left out; when all are left out the
    /// report is `NotFound`.
    pub fn extract_all(&self, text: &str) -> ImagingReport {
        let mut found = BTreeMap::new();
        for extractor in &self.extractors {
            if let Extraction::Found(studies) = extractor.extract(text) {
                info!("{}: {} study(ies)", extractor.modality(), studies.len());
                found.insert(extractor.modality(), studies);
            }
        }
        ImagingReport::from_map(found)
    }

    /// Extracts a single modality by name
    ///
    /// # Errors
    ///
    /// Returns `UnknownModality` when the name is unknown or not enabled.
    pub fn extract_modality(&self, text: &str, name: &str) -> Result<Extraction<Study>> {
        Ok(self.extractor(name)?.extract(text))
    }

    /// Extracts every modality and merges the studies
    ///
    /// With `by_date` the studies are merged per date across modalities,
    /// otherwise they come back as one flat list. Both are most recent first.
    pub fn extract_combined(&self, text: &str, by_date: bool) -> CombinedExtraction {
        combine(&self.extract_all(text), by_date)
    }
}
