use thiserror::Error;

use crate::llm::ProviderError;

/// Result type for clinifind operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Error types for clinifind operations
///
/// Absence of data is never an error: extractors return
/// [`Extraction::NoData`](crate::types::Extraction::NoData) for that.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Caller asked for a modality that is unknown or not enabled
    #[error("Unknown modality: {name}. Available: {available}")]
    UnknownModality { name: String, available: String },

    /// Caller configured an LLM provider that has no adapter
    #[error("Unsupported provider: {0}")]
    UnknownProvider(String),

    /// LLM delegate failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// LLM reply was not JSON or lacked the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A vocabulary or rule pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ExtractError {
    /// Builds an `UnknownModality` error listing the modalities that would have been accepted
    pub fn unknown_modality<'a>(
        name: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        ExtractError::UnknownModality {
            name: name.to_string(),
            available: available.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_modality_message() {
        let err = ExtractError::unknown_modality("PET", ["ECHO", "CT"]);
        assert_eq!(err.to_string(), "Unknown modality: PET. Available: ECHO, CT");
    }

    #[test]
    fn test_provider_error_converts() {
        let err: ExtractError = ProviderError::MissingApiKey("OPENAI_API_KEY".to_string()).into();
        assert!(matches!(err, ExtractError::Provider(_)));
    }
}
