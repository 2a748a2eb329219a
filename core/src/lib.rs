pub mod api;
pub mod assembly;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod types;

pub use api::{ImagingExtractor, ImagingOrchestrator};
pub use cli::report::TextReport;
pub use error::{ExtractError, Result};
pub use extraction::LabExtractor;
pub use llm::{LlmDelegate, MockDelegate, Provider, ProviderError};
pub use types::*;
