pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::Result;
use crate::types::ExtractorConfig;

/// Command-line arguments for clinifind
#[derive(Parser, Debug)]
#[command(name = "clinifind")]
#[command(about = "Extract imaging findings and lab values from clinical notes")]
#[command(version)]
pub struct Cli {
    /// Clinical note to read; standard input when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// What to extract
    #[arg(short, long, default_value = "imaging")]
    pub mode: Mode,

    /// Extract a single modality (ECHO, CT, MRI, XRAY, ULTRASOUND)
    #[arg(long, value_name = "NAME")]
    pub modality: Option<String>,

    /// Comma-separated modalities to enable
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub modalities: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// LLM provider used before the rule tables (openai, anthropic)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model requested from the provider
    #[arg(long)]
    pub model: Option<String>,

    /// Directory with <modality>_extraction.txt prompt overrides
    #[arg(long, value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Extractor configuration described by the flags
    ///
    /// # Errors
    ///
    /// Returns `UnknownModality` or `UnknownProvider` for unrecognized names.
    pub fn config(&self) -> Result<ExtractorConfig> {
        let mut config = ExtractorConfig::default();
        if !self.modalities.is_empty() {
            config = config.with_enabled_modalities(&self.modalities)?;
        }
        if let Some(provider) = &self.provider {
            config = config.with_provider(provider)?;
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.as_str());
        }
        if let Some(dir) = &self.prompts_dir {
            config = config.with_prompts_dir(dir.clone());
        }
        Ok(config)
    }
}

/// Extraction modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Studies per modality
    Imaging,
    /// Studies of all modalities merged by date
    Combined,
    /// Studies of all modalities in one date-sorted list
    Flat,
    /// Laboratory values grouped by date
    Labs,
    /// Modalities mentioned in the note
    Detect,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
