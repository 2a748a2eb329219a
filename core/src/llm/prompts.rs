//! System prompts sent to the LLM delegate
//!
//! Each modality has a default prompt built from its parameter catalogue. A
//! file named `<modality>_extraction.txt` in the configured prompt directory
//! replaces it.

use log::{debug, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Modality;

const REPLY_FORMAT: &str = r#"{"studies": [{"date": "YYYY-MM-DD", "source_text": "short description", "is_latest": false, "findings": [{"finding_name": "name", "finding_value": "value"}]}]}"#;

/// Path of the override file for `modality` inside `dir`
pub fn prompt_path(dir: &Path, modality: Modality) -> PathBuf {
    dir.join(format!("{}_extraction.txt", modality.simple_name()))
}

/// Builds the built-in prompt for `modality`
pub fn default_prompt(modality: Modality) -> String {
    let code = modality.code();
    let mut prompt = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        prompt,
        "You extract structured {} findings from clinical text.",
        modality.description()
    );
    let _ = writeln!(
        prompt,
        "Identify every {code} study mentioned, group its findings by study date and reply with JSON."
    );
    prompt.push_str("\nFindings to look for:\n");
    for (category, terms) in modality.parameters() {
        let _ = writeln!(prompt, "- {}: {}", category, terms.join(", "));
    }
    prompt.push_str("\nRules:\n");
    let _ = writeln!(prompt, "- Report only {code} findings and ignore other modalities");
    prompt.push_str("- Match terms case-insensitively, including synonyms and abbreviations\n");
    prompt.push_str("- Write dates as YYYY-MM-DD\n");
    prompt.push_str("- Keep values and units exactly as written\n");
    let _ = writeln!(prompt, "- If the text has no {code} data, reply with \"No Data\"");
    prompt.push_str("\nReply with JSON of the form:\n");
    prompt.push_str(REPLY_FORMAT);
    prompt.push('\n');
    prompt
}

/// Loads the system prompt for `modality`
///
/// Uses `<dir>/<modality>_extraction.txt` when `dir` is given and the file is
/// readable, otherwise the built-in prompt.
pub fn load_system_prompt(modality: Modality, dir: Option<&Path>) -> String {
    let Some(dir) = dir else {
        return default_prompt(modality);
    };

    let path = prompt_path(dir, modality);
    if !path.is_file() {
        debug!("No prompt override at {}, using default", path.display());
        return default_prompt(modality);
    }

    match fs::read_to_string(&path) {
        Ok(prompt) => {
            debug!("Loaded {} prompt from {}", modality, path.display());
            prompt
        }
        Err(e) => {
            warn!("Failed to read {}: {}, using default prompt", path.display(), e);
            default_prompt(modality)
        }
    }
}
