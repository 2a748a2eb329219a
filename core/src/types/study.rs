use serde::Serialize;

use super::date::StudyDate;
use super::enums::Modality;

/// A single named finding within a study
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    #[serde(rename = "finding_name")]
    pub name: String,
    #[serde(rename = "finding_value")]
    pub value: String,
}

impl Finding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One imaging study of a single modality
///
/// Serialized field order is `date, source_text, is_latest, modality, findings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Study {
    pub date: StudyDate,
    pub source_text: String,
    pub is_latest: bool,
    pub modality: Modality,
    pub findings: Vec<Finding>,
}

impl Study {
    /// Creates a study that is not yet marked latest
    pub fn new(
        modality: Modality,
        date: StudyDate,
        source_text: impl Into<String>,
        findings: Vec<Finding>,
    ) -> Self {
        Self {
            date,
            source_text: source_text.into(),
            is_latest: false,
            modality,
            findings,
        }
    }

    /// Looks up a finding by exact name
    pub fn finding(&self, name: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.name == name)
    }
}

/// A finding tagged with the modality it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedFinding {
    pub modality: Modality,
    pub finding_name: String,
    pub finding_value: String,
}

/// Studies of several modalities merged under one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedStudy {
    pub date: StudyDate,
    pub source_text: String,
    pub modalities: Vec<Modality>,
    pub is_latest: bool,
    pub findings: Vec<CombinedFinding>,
}

impl CombinedStudy {
    /// Starts an empty bucket for `date`
    pub fn empty(date: StudyDate) -> Self {
        Self {
            date,
            source_text: String::new(),
            modalities: Vec::new(),
            is_latest: false,
            findings: Vec::new(),
        }
    }

    /// Adds a study's findings, recording its modality once in first-seen
    /// order
    ///
    /// Source labels are left to the caller, which sees every study of the
    /// bucket before joining them.
    pub fn absorb(&mut self, study: &Study) {
        if !self.modalities.contains(&study.modality) {
            self.modalities.push(study.modality);
        }
        self.findings
            .extend(study.findings.iter().map(|f| CombinedFinding {
                modality: study.modality,
                finding_name: f.name.clone(),
                finding_value: f.value.clone(),
            }));
    }
}
