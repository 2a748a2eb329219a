//! Result shapes returned by the extractors and the orchestrator
//!
//! Every shape serializes either to its list/map form or to a sentinel
//! (`"No Data"` or `{"status": "No imaging data found"}`), never to an empty
//! collection.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::date::NO_DATA;
use super::enums::Modality;
use super::study::{CombinedStudy, Study};
use crate::error::Result;

/// Status message used when no modality yields anything
pub const NO_IMAGING_STATUS: &str = "No imaging data found";

/// A non-empty list of results, or the "No Data" sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Found(Vec<T>),
    NoData,
}

impl<T> Extraction<T> {
    /// Wraps a list, collapsing an empty one to `NoData`
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Extraction::NoData
        } else {
            Extraction::Found(items)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Extraction::NoData)
    }

    /// Borrowed view of the items (empty for `NoData`)
    pub fn items(&self) -> &[T] {
        match self {
            Extraction::Found(items) => items,
            Extraction::NoData => &[],
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Extraction::Found(items) => items,
            Extraction::NoData => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Extraction::NoData
    }
}

impl<T: Serialize> Serialize for Extraction<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Extraction::Found(items) => items.serialize(serializer),
            Extraction::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

/// Per-modality studies, or a status marker when nothing was found
#[derive(Debug, Clone, PartialEq)]
pub enum ImagingReport {
    Found(BTreeMap<Modality, Vec<Study>>),
    NotFound,
}

impl ImagingReport {
    /// Builds a report, collapsing an empty map to `NotFound`
    pub fn from_map(map: BTreeMap<Modality, Vec<Study>>) -> Self {
        if map.is_empty() {
            ImagingReport::NotFound
        } else {
            ImagingReport::Found(map)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ImagingReport::NotFound)
    }

    /// Studies for one modality, if it produced any
    pub fn get(&self, modality: Modality) -> Option<&[Study]> {
        match self {
            ImagingReport::Found(map) => map.get(&modality).map(Vec::as_slice),
            ImagingReport::NotFound => None,
        }
    }

    /// Modalities present in the report, in canonical order
    pub fn modalities(&self) -> Vec<Modality> {
        match self {
            ImagingReport::Found(map) => map.keys().copied().collect(),
            ImagingReport::NotFound => Vec::new(),
        }
    }
}

impl Serialize for ImagingReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ImagingReport::Found(map) => map.serialize(serializer),
            ImagingReport::NotFound => {
                let mut status = serializer.serialize_map(Some(1))?;
                status.serialize_entry("status", NO_IMAGING_STATUS)?;
                status.end()
            }
        }
    }
}

/// Output of combined extraction
#[derive(Debug, Clone, PartialEq)]
pub enum CombinedExtraction {
    /// Studies merged by date across modalities
    ByDate(Vec<CombinedStudy>),
    /// All studies in one list, each keeping its own modality
    Flat(Vec<Study>),
    NoData,
}

impl CombinedExtraction {
    pub fn is_no_data(&self) -> bool {
        matches!(self, CombinedExtraction::NoData)
    }

    pub fn len(&self) -> usize {
        match self {
            CombinedExtraction::ByDate(studies) => studies.len(),
            CombinedExtraction::Flat(studies) => studies.len(),
            CombinedExtraction::NoData => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for CombinedExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CombinedExtraction::ByDate(studies) => studies.serialize(serializer),
            CombinedExtraction::Flat(studies) => studies.serialize(serializer),
            CombinedExtraction::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

/// JSON rendering shared by all result shapes
pub trait JsonOutput: Serialize {
    /// Compact JSON
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Two-space indented JSON
    fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: Serialize> JsonOutput for Extraction<T> {}
impl JsonOutput for ImagingReport {}
impl JsonOutput for CombinedExtraction {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finding, StudyDate};

    #[test]
    fn test_empty_list_collapses_to_no_data() {
        let extraction: Extraction<Study> = Extraction::from_vec(Vec::new());
        assert!(extraction.is_no_data());
        assert_eq!(extraction.to_json().unwrap(), "\"No Data\"");
    }

    #[test]
    fn test_not_found_status_object() {
        let report = ImagingReport::from_map(BTreeMap::new());
        assert!(report.is_not_found());
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"status":"No imaging data found"}"#
        );
    }

    #[test]
    fn test_report_keys_in_canonical_order() {
        let study = |m: Modality| {
            Study::new(m, StudyDate::NoData, m.report_label(), vec![Finding::new("x", "y")])
        };
        let mut map = BTreeMap::new();
        map.insert(Modality::Ct, vec![study(Modality::Ct)]);
        map.insert(Modality::Echo, vec![study(Modality::Echo)]);

        let report = ImagingReport::from_map(map);
        assert_eq!(report.modalities(), vec![Modality::Echo, Modality::Ct]);
        let json = report.to_json().unwrap();
        assert!(json.find("\"ECHO\"").unwrap() < json.find("\"CT\"").unwrap());
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let extraction = Extraction::Found(vec![Finding::new("EF", "35%")]);
        let pretty = extraction.to_json_pretty().unwrap();
        assert!(pretty.contains("\n  {\n    \"finding_name\": \"EF\""));
    }
}
