use serde::Serialize;
use std::collections::HashMap;

use super::date::StudyDate;
use crate::assembly::sort_by_date_desc;
use super::outcome::Extraction;

/// One laboratory value under its canonical name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LabResult {
    pub lab_name: String,
    pub lab_value: String,
}

impl LabResult {
    pub fn new(lab_name: impl Into<String>, lab_value: impl Into<String>) -> Self {
        Self {
            lab_name: lab_name.into(),
            lab_value: lab_value.into(),
        }
    }
}

/// All lab results sharing one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabGroup {
    pub date: StudyDate,
    pub labs: Vec<LabResult>,
}

impl LabGroup {
    pub fn new(date: StudyDate) -> Self {
        Self {
            date,
            labs: Vec::new(),
        }
    }

    /// Looks up the first result with the given canonical name
    pub fn lab(&self, name: &str) -> Option<&LabResult> {
        self.labs.iter().find(|l| l.lab_name == name)
    }
}

/// Accumulates lab results and groups them by date
///
/// Results keep insertion order within a group. Groups come out most recent
/// first with the undated group last.
#[derive(Debug, Clone, Default)]
pub struct LabCollection {
    groups: HashMap<StudyDate, LabGroup>,
}

impl LabCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one result under `date`
    pub fn add_result(
        &mut self,
        date: StudyDate,
        lab_name: impl Into<String>,
        lab_value: impl Into<String>,
    ) {
        self.groups
            .entry(date)
            .or_insert_with(|| LabGroup::new(date))
            .labs
            .push(LabResult::new(lab_name, lab_value));
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct dates
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns the groups sorted by date, most recent first
    pub fn groups(&self) -> Vec<LabGroup> {
        let mut groups: Vec<LabGroup> = self.groups.values().cloned().collect();
        sort_by_date_desc(&mut groups);
        groups
    }

    /// Consumes the collection into the standard result shape
    pub fn into_extraction(self) -> Extraction<LabGroup> {
        Extraction::from_vec(self.groups())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> StudyDate {
        StudyDate::Known(NaiveDate::from_ymd_opt(2024, 10, d).unwrap())
    }

    #[test]
    fn test_groups_sorted_descending_with_no_data_last() {
        let mut labs = LabCollection::new();
        labs.add_result(StudyDate::NoData, "BUN", "18 mg/dL");
        labs.add_result(day(1), "Creatinine", "1.2 mg/dL");
        labs.add_result(day(5), "Creatinine", "1.0 mg/dL");

        let groups = labs.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].date, day(5));
        assert_eq!(groups[1].date, day(1));
        assert!(groups[2].date.is_no_data());
    }

    #[test]
    fn test_results_keep_insertion_order() {
        let mut labs = LabCollection::new();
        labs.add_result(day(5), "Creatinine", "1.3 mg/dL");
        labs.add_result(day(5), "eGFR", "62");

        let groups = labs.groups();
        assert_eq!(groups[0].labs[0].lab_name, "Creatinine");
        assert_eq!(groups[0].labs[1].lab_name, "eGFR");
        assert_eq!(groups[0].lab("eGFR").unwrap().lab_value, "62");
    }

    #[test]
    fn test_empty_collection_is_no_data() {
        assert!(LabCollection::new().into_extraction().is_no_data());
    }
}
