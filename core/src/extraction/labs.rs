use log::{debug, info};
use std::collections::HashSet;
use std::ops::Range;

use super::dates::{find_dates, find_dates_with_reference, DateMatch};
use super::values::extract_value_span;
use super::vocabulary::VocabularyMatcher;
use crate::types::{Extraction, LabCollection, LabGroup, StudyDate};

/// Remainder length below which a dated line is a header
const HEADER_MAX_REMAINDER: usize = 10;

/// One lab value found in text, before grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabMention {
    pub date: StudyDate,
    pub name: String,
    pub value: String,
}

/// Extracts laboratory values and groups them by date
///
/// # Example
///
/// ```
/// use clinifind_core::LabExtractor;
///
/// let labs = LabExtractor::new();
/// let groups = labs.extract("10/05/2024: Cr 1.3 mg/dL, eGFR 62");
/// let group = &groups.items()[0];
/// assert_eq!(group.date.to_string(), "2024-10-05");
/// assert_eq!(group.lab("Creatinine").unwrap().lab_value, "1.3 mg/dL");
///
/// assert!(labs.extract("Patient feels well.").is_no_data());
/// ```
pub struct LabExtractor {
    vocabulary: &'static VocabularyMatcher,
    reference_year: Option<i32>,
}

impl Default for LabExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LabExtractor {
    /// Extractor over the built-in lab vocabulary
    pub fn new() -> Self {
        Self {
            vocabulary: VocabularyMatcher::lab(),
            reference_year: None,
        }
    }

    /// Uses a custom vocabulary
    pub fn with_vocabulary(mut self, vocabulary: &'static VocabularyMatcher) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Fixes the year used to resolve two-digit and missing years
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Canonical name for a lab alias
    pub fn normalize_lab_name(&self, name: &str) -> String {
        self.vocabulary.normalize(name)
    }

    /// Extracts lab groups from `text`, most recent first
    ///
    /// # Algorithm
    ///
    /// 1. Blank text yields `NoData`
    /// 2. Multi-line text runs the columnar pass, then adds narrative-pass
    ///    results that are not already present as the same date, name and value
    /// 3. Single-line text runs the narrative pass only
    /// 4. Results are grouped by date
    pub fn extract(&self, text: &str) -> Extraction<LabGroup> {
        if text.trim().is_empty() {
            return Extraction::NoData;
        }

        let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
        let mentions = if line_count > 1 {
            let mut mentions = self.extract_columnar(text);
            let mut seen: HashSet<LabMention> = mentions.iter().cloned().collect();
            for mention in self.extract_narrative(text) {
                if seen.insert(mention.clone()) {
                    mentions.push(mention);
                }
            }
            mentions
        } else {
            self.extract_narrative(text)
        };

        let mut collection = LabCollection::new();
        for mention in mentions {
            collection.add_result(mention.date, mention.name, mention.value);
        }
        info!(
            "Extracted labs for {} date group(s)",
            collection.len()
        );
        collection.into_extraction()
    }

    /// Line-oriented pass
    ///
    /// A line that is mostly a date sets the date for the lines after it. A
    /// dated line that also names labs uses its own date for that line only.
    pub fn extract_columnar(&self, text: &str) -> Vec<LabMention> {
        let mut mentions = Vec::new();
        let mut current = StudyDate::NoData;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let dates = self.find_dates(line);
            if let Some(first) = dates.first() {
                if self.is_header(line, first) {
                    current = StudyDate::Known(first.date);
                    debug!("Header line sets lab date {}", current);
                    continue;
                }
            }

            let line_date = dates
                .first()
                .map_or(current, |d| StudyDate::Known(d.date));
            mentions.extend(self.scan(line, line_date));
        }

        mentions
    }

    /// Whole-text pass: each date governs the text up to the next date
    pub fn extract_narrative(&self, text: &str) -> Vec<LabMention> {
        let dates = self.find_dates(text);
        let Some(first) = dates.first() else {
            return self.scan(text, StudyDate::NoData);
        };

        let mut mentions = self.scan(&text[..first.position], StudyDate::NoData);
        for (i, date) in dates.iter().enumerate() {
            let end = dates.get(i + 1).map_or(text.len(), |next| next.position);
            mentions.extend(self.scan(&text[date.position..end], StudyDate::Known(date.date)));
        }
        mentions
    }

    fn find_dates(&self, text: &str) -> Vec<DateMatch> {
        match self.reference_year {
            Some(year) => find_dates_with_reference(text, year),
            None => find_dates(text),
        }
    }

    fn is_header(&self, line: &str, date: &DateMatch) -> bool {
        let remainder = line.replace(date.raw.as_str(), "");
        let remainder = remainder
            .trim()
            .trim_start_matches(|c: char| c == ':' || c == '-' || c == '–' || c.is_whitespace());
        remainder.chars().count() < HEADER_MAX_REMAINDER || !self.vocabulary.is_match(remainder)
    }

    /// Reads every term and its value in `segment`
    ///
    /// A term starting inside the previous value's span is part of that value
    /// (the `mg` in `mg/dL`) and is skipped.
    fn scan(&self, segment: &str, date: StudyDate) -> Vec<LabMention> {
        let mut mentions = Vec::new();
        let mut consumed: Option<Range<usize>> = None;

        for term in self.vocabulary.find_all(segment) {
            if consumed.as_ref().is_some_and(|span| span.contains(&term.start)) {
                continue;
            }
            let Some(value) = extract_value_span(segment, term.end) else {
                continue;
            };
            consumed = Some(value.start..value.end);
            mentions.push(LabMention {
                date,
                name: self.vocabulary.normalize(term.text),
                value: value.text,
            });
        }

        mentions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extractor() -> LabExtractor {
        LabExtractor::new().with_reference_year(2026)
    }

    fn day(y: i32, m: u32, d: u32) -> StudyDate {
        StudyDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn values(group: &LabGroup) -> Vec<(&str, &str)> {
        group
            .labs
            .iter()
            .map(|l| (l.lab_name.as_str(), l.lab_value.as_str()))
            .collect()
    }

    #[test]
    fn test_two_dated_lines() {
        let text = "Labs from Oct 5 2024: Cr 1.3 mg/dL, eGFR 62, ALT 24 U/L.\nOn 9/30/24: hsCRP 5.6 mg/L, LDL 110 mg/dL.";
        let groups = extractor().extract(text).into_vec();
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].date, day(2024, 10, 5));
        assert_eq!(
            values(&groups[0]),
            vec![("Creatinine", "1.3 mg/dL"), ("eGFR", "62"), ("ALT", "24 U/L")]
        );
        assert_eq!(groups[1].date, day(2024, 9, 30));
        assert_eq!(values(&groups[1]), vec![("hsCRP", "5.6 mg/L"), ("LDL", "110 mg/dL")]);
    }

    #[test]
    fn test_columnar_headers() {
        let text = "10/05/2024\nCreatinine 1.3 mg/dL\nGFR 62\nALT 24 U/L\n\n09/30/2024\nHemoglobin 12.8 g/dL\nPlatelets 210";
        let groups = extractor().extract(text).into_vec();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, day(2024, 10, 5));
        assert_eq!(groups[0].lab("GFR").unwrap().lab_value, "62");
        assert_eq!(groups[0].labs.len(), 3);
        assert_eq!(groups[1].lab("Hemoglobin").unwrap().lab_value, "12.8 g/dL");
        assert_eq!(groups[1].lab("Platelets").unwrap().lab_value, "210");
    }

    #[test]
    fn test_inline_date_overrides_for_one_line() {
        let text = "10/01/2024: Creatinine 1.2 mg/dL\n10/05/2024: Creatinine 1.0 mg/dL";
        let groups = extractor().extract(text).into_vec();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, day(2024, 10, 5));
        assert_eq!(values(&groups[0]), vec![("Creatinine", "1.0 mg/dL")]);
        assert_eq!(values(&groups[1]), vec![("Creatinine", "1.2 mg/dL")]);
    }

    #[test]
    fn test_mixed_format() {
        let text = "Patient seen on 2024-10-01.\nLabs:\n- Creatinine: 1.1 mg/dL\n- eGFR: 72\n\nFollow-up labs from 10/15/2024 showed improvement: Cr 0.9 mg/dL, GFR 85.";
        let groups = extractor().extract(text).into_vec();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, day(2024, 10, 15));
        assert_eq!(values(&groups[0]), vec![("Creatinine", "0.9 mg/dL"), ("GFR", "85")]);
        assert_eq!(groups[1].date, day(2024, 10, 1));
        assert_eq!(values(&groups[1]), vec![("Creatinine", "1.1 mg/dL"), ("eGFR", "72")]);
    }

    #[test]
    fn test_undated_labs() {
        let groups = extractor().extract("Cr 1.2 mg/dL, BUN 18 mg/dL").into_vec();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].date.is_no_data());
        assert_eq!(values(&groups[0]), vec![("Creatinine", "1.2 mg/dL"), ("BUN", "18 mg/dL")]);
    }

    #[test]
    fn test_labs_before_first_date_are_undated() {
        let groups = extractor()
            .extract("Cr 1.2 mg/dL. Labs 10/05/2024: BUN 18")
            .into_vec();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, day(2024, 10, 5));
        assert_eq!(values(&groups[0]), vec![("BUN", "18")]);
        assert!(groups[1].date.is_no_data());
        assert_eq!(values(&groups[1]), vec![("Creatinine", "1.2 mg/dL")]);
    }

    #[test]
    fn test_unit_is_not_read_as_lab() {
        let groups = extractor().extract("Creatinine 1.2 mg/dL (ref: 0.6-1.2), eGFR 65 (>60 normal)").into_vec();
        assert_eq!(
            values(&groups[0]),
            vec![("Creatinine", "1.2 mg/dL"), ("eGFR", "65")]
        );
    }

    #[test]
    fn test_cardiac_markers() {
        let groups = extractor()
            .extract("NT-proBNP 1250 pg/mL, hs-CRP 3.2 mg/L, HbA1c 7.1%")
            .into_vec();
        assert_eq!(
            values(&groups[0]),
            vec![("NT-proBNP", "1250 pg/mL"), ("hsCRP", "3.2 mg/L"), ("HbA1c", "7.1%")]
        );
    }

    #[test]
    fn test_no_labs_is_no_data() {
        assert!(extractor().extract("").is_no_data());
        assert!(extractor().extract("   \n  ").is_no_data());
        assert!(extractor().extract("Patient feels well. No complaints.").is_no_data());
    }

    #[test]
    fn test_normalize_lab_name() {
        assert_eq!(extractor().normalize_lab_name("SGPT"), "ALT");
    }
}
