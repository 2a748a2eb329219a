use std::collections::HashMap;

use super::latest::sort_and_mark_latest;
use crate::types::{CombinedExtraction, CombinedStudy, ImagingReport, Study, StudyDate};

/// All studies of a report in one list, most recent first
///
/// Studies keep their per-modality order within a date; `is_latest` is
/// recomputed across the whole list.
pub fn flatten(report: &ImagingReport) -> Vec<Study> {
    let studies: Vec<Study> = report
        .modalities()
        .into_iter()
        .filter_map(|modality| report.get(modality))
        .flat_map(|studies| studies.iter().cloned())
        .collect();
    sort_and_mark_latest(studies)
}

/// Merges studies of different modalities that share a date
///
/// # Algorithm
///
/// 1. Bucket studies by date, in first-seen order
/// 2. Each bucket records its modalities and source labels once each and
///    tags every finding with the modality it came from
/// 3. Buckets are sorted most recent first and the first is marked latest
pub fn combine_by_date(studies: &[Study]) -> Vec<CombinedStudy> {
    let mut index: HashMap<StudyDate, usize> = HashMap::new();
    let mut buckets: Vec<(CombinedStudy, Vec<String>)> = Vec::new();

    for study in studies {
        let slot = *index.entry(study.date).or_insert_with(|| {
            buckets.push((CombinedStudy::empty(study.date), Vec::new()));
            buckets.len() - 1
        });
        let (bucket, labels) = &mut buckets[slot];
        bucket.absorb(study);

        let label = study.source_text.trim();
        if !label.is_empty() && !labels.iter().any(|seen| seen == label) {
            labels.push(label.to_string());
        }
    }

    let combined: Vec<CombinedStudy> = buckets
        .into_iter()
        .map(|(mut bucket, labels)| {
            bucket.source_text = labels.join(", ");
            bucket
        })
        .collect();
    sort_and_mark_latest(combined)
}

/// Builds the combined view of a report
///
/// `NotFound` reports and reports with no studies give `NoData`.
pub fn combine(report: &ImagingReport, by_date: bool) -> CombinedExtraction {
    let studies = flatten(report);
    if studies.is_empty() {
        return CombinedExtraction::NoData;
    }
    if by_date {
        CombinedExtraction::ByDate(combine_by_date(&studies))
    } else {
        CombinedExtraction::Flat(studies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finding, Modality};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn day(d: u32) -> StudyDate {
        StudyDate::Known(NaiveDate::from_ymd_opt(2024, 9, d).unwrap())
    }

    fn make_test_study(modality: Modality, date: StudyDate, name: &str, value: &str) -> Study {
        let mut study = Study::new(
            modality,
            date,
            modality.report_label(),
            vec![Finding::new(name, value)],
        );
        study.is_latest = true;
        study
    }

    fn sample_report() -> ImagingReport {
        let mut map = BTreeMap::new();
        map.insert(
            Modality::Echo,
            vec![make_test_study(Modality::Echo, day(15), "Ejection Fraction", "35%")],
        );
        map.insert(
            Modality::Ct,
            vec![make_test_study(Modality::Ct, day(14), "Pulmonary Embolism", "negative")],
        );
        map.insert(
            Modality::Xray,
            vec![make_test_study(Modality::Xray, day(15), "Cardiomegaly", "present")],
        );
        ImagingReport::from_map(map)
    }

    #[test]
    fn test_flatten_remarks_latest() {
        let flat = flatten(&sample_report());
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.iter().filter(|s| s.is_latest).count(), 1);
        assert_eq!(flat[0].modality, Modality::Echo);
        assert_eq!(flat[1].modality, Modality::Xray);
        assert_eq!(flat[2].date, day(14));
    }

    #[test]
    fn test_combine_by_date_groups_modalities() {
        let combined = combine_by_date(&flatten(&sample_report()));
        assert_eq!(combined.len(), 2);

        let first = &combined[0];
        assert_eq!(first.date, day(15));
        assert!(first.is_latest);
        assert_eq!(first.modalities, vec![Modality::Echo, Modality::Xray]);
        assert_eq!(first.source_text, "ECHO report, X-ray report");
        assert_eq!(first.findings.len(), 2);
        assert_eq!(first.findings[1].modality, Modality::Xray);
        assert_eq!(first.findings[1].finding_name, "Cardiomegaly");

        assert_eq!(combined[1].modalities, vec![Modality::Ct]);
        assert!(!combined[1].is_latest);
    }

    #[test]
    fn test_labels_containing_commas_are_kept() {
        let mut limited = make_test_study(Modality::Echo, day(15), "Ejection Fraction", "35%");
        limited.source_text = "TTE, limited".to_string();
        let mut repeat = make_test_study(Modality::Echo, day(15), "LVH", "mild");
        repeat.source_text = "limited".to_string();
        let mut again = make_test_study(Modality::Xray, day(15), "Cardiomegaly", "present");
        again.source_text = " limited ".to_string();

        let combined = combine_by_date(&[limited, repeat, again]);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].source_text, "TTE, limited, limited");
        assert_eq!(combined[0].findings.len(), 3);
    }

    #[test]
    fn test_undated_bucket_sorts_last() {
        let studies = vec![
            make_test_study(Modality::Mri, StudyDate::NoData, "ACL Status", "tear"),
            make_test_study(Modality::Ct, day(1), "Fracture", "rib"),
        ];
        let combined = combine_by_date(&studies);
        assert_eq!(combined[0].date, day(1));
        assert!(combined[1].date.is_no_data());
    }

    #[test]
    fn test_not_found_is_no_data() {
        assert_eq!(combine(&ImagingReport::NotFound, true), CombinedExtraction::NoData);
        assert_eq!(combine(&ImagingReport::NotFound, false), CombinedExtraction::NoData);
    }

    #[test]
    fn test_combine_modes() {
        let report = sample_report();
        assert!(matches!(combine(&report, true), CombinedExtraction::ByDate(ref v) if v.len() == 2));
        assert!(matches!(combine(&report, false), CombinedExtraction::Flat(ref v) if v.len() == 3));
    }
}
