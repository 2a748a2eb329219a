//! Validation of study lists returned by an LLM delegate
//!
//! Replies are untrusted. Every field is re-read, dates go back through the
//! date normalizer, and findings are deduplicated before the usual
//! sort-and-mark step.

use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::latest::sort_and_mark_latest;
use crate::error::{ExtractError, Result};
use crate::extraction::normalize_date;
use crate::types::{Extraction, Finding, Modality, Study, StudyDate};

const NO_DATA_PHRASE: &str = "no data";

/// Parses a raw delegate reply into studies for `modality`
///
/// # Algorithm
///
/// 1. A reply mentioning "no data" anywhere (any case) is the sentinel
/// 2. The reply must be JSON, otherwise `MalformedResponse`
/// 3. An object with a `studies` key is unwrapped to that value; an object
///    with `findings` and a string `date` is treated as a single study
/// 4. An empty array is the sentinel
/// 5. Any other value, or an array without a single object entry, is
///    `MalformedResponse`
/// 6. Otherwise the array is validated with [`validate_and_clean`]
///
/// # Errors
///
/// Returns `ExtractError::MalformedResponse` when the reply is not JSON or
/// holds no study list.
pub fn parse_llm_response(modality: Modality, reply: &str) -> Result<Extraction<Study>> {
    if reply.trim().to_lowercase().contains(NO_DATA_PHRASE) {
        debug!("{} reply reports no data", modality);
        return Ok(Extraction::NoData);
    }

    let data: Value = serde_json::from_str(reply.trim()).map_err(|e| {
        ExtractError::MalformedResponse(format!("{} reply is not JSON: {}", modality, e))
    })?;

    let data = match data {
        Value::Object(mut object) => {
            if let Some(studies) = object.remove("studies") {
                studies
            } else if object.contains_key("findings")
                && object.get("date").is_some_and(Value::is_string)
            {
                Value::Array(vec![Value::Object(object)])
            } else {
                Value::Object(object)
            }
        }
        other => other,
    };

    match data {
        Value::Array(items) if items.is_empty() => {
            debug!("{} reply holds an empty study list", modality);
            Ok(Extraction::NoData)
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            Ok(validate_and_clean(modality, &items))
        }
        Value::Array(_) => Err(ExtractError::MalformedResponse(format!(
            "{} reply lists no study objects",
            modality
        ))),
        other => Err(ExtractError::MalformedResponse(format!(
            "{} reply holds no study list: {}",
            modality, other
        ))),
    }
}

/// Cleans a list of study-shaped JSON values
///
/// Non-object entries and findings are skipped. A finding needs both a name
/// and a value; each is read from `<modality>_name`, `finding_name` or `name`
/// (and the `_value` equivalents), first non-empty wins. Findings repeated
/// within a study (same name and value, ignoring case) are kept once. Studies
/// left without findings are dropped.
pub fn validate_and_clean(modality: Modality, items: &[Value]) -> Extraction<Study> {
    let name_keys = [
        format!("{}_name", modality.simple_name()),
        "finding_name".to_string(),
        "name".to_string(),
    ];
    let value_keys = [
        format!("{}_value", modality.simple_name()),
        "finding_value".to_string(),
        "value".to_string(),
    ];

    let mut studies = Vec::new();
    for item in items {
        let Value::Object(object) = item else {
            warn!("Skipping non-object {} study in reply", modality);
            continue;
        };

        let date = object
            .get("date")
            .and_then(Value::as_str)
            .map_or(StudyDate::NoData, normalize_date);
        let source_text = object
            .get("source_text")
            .and_then(Value::as_str)
            .map_or_else(|| format!("{} report", modality.code()), str::to_string);

        let mut seen = HashSet::new();
        let mut findings = Vec::new();
        for entry in object
            .get("findings")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            let Value::Object(entry) = entry else {
                continue;
            };
            let (Some(name), Some(value)) = (first_text(entry, &name_keys), first_text(entry, &value_keys))
            else {
                continue;
            };
            if seen.insert((name.to_lowercase(), value.to_lowercase())) {
                findings.push(Finding::new(name, value));
            }
        }

        if findings.is_empty() {
            debug!("Dropping {} study without findings", modality);
            continue;
        }
        studies.push(Study::new(modality, date, source_text, findings));
    }

    Extraction::from_vec(sort_and_mark_latest(studies))
}

/// First non-empty field among `keys`, with numbers and booleans stringified
fn first_text(object: &Map<String, Value>, keys: &[String]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(reply: &str) -> Extraction<Study> {
        parse_llm_response(Modality::Echo, reply).unwrap()
    }

    #[rstest]
    #[case("No Data")]
    #[case("\"No Data\"")]
    #[case("  no data found in this note ")]
    #[case("[]")]
    #[case("{\"studies\": []}")]
    fn test_sentinel_replies(#[case] reply: &str) {
        assert!(parse(reply).is_no_data());
    }

    #[rstest]
    #[case("{\"result\": \"ok\"}")]
    #[case("\"hello\"")]
    #[case("[1, 2, 3]")]
    #[case("{\"studies\": \"none\"}")]
    #[case("{}")]
    #[case("42")]
    fn test_json_without_study_list_is_malformed(#[case] reply: &str) {
        let err = parse_llm_response(Modality::Echo, reply).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = parse_llm_response(Modality::Ct, "Sure! Here are the findings:").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn test_studies_wrapper_and_aliases() {
        let reply = r#"{"studies": [
            {"date": "09/15/2024", "source_text": "TTE", "findings": [
                {"echo_name": "Ejection Fraction", "echo_value": "35%"},
                {"finding_name": "Mitral Regurgitation", "finding_value": "mild"},
                {"name": "LVEDD", "value": 5.8}
            ]}
        ]}"#;
        let studies = parse(reply).into_vec();
        assert_eq!(studies.len(), 1);
        let study = &studies[0];
        assert_eq!(study.date.to_string(), "2024-09-15");
        assert_eq!(study.source_text, "TTE");
        assert!(study.is_latest);
        assert_eq!(study.modality, Modality::Echo);
        assert_eq!(
            study.findings,
            vec![
                Finding::new("Ejection Fraction", "35%"),
                Finding::new("Mitral Regurgitation", "mild"),
                Finding::new("LVEDD", "5.8"),
            ]
        );
    }

    #[test]
    fn test_single_study_object_is_wrapped() {
        let reply = r#"{"date": "2024-03-02", "findings": [{"name": "LVH", "value": "mild"}]}"#;
        let studies = parse(reply).into_vec();
        assert_eq!(studies.len(), 1);
        assert_eq!(studies[0].source_text, "ECHO report");
    }

    #[test]
    fn test_dedupes_case_insensitively() {
        let reply = r#"[{"date": "2024-01-01", "findings": [
            {"name": "LVH", "value": "Mild"},
            {"name": "lvh", "value": "mild"},
            {"name": "LVH", "value": "moderate"}
        ]}]"#;
        let studies = parse(reply).into_vec();
        assert_eq!(
            studies[0].findings,
            vec![Finding::new("LVH", "Mild"), Finding::new("LVH", "moderate")]
        );
    }

    #[test]
    fn test_drops_invalid_entries_and_resorts() {
        let reply = r#"[
            "not a study",
            {"date": "2023-05-01", "findings": [{"name": "LVH", "value": "mild"}]},
            {"date": "2024-05-01", "findings": []},
            {"date": "2024-06-01", "findings": [{"name": "", "value": "x"}, "junk"]},
            {"findings": [{"name": "PASP", "value": "40 mmHg"}]},
            {"date": "2024-02-01", "findings": [{"name": "Ejection Fraction", "value": "55%"}]}
        ]"#;
        let studies = parse(reply).into_vec();
        let dates: Vec<String> = studies.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2023-05-01", "No Data"]);
        assert!(studies[0].is_latest);
        assert!(!studies[1].is_latest && !studies[2].is_latest);
    }

    #[test]
    fn test_all_studies_empty_is_no_data() {
        let reply = r#"[{"date": "2024-01-01", "findings": []}]"#;
        assert!(parse(reply).is_no_data());
    }
}
