//! Rule-based finding extraction
//!
//! Each modality carries a table of [`Rule`]s. A rule either takes the first
//! of several alternative patterns that matches, or reports every
//! non-overlapping match of a single pattern. Patterns are case-insensitive.

mod ct;
mod echo;
mod mri;
mod ultrasound;
mod xray;

use log::{debug, info};
use regex::{Captures, Regex, RegexBuilder};

use super::dates::first_date;
use crate::types::{Extraction, Finding, Modality, Study};

/// Parameter categories and the terms listed under each
pub type Catalogue = &'static [(&'static str, &'static [&'static str])];

/// Turns a match into a finding; receives the rule's name
pub type Render = fn(&'static str, &Captures<'_>) -> Option<Finding>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    First,
    Every,
}

/// One named finding rule
pub struct Rule {
    name: &'static str,
    alternatives: Vec<(Regex, Render)>,
    scan: Scan,
}

impl Rule {
    /// Rule that reports the first alternative that matches
    pub fn first(name: &'static str) -> Self {
        Self {
            name,
            alternatives: Vec::new(),
            scan: Scan::First,
        }
    }

    /// Rule that reports every match of its pattern
    pub fn every(name: &'static str) -> Self {
        Self {
            name,
            alternatives: Vec::new(),
            scan: Scan::Every,
        }
    }

    /// Adds an alternative pattern, tried in insertion order
    pub fn pattern(mut self, pattern: &str, render: Render) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("rule pattern must compile");
        self.alternatives.push((regex, render));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Appends this rule's findings for `text`
    pub fn apply(&self, text: &str, findings: &mut Vec<Finding>) {
        match self.scan {
            Scan::First => {
                let found = self.alternatives.iter().find_map(|(regex, render)| {
                    regex.captures(text).and_then(|caps| render(self.name, &caps))
                });
                if let Some(finding) = found {
                    debug!("Rule '{}' matched: {}", self.name, finding.value);
                    findings.push(finding);
                }
            }
            Scan::Every => {
                for (regex, render) in &self.alternatives {
                    findings.extend(
                        regex
                            .captures_iter(text)
                            .filter_map(|caps| render(self.name, &caps)),
                    );
                }
            }
        }
    }
}

impl Modality {
    /// Rule table for this modality
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Modality::Echo => echo::RULES.as_slice(),
            Modality::Ct => ct::RULES.as_slice(),
            Modality::Mri => mri::RULES.as_slice(),
            Modality::Xray => xray::RULES.as_slice(),
            Modality::Ultrasound => ultrasound::RULES.as_slice(),
        }
    }

    /// Parameter catalogue used to describe this modality to an LLM
    pub fn parameters(&self) -> Catalogue {
        match self {
            Modality::Echo => echo::PARAMETERS,
            Modality::Ct => ct::PARAMETERS,
            Modality::Mri => mri::PARAMETERS,
            Modality::Xray => xray::PARAMETERS,
            Modality::Ultrasound => ultrasound::PARAMETERS,
        }
    }
}

/// Runs every rule of `modality` over `text`, in table order
pub fn extract_findings(modality: Modality, text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in modality.rules() {
        rule.apply(text, &mut findings);
    }
    findings
}

/// Rule-based extraction for one modality
///
/// Produces at most one study: dated with the first date in the text, labelled
/// `"<MODALITY> report"` and marked latest. No findings means `NoData`.
pub fn rule_based_extract(modality: Modality, text: &str) -> Extraction<Study> {
    let findings = extract_findings(modality, text);
    if findings.is_empty() {
        debug!("No {} rule matched", modality);
        return Extraction::NoData;
    }

    info!("Rules found {} {} finding(s)", findings.len(), modality);
    let mut study = Study::new(modality, first_date(text), modality.report_label(), findings);
    study.is_latest = true;
    Extraction::Found(vec![study])
}

/// Wraps a finding for a render function
fn finding(name: impl Into<String>, value: impl Into<String>) -> Option<Finding> {
    Some(Finding::new(name, value))
}

/// Capture group `i`, if it took part in the match
fn group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str())
}

/// Lowercased capture group `i`, or `default`
fn lower_or(caps: &Captures<'_>, i: usize, default: &str) -> String {
    group(caps, i)
        .map(str::to_lowercase)
        .unwrap_or_else(|| default.to_string())
}

/// Capitalizes each whitespace-separated word
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses negative wording to "negative", otherwise lowercases
fn negative_or_lower(value: &str) -> String {
    let value = value.to_lowercase();
    match value.as_str() {
        "no" | "none" | "negative" | "absent" | "without" => "negative".to_string(),
        _ => value,
    }
}

/// Pleural effusion rule shared by chest CT and chest X-ray
fn pleural_effusion_rule() -> Rule {
    Rule::first("Pleural Effusion")
        .pattern(
            r"(?:pleural\s+)?effusions?[: \t]*(small|moderate|large|trace|minimal|bilateral|right|left|none|no)\b",
            |name, c| finding(name, c[1].to_lowercase()),
        )
        .pattern(
            r"\b(small|moderate|large|trace|minimal|bilateral)\s+(?:(?:bilateral|right|left)\s+)?(?:pleural\s+)?effusions?",
            |name, c| finding(name, c[1].to_lowercase()),
        )
        .pattern(r"\bno\s+(?:pleural\s+)?effusions?", |name, _| {
            finding(name, "none")
        })
}
