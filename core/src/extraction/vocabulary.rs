use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::error::Result;

/// Lab aliases (lowercase) and their canonical names
///
/// Every canonical name is itself an alias of itself, so normalizing twice
/// is the same as normalizing once.
pub const LAB_ALIASES: &[(&str, &str)] = &[
    // Renal
    ("cr", "Creatinine"),
    ("creat", "Creatinine"),
    ("creatinine", "Creatinine"),
    ("serum creatinine", "Creatinine"),
    ("egfr", "eGFR"),
    ("estimated gfr", "eGFR"),
    ("gfr", "GFR"),
    ("bun", "BUN"),
    ("blood urea nitrogen", "BUN"),
    ("urea nitrogen", "BUN"),
    // Cardiac
    ("bnp", "BNP"),
    ("b-type natriuretic peptide", "BNP"),
    ("nt-probnp", "NT-proBNP"),
    ("ntprobnp", "NT-proBNP"),
    ("nt probnp", "NT-proBNP"),
    ("pro-bnp", "NT-proBNP"),
    ("hs-trop", "hs-Troponin"),
    ("hstrop", "hs-Troponin"),
    ("hs-troponin", "hs-Troponin"),
    ("hs troponin", "hs-Troponin"),
    ("high sensitivity troponin", "hs-Troponin"),
    ("troponin", "Troponin"),
    ("trop", "Troponin"),
    ("troponin i", "Troponin I"),
    ("trop i", "Troponin I"),
    ("troponin t", "Troponin T"),
    ("trop t", "Troponin T"),
    ("hscrp", "hsCRP"),
    ("hs-crp", "hsCRP"),
    ("hs crp", "hsCRP"),
    ("high sensitivity crp", "hsCRP"),
    ("crp", "CRP"),
    ("c-reactive protein", "CRP"),
    ("ck-mb", "CK-MB"),
    ("ckmb", "CK-MB"),
    ("ck mb", "CK-MB"),
    ("creatine kinase mb", "CK-MB"),
    // Hepatic
    ("alt", "ALT"),
    ("sgpt", "ALT"),
    ("alanine aminotransferase", "ALT"),
    ("alanine transaminase", "ALT"),
    ("ast", "AST"),
    ("sgot", "AST"),
    ("aspartate aminotransferase", "AST"),
    ("aspartate transaminase", "AST"),
    ("total bilirubin", "Total Bilirubin"),
    ("tbili", "Total Bilirubin"),
    ("t bili", "Total Bilirubin"),
    ("bilirubin total", "Total Bilirubin"),
    ("bilirubin", "Bilirubin"),
    ("direct bilirubin", "Direct Bilirubin"),
    ("indirect bilirubin", "Indirect Bilirubin"),
    ("alp", "ALP"),
    ("alkaline phosphatase", "ALP"),
    ("alk phos", "ALP"),
    // Electrolytes and metabolic
    ("na", "Sodium"),
    ("na+", "Sodium"),
    ("sodium", "Sodium"),
    ("k", "Potassium"),
    ("k+", "Potassium"),
    ("potassium", "Potassium"),
    ("cl", "Chloride"),
    ("chloride", "Chloride"),
    ("co2", "CO2"),
    ("bicarbonate", "Bicarbonate"),
    ("bicarb", "Bicarbonate"),
    ("hco3", "Bicarbonate"),
    ("ca", "Calcium"),
    ("ca++", "Calcium"),
    ("calcium", "Calcium"),
    ("mg", "Magnesium"),
    ("magnesium", "Magnesium"),
    ("phos", "Phosphorus"),
    ("phosphorus", "Phosphorus"),
    ("phosphate", "Phosphate"),
    ("glucose", "Glucose"),
    ("glu", "Glucose"),
    ("blood glucose", "Glucose"),
    ("fasting glucose", "Fasting Glucose"),
    ("fbg", "Fasting Glucose"),
    ("hba1c", "HbA1c"),
    ("a1c", "HbA1c"),
    ("hemoglobin a1c", "HbA1c"),
    ("glycated hemoglobin", "HbA1c"),
    ("glycohemoglobin", "HbA1c"),
    // Lipids
    ("ldl", "LDL"),
    ("ldl-c", "LDL"),
    ("ldl cholesterol", "LDL"),
    ("low density lipoprotein", "LDL"),
    ("hdl", "HDL"),
    ("hdl-c", "HDL"),
    ("hdl cholesterol", "HDL"),
    ("high density lipoprotein", "HDL"),
    ("tg", "Triglycerides"),
    ("trigs", "Triglycerides"),
    ("triglycerides", "Triglycerides"),
    ("cholesterol", "Cholesterol"),
    ("chol", "Cholesterol"),
    ("total cholesterol", "Total Cholesterol"),
    ("tc", "Total Cholesterol"),
    // Hematology
    ("hgb", "Hemoglobin"),
    ("hb", "Hemoglobin"),
    ("hemoglobin", "Hemoglobin"),
    ("haemoglobin", "Hemoglobin"),
    ("hct", "Hematocrit"),
    ("hematocrit", "Hematocrit"),
    ("wbc", "WBC"),
    ("white blood cells", "WBC"),
    ("white blood cell count", "WBC"),
    ("leukocytes", "WBC"),
    ("rbc", "RBC"),
    ("red blood cells", "RBC"),
    ("red blood cell count", "RBC"),
    ("erythrocytes", "RBC"),
    ("plt", "Platelets"),
    ("platelets", "Platelets"),
    ("platelet count", "Platelets"),
    ("mcv", "MCV"),
    ("mch", "MCH"),
    ("mchc", "MCHC"),
    ("rdw", "RDW"),
    ("mpv", "MPV"),
    // Coagulation
    ("pt", "PT"),
    ("prothrombin time", "PT"),
    ("inr", "INR"),
    ("ptt", "PTT"),
    ("partial thromboplastin time", "PTT"),
    ("aptt", "aPTT"),
    // Other chemistry
    ("albumin", "Albumin"),
    ("alb", "Albumin"),
    ("total protein", "Total Protein"),
    ("protein total", "Total Protein"),
    ("tp", "Total Protein"),
    ("uric acid", "Uric Acid"),
    ("ua", "Uric Acid"),
    ("tsh", "TSH"),
    ("thyroid stimulating hormone", "TSH"),
    ("t3", "T3"),
    ("t4", "T4"),
    ("free t4", "Free T4"),
    ("ft4", "Free T4"),
    ("free t3", "Free T3"),
    ("ft3", "Free T3"),
    ("iron", "Iron"),
    ("fe", "Iron"),
    ("ferritin", "Ferritin"),
    ("tibc", "TIBC"),
    ("transferrin", "Transferrin"),
    ("vitamin d", "Vitamin D"),
    ("vit d", "Vitamin D"),
    ("25-oh vitamin d", "Vitamin D"),
    ("vitamin b12", "Vitamin B12"),
    ("b12", "Vitamin B12"),
    ("folate", "Folate"),
    ("folic acid", "Folate"),
];

static LAB_VOCABULARY: LazyLock<VocabularyMatcher> = LazyLock::new(|| {
    VocabularyMatcher::new(LAB_ALIASES.iter().copied()).expect("lab vocabulary must compile")
});

/// One vocabulary term found in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermMatch<'t> {
    pub start: usize,
    pub end: usize,
    /// Matched text as written
    pub text: &'t str,
}

/// Finds vocabulary terms in text and maps them to canonical names
///
/// Candidates are every alias and every canonical name, tried longest first
/// so that "NT-proBNP" wins over "BNP". Terms must sit on word boundaries and
/// match case-insensitively.
pub struct VocabularyMatcher {
    canonical: HashMap<String, String>,
    pattern: Regex,
}

impl VocabularyMatcher {
    /// Builds a matcher from `(alias, canonical)` pairs
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut canonical = HashMap::new();
        let mut candidates: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();

        for (alias, name) in entries {
            canonical.insert(alias.trim().to_lowercase(), name.to_string());
            for term in [alias, name] {
                if seen.insert(term.to_lowercase()) {
                    candidates.push(term);
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let pattern = if candidates.is_empty() {
            // Never matches
            r"[^\s\S]".to_string()
        } else {
            let alternatives: Vec<String> = candidates.iter().map(|c| regex::escape(c)).collect();
            format!(r"\b(?:{})\b", alternatives.join("|"))
        };

        Ok(Self {
            canonical,
            pattern: RegexBuilder::new(&pattern).case_insensitive(true).build()?,
        })
    }

    /// Shared matcher over [`LAB_ALIASES`]
    pub fn lab() -> &'static VocabularyMatcher {
        &LAB_VOCABULARY
    }

    /// All non-overlapping terms in `text`, left to right
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<TermMatch<'t>> {
        self.pattern
            .find_iter(text)
            .map(|m| TermMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            })
            .collect()
    }

    /// Whether `text` contains any term
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Maps an alias to its canonical name
    ///
    /// Unknown names are returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use clinifind_core::extraction::VocabularyMatcher;
    ///
    /// let labs = VocabularyMatcher::lab();
    /// assert_eq!(labs.normalize("cr"), "Creatinine");
    /// assert_eq!(labs.normalize(" HS-CRP "), "hsCRP");
    /// assert_eq!(labs.normalize("Lactate"), "Lactate");
    /// ```
    pub fn normalize(&self, name: &str) -> String {
        self.canonical
            .get(&name.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Number of known aliases
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn first_term(text: &str) -> String {
        let labs = VocabularyMatcher::lab();
        let found = labs.find_all(text);
        labs.normalize(found[0].text)
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        let labs = VocabularyMatcher::lab();
        for (alias, _) in LAB_ALIASES {
            let once = labs.normalize(alias);
            assert_eq!(labs.normalize(&once), once, "alias {alias}");
        }
    }

    #[rstest]
    #[case("NT-proBNP 250 pg/mL", "NT-proBNP")]
    #[case("hs-CRP 3.2", "hsCRP")]
    #[case("Troponin I <0.01", "Troponin I")]
    #[case("serum creatinine 1.1", "Creatinine")]
    #[case("Total Bilirubin 0.8", "Total Bilirubin")]
    #[case("Hemoglobin A1c 6.8%", "HbA1c")]
    #[case("estimated GFR 55", "eGFR")]
    fn test_longest_alias_wins(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(first_term(text), expected);
    }

    #[test]
    fn test_terms_need_word_boundaries() {
        let labs = VocabularyMatcher::lab();
        // "pt" inside "patient" and "k" inside "weak" are not terms
        assert!(!labs.is_match("The patient feels weak"));
        assert!(labs.is_match("K 4.1"));
    }

    #[test]
    fn test_find_all_positions() {
        let text = "Cr 1.3, BUN 18";
        let found = VocabularyMatcher::lab().find_all(text);
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[1].start..found[1].end], "BUN");
    }

    #[test]
    fn test_custom_vocabulary() {
        let matcher = VocabularyMatcher::new([("lac", "Lactate"), ("lactic acid", "Lactate")]).unwrap();
        assert_eq!(matcher.len(), 2);
        let found = matcher.find_all("lactic acid 2.1, LAC 1.9");
        assert_eq!(found.len(), 2);
        assert_eq!(matcher.normalize(found[1].text), "Lactate");
    }

    #[test]
    fn test_empty_vocabulary_matches_nothing() {
        let matcher = VocabularyMatcher::new(std::iter::empty()).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.is_match("anything at all"));
    }
}
