use std::sync::LazyLock;

use super::{finding, title_case, Catalogue, Rule};

pub(super) const PARAMETERS: Catalogue = &[
    (
        "Abdominal",
        &["liver echogenicity", "steatosis", "gallstones", "sludge", "CBD diameter", "cholecystitis", "splenomegaly", "ascites"],
    ),
    (
        "Renal",
        &["kidney size", "cortical echogenicity", "hydronephrosis", "renal stone", "renal cyst", "resistive index"],
    ),
    (
        "Pelvic",
        &["uterine size", "endometrial thickness", "ovarian cyst", "fibroid", "free fluid"],
    ),
    ("Thyroid", &["thyroid nodule", "TI-RADS", "cervical lymph node", "goiter"]),
    (
        "Vascular",
        &["DVT", "compressibility", "carotid stenosis", "plaque", "AAA diameter", "ankle-brachial index"],
    ),
    (
        "Obstetric",
        &["gestational age", "fetal heart rate", "amniotic fluid index", "placental position"],
    ),
];

/// Maps DVT wording onto negative/positive
fn dvt_value(raw: &str) -> String {
    let raw = raw.to_lowercase();
    match raw.as_str() {
        "no" | "none" | "negative" | "absent" | "without" | "compressible" | "patent" => {
            "negative".to_string()
        }
        "non-compressible" => "positive (non-compressible)".to_string(),
        _ => raw,
    }
}

pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::first("Gallstones")
            .pattern(
                r"\b(?:gallstones?|cholelithiasis)[: \t]*(present|multiple|single|none|no|absent|\d+\.?\d*\s*(?:cm|mm))\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(r"\bno\s+(?:gallstones?|cholelithiasis)\b", |name, _| {
                finding(name, "none")
            })
            .pattern(
                r"\bstones?\s+(?:in|within)\s+(?:the\s+)?gallbladder",
                |name, _| finding(name, "present"),
            ),
        Rule::first("CBD Diameter").pattern(
            r"\b(?:CBD|common\s+bile\s+duct)[^.\n]*?(\d+\.?\d*)\s*(mm|cm)\b",
            |name, c| finding(name, format!("{} {}", &c[1], &c[2])),
        ),
        Rule::first("Hydronephrosis")
            .pattern(
                r"\bhydronephrosis[: \t]*(mild|moderate|severe|grade\s*\d|none|no|absent|right|left|bilateral)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(mild|moderate|severe)\s+(?:(?:right|left|bilateral)\s+)?hydronephrosis\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(r"\bno\s+hydronephrosis\b", |name, _| finding(name, "none")),
        Rule::every("Kidney Size").pattern(
            r"\b(right|left)\s+kidney[^.\n]*?(\d+\.?\d*)\s*(cm|mm)\b",
            |_, c| {
                finding(
                    format!("{} Kidney Size", title_case(&c[1])),
                    format!("{} {}", &c[2], &c[3]),
                )
            },
        ),
        Rule::first("DVT")
            .pattern(
                r"\b(?:DVT|deep\s+vein\s+thrombosis)[: \t]*(present|positive|identified|acute|chronic|no|none|negative|absent)\b",
                |name, c| finding(name, dvt_value(&c[1])),
            )
            .pattern(
                r"\b(no|negative|without)\s+(?:evidence\s+(?:of|for)\s+)?(?:DVT|deep\s+vein\s+thrombosis)\b",
                |name, c| finding(name, dvt_value(&c[1])),
            )
            .pattern(
                r"\bveins?\s+(?:are\s+|is\s+)?(?:fully\s+)?(non-compressible|compressible|patent)\b",
                |name, c| finding(name, dvt_value(&c[1])),
            ),
        Rule::first("Thyroid Nodule").pattern(
            r"\bthyroid\s+nodule[^.\n]*?(\d+\.?\d*)\s*(cm|mm)\b",
            |name, c| finding(name, format!("{} {}", &c[1], &c[2])),
        ),
        Rule::first("TI-RADS").pattern(
            r"\b(?:TI-?RADS)[: \t]*(TR\d|\d)\b",
            |name, c| finding(name, &c[1]),
        ),
        Rule::first("Liver Echogenicity").pattern(
            r"\b(?:liver|hepatic)[^.\n]*\b(increased\s+echogenicity|steatosis|fatty\s+(?:liver|infiltration)|normal\s+echogenicity)",
            |name, c| finding(name, c[1].to_lowercase()),
        ),
        Rule::first("Ascites")
            .pattern(
                r"\b(?:ascites|free\s+fluid)[: \t]*(present|small|moderate|large|trace|none|no|absent)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(small|moderate|large|trace)\s+(?:amount\s+of\s+)?(?:ascites|free\s+fluid)",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(r"\bno\s+(?:ascites|free\s+fluid)\b", |name, _| {
                finding(name, "none")
            }),
    ]
});

#[cfg(test)]
mod tests {
    use super::super::extract_findings;
    use crate::types::{Finding, Modality};
    use rstest::rstest;

    fn value_of(text: &str, name: &str) -> Option<String> {
        extract_findings(Modality::Ultrasound, text)
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }

    #[rstest]
    #[case("Lower extremity venous Doppler: no DVT", "negative")]
    #[case("DVT: negative", "negative")]
    #[case("Veins are fully compressible", "negative")]
    #[case("Left femoral vein is non-compressible", "positive (non-compressible)")]
    #[case("DVT: acute", "acute")]
    fn test_dvt(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(value_of(text, "DVT").as_deref(), Some(expected));
    }

    #[test]
    fn test_ruq_findings() {
        let findings = extract_findings(
            Modality::Ultrasound,
            "RUQ ultrasound: gallstones present. CBD 4mm. Liver shows increased echogenicity.",
        );
        assert!(findings.contains(&Finding::new("Gallstones", "present")));
        assert!(findings.contains(&Finding::new("CBD Diameter", "4 mm")));
        assert!(findings.contains(&Finding::new("Liver Echogenicity", "increased echogenicity")));
    }

    #[test]
    fn test_renal_findings() {
        let findings = extract_findings(
            Modality::Ultrasound,
            "Renal US: Right kidney 11.2 cm, left kidney 10.8 cm. Mild hydronephrosis on the right.",
        );
        assert!(findings.contains(&Finding::new("Right Kidney Size", "11.2 cm")));
        assert!(findings.contains(&Finding::new("Left Kidney Size", "10.8 cm")));
        assert!(findings.contains(&Finding::new("Hydronephrosis", "mild")));
    }

    #[test]
    fn test_thyroid_findings() {
        let findings = extract_findings(
            Modality::Ultrasound,
            "Thyroid US: right thyroid nodule measuring 1.4 cm, TI-RADS 4.",
        );
        assert!(findings.contains(&Finding::new("Thyroid Nodule", "1.4 cm")));
        assert!(findings.contains(&Finding::new("TI-RADS", "4")));
    }

    #[test]
    fn test_stones_in_gallbladder() {
        assert_eq!(
            value_of("Stones within the gallbladder", "Gallstones").as_deref(),
            Some("present")
        );
    }
}
