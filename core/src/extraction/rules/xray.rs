use std::sync::LazyLock;

use super::{finding, pleural_effusion_rule, Catalogue, Rule};

pub(super) const PARAMETERS: Catalogue = &[
    (
        "Chest",
        &["cardiomegaly", "cardiac silhouette", "pulmonary edema", "vascular congestion", "consolidation", "pleural effusion", "pneumothorax", "atelectasis", "rib fracture"],
    ),
    (
        "Lines and tubes",
        &["ET tube", "NG tube", "central line", "PICC", "chest tube", "pacemaker"],
    ),
    ("Abdominal", &["bowel gas pattern", "obstruction", "ileus", "free air", "calcification"]),
    ("Skeletal", &["fracture", "dislocation", "alignment", "arthritis", "hardware"]),
];

pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::first("Cardiomegaly")
            .pattern(
                r"\bcardiomegaly[: \t]*(present|enlarged|stable|mild|moderate|severe|no|none|absent|normal)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(?:no|without)\s+(?:evidence\s+of\s+)?cardiomegaly\b",
                |name, _| finding(name, "none"),
            )
            .pattern(r"\b(?:enlarged|large)\s+(?:cardiac|heart)\b", |name, _| {
                finding(name, "present")
            })
            .pattern(
                r"\b(?:cardiac|heart)\s+(?:size|silhouette)\s+(?:is\s+)?(?:within\s+)?normal",
                |name, _| finding(name, "none"),
            )
            .pattern(r"\bcardiomegaly\b", |name, _| finding(name, "present")),
        Rule::first("Pulmonary Edema")
            .pattern(
                r"(?:pulmonary\s+)?(?:edema|vascular\s+congestion)[: \t]*(mild|moderate|severe|interstitial|alveolar|present|no|none)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(mild|moderate|severe|interstitial|alveolar)\s+(?:pulmonary\s+)?(?:edema|vascular\s+congestion)",
                |name, c| finding(name, c[1].to_lowercase()),
            ),
        Rule::first("Consolidation").pattern(
            r"\b(?:consolidation|infiltrate|opacity)[: \t]*(?:in\s+)?(?:the\s+)?((?:right|left|bilateral)(?:[ \t]+(?:upper|lower|middle))?(?:[ \t]+lobes?)?)",
            |name, c| finding(name, c[1].trim().to_lowercase()),
        ),
        pleural_effusion_rule(),
        Rule::first("Pneumothorax")
            .pattern(
                r"\b(?:pneumothorax|PTX)[: \t]*(small|moderate|large|tension|present|no|none|absent)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\bno\s+(?:evidence\s+of\s+)?(?:pneumothorax|PTX)\b",
                |name, _| finding(name, "none"),
            ),
        Rule::first("ET Tube Position").pattern(
            r"\b(?:ET\s+tube|ETT|endotracheal\s+tube)[^.\n]*\b(\d+\.?\d*\s*cm\s+(?:above|from)\s+(?:the\s+)?carina|appropriately?\s+positioned|high|low|in\s+good\s+position)\b",
            |name, c| finding(name, c[1].to_lowercase()),
        ),
        Rule::first("Fracture")
            .pattern(r"\b(?:no|without)\s+(?:acute\s+)?fractures?\b", |name, _| {
                finding(name, "none")
            })
            .pattern(
                r"\bfractures?[: \t]*(?:of\s+)?(?:the\s+)?(\w+(?:[ \t]+\w+)?(?:[ \t]+rib)?)",
                |name, c| finding(name, &c[1]),
            ),
    ]
});

#[cfg(test)]
mod tests {
    use super::super::extract_findings;
    use crate::types::{Finding, Modality};
    use rstest::rstest;

    fn value_of(text: &str, name: &str) -> Option<String> {
        extract_findings(Modality::Xray, text)
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }

    #[rstest]
    #[case("CXR: Cardiomegaly, mild pulmonary edema", "present")]
    #[case("Cardiomegaly: moderate", "moderate")]
    #[case("No cardiomegaly.", "none")]
    #[case("Enlarged cardiac silhouette", "present")]
    #[case("Heart size is normal", "none")]
    fn test_cardiomegaly(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(value_of(text, "Cardiomegaly").as_deref(), Some(expected));
    }

    #[test]
    fn test_edema_before_and_after() {
        assert_eq!(
            value_of("CXR: Cardiomegaly, mild pulmonary edema", "Pulmonary Edema").as_deref(),
            Some("mild")
        );
        assert_eq!(
            value_of("Pulmonary edema: interstitial", "Pulmonary Edema").as_deref(),
            Some("interstitial")
        );
    }

    #[test]
    fn test_chest_findings() {
        let findings = extract_findings(
            Modality::Xray,
            "Portable CXR: consolidation in the right lower lobe. No pneumothorax. ETT 4 cm above the carina.",
        );
        assert!(findings.contains(&Finding::new("Consolidation", "right lower lobe")));
        assert!(findings.contains(&Finding::new("Pneumothorax", "none")));
        assert!(findings.contains(&Finding::new("ET Tube Position", "4 cm above the carina")));
    }

    #[rstest]
    #[case("Fracture of the left 5th rib", "left 5th rib")]
    #[case("No acute fracture or dislocation.", "none")]
    #[case("Ribs intact without fractures.", "none")]
    fn test_fracture(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(value_of(text, "Fracture").as_deref(), Some(expected));
    }
}
