use std::sync::LazyLock;

use super::{finding, group, lower_or, negative_or_lower, pleural_effusion_rule, title_case, Catalogue, Rule};

pub(super) const PARAMETERS: Catalogue = &[
    (
        "Head",
        &["intracranial hemorrhage", "subdural", "subarachnoid", "infarct", "midline shift", "hydrocephalus"],
    ),
    (
        "Chest",
        &["pulmonary nodule", "consolidation", "ground glass opacity", "pleural effusion", "pneumothorax", "pulmonary embolism", "lymphadenopathy"],
    ),
    (
        "Abdomen",
        &["liver lesion", "nephrolithiasis", "hydronephrosis", "appendicitis", "bowel obstruction", "free fluid"],
    ),
    ("Spine", &["fracture", "compression fracture", "disc herniation", "spinal stenosis"]),
    ("Vascular", &["stenosis", "occlusion", "aneurysm", "dissection"]),
    ("Measurements", &["size", "diameter", "Hounsfield units", "enhancement"]),
];

const LOBE: &str = r"\w+\s+\w+\s+lobe|\w+\s+lobe|RUL|RML|RLL|LUL|LLL";

/// "<size> <unit> <location>" with the location optional
fn nodule_value(size: &str, unit: &str, location: Option<&str>) -> String {
    format!("{} {} {}", size, unit, location.unwrap_or("")).trim().to_string()
}

pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::every("Pulmonary Nodule")
            .pattern(
                &format!(r"\b(?:pulmonary\s+)?nodules?[: \t]*(\d+\.?\d*)\s*(mm|cm)\b(?:\s+(?:in|at|within)\s+(?:the\s+)?({LOBE}))?"),
                |name, c| finding(name, nodule_value(&c[1], &c[2], group(c, 3))),
            )
            .pattern(
                &format!(r"\b(\d+\.?\d*)\s*(mm|cm)\s+(?:({LOBE})\s+)?(?:pulmonary\s+)?nodules?\b"),
                |name, c| finding(name, nodule_value(&c[1], &c[2], group(c, 3))),
            ),
        Rule::first("Pulmonary Embolism")
            .pattern(
                r"\b(?:pulmonary\s+embol(?:ism|us)|PE)\b[: \t]*(present|positive|identified|seen|acute|chronic|bilateral|right|left|segmental|subsegmental)\b",
                |name, c| finding(name, negative_or_lower(&c[1])),
            )
            .pattern(
                r"\b(no|negative|absent|without)\s+(?:evidence\s+(?:of|for)\s+)?(?:acute\s+)?(?:pulmonary\s+embol|PE\b)",
                |name, c| finding(name, negative_or_lower(&c[1])),
            ),
        pleural_effusion_rule(),
        Rule::first("Hemorrhage").pattern(
            r"\b(intracranial|subdural|epidural|subarachnoid|intraparenchymal)\s+(?:hemorrhage|hematoma)(?:[: \t]*(present|seen|identified|acute|chronic|none|no)\b)?",
            |_, c| {
                finding(
                    format!("{} Hemorrhage", title_case(&c[1])),
                    lower_or(c, 2, "present"),
                )
            },
        ),
        Rule::first("Fracture")
            .pattern(r"\b(?:no|without)\s+(?:acute\s+)?fractures?\b", |name, _| {
                finding(name, "none")
            })
            .pattern(
                r"\b(?:acute\s+)?fractures?[: \t]+(?:of\s+)?(?:the\s+)?(\w+(?:[ \t]+\w+)?)",
                |name, c| finding(name, &c[1]),
            ),
    ]
});
