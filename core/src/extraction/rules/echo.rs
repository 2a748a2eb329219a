use std::sync::LazyLock;

use super::{finding, lower_or, Catalogue, Rule};

pub(super) const PARAMETERS: Catalogue = &[
    (
        "Functional",
        &["EF", "LVEF", "Ejection Fraction", "LV systolic function", "RV function", "GLS"],
    ),
    (
        "Dimensional",
        &["LVEDD", "LVESD", "IVSd", "LVPWd", "LA diameter", "LA volume", "LV mass", "aortic root"],
    ),
    (
        "Hemodynamic",
        &["LVOT gradient", "PASP", "RVSP", "TAPSE", "E/A ratio", "E/e'", "cardiac output"],
    ),
    (
        "Valvular",
        &["MR", "TR", "AR", "PR", "MS", "AS", "aortic valve area", "mean gradient"],
    ),
    (
        "Qualitative",
        &["LVH", "dilation", "wall motion abnormality", "pericardial effusion", "diastolic dysfunction"],
    ),
];

/// Chamber and wall dimensions reported as "<number> <unit>"
const DIMENSIONS: &[&str] = &["LVEDD", "LVESD", "IVSd", "LVPWd", "LA diameter"];

/// Regurgitant valves: finding name and the abbreviation/full-name pattern
const VALVES: &[(&str, &str)] = &[
    ("Mitral Regurgitation", r"MR|mitral\s+regurgitation"),
    ("Tricuspid Regurgitation", r"TR|tricuspid\s+regurgitation"),
    ("Aortic Regurgitation", r"AR|aortic\s+regurgitation"),
];

const GRADES: &str = r"trace|trivial|mild-moderate|moderate-severe|mild|moderate|severe";

const EF_TERM: &str = r"(?:LVEF|EF|ejection\s*fraction)";

pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = vec![
        Rule::first("Ejection Fraction")
            .pattern(
                &format!(r"\b{EF_TERM}[: \t]*(?:of\s+|is\s+)?(\d{{1,2}}(?:\.\d+)?)\s*%"),
                |name, c| finding(name, format!("{}%", &c[1])),
            )
            .pattern(
                &format!(r"\b{EF_TERM}[: \t]*(?:of\s+|is\s+)?(\d{{1,2}}(?:\.\d+)?)\s*(?:percent|to)\b"),
                |name, c| finding(name, format!("{}%", &c[1])),
            )
            .pattern(
                &format!(r"\b(\d{{1,2}}(?:\.\d+)?)\s*%\s*{EF_TERM}\b"),
                |name, c| finding(name, format!("{}%", &c[1])),
            ),
        Rule::first("LVH")
            .pattern(
                r"\b(mild|moderate|severe|concentric|eccentric)\s+(?:LVH|left\s+ventricular\s+hypertrophy)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(?:LVH|left\s+ventricular\s+hypertrophy)[: \t]*(mild|moderate|severe|concentric|eccentric)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(r"\b(?:LVH|left\s+ventricular\s+hypertrophy)\b", |name, c| {
                finding(name, lower_or(c, 1, "present"))
            }),
    ];

    for dimension in DIMENSIONS {
        let term = regex::escape(dimension).replace(' ', r"\s+");
        rules.push(Rule::first(dimension).pattern(
            &format!(r"\b{term}[: \t]*(\d+\.?\d*)\s*(cm|mm)\b"),
            |name, c| finding(name, format!("{} {}", &c[1], &c[2])),
        ));
    }

    rules.push(Rule::first("PASP").pattern(
        r"\b(?:PASP|RVSP|PA\s+systolic\s+pressure)[: \t]*(?:of\s+|is\s+)?(\d+\.?\d*)\s*(?:mm\s*Hg)?",
        |name, c| finding(name, format!("{} mmHg", &c[1])),
    ));

    for (valve, term) in VALVES {
        rules.push(
            Rule::first(valve)
                .pattern(
                    &format!(r"\b(?:{term})[: \t]*({GRADES})\b"),
                    |name, c| finding(name, c[1].to_lowercase()),
                )
                .pattern(
                    &format!(r"\b({GRADES})\s+(?:{term})\b"),
                    |name, c| finding(name, c[1].to_lowercase()),
                ),
        );
    }

    rules
});
