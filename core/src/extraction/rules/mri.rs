use std::sync::LazyLock;

use super::{finding, lower_or, title_case, Catalogue, Rule};

pub(super) const PARAMETERS: Catalogue = &[
    (
        "Brain",
        &["white matter lesion", "FLAIR hyperintensity", "diffusion restriction", "acute infarct", "enhancing lesion", "mass effect", "atrophy"],
    ),
    (
        "Spine",
        &["disc herniation", "disc bulge", "cord compression", "foraminal stenosis", "central stenosis", "nerve root impingement"],
    ),
    ("Cardiac", &["LVEF", "late gadolinium enhancement", "myocardial edema", "perfusion defect"]),
    (
        "Musculoskeletal",
        &["ACL", "PCL", "meniscal tear", "rotator cuff", "bone marrow edema", "cartilage", "labral tear"],
    ),
    ("Body", &["lesion", "mass", "PI-RADS", "BI-RADS", "washout"]),
    ("Sequences", &["T1", "T2", "FLAIR", "DWI", "ADC", "STIR", "SWI", "post-contrast"]),
];

pub(super) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::first("White Matter Lesions")
            .pattern(
                r"(?:white\s+matter\s+(?:lesion|hyperintensit|change)|T2\s+hyperintens|FLAIR\s+hyperintens)[^.\n]*\b(multiple|few|several|scattered|periventricular|subcortical)\b",
                |name, c| finding(name, c[1].to_lowercase()),
            )
            .pattern(
                r"\b(multiple|few|several|scattered|periventricular|subcortical)\s+(?:\w+\s+)?(?:white\s+matter|T2|FLAIR)\s+(?:lesion|hyperintens|change)",
                |name, c| finding(name, c[1].to_lowercase()),
            ),
        Rule::first("Acute Infarct")
            .pattern(
                r"(?:acute\s+infarct|diffusion\s+restriction)[^.\n]*\b((?:left|right)\s+\w+(?:[ \t]+\w+)?)",
                |name, c| finding(name, &c[1]),
            )
            .pattern(
                r"\b(?:DWI|diffusion)\s+(?:positive|restricted|hyperintense)(?:[^.\n]*?\b((?:left|right)\s+\w+))?",
                |name, c| finding(name, lower_or(c, 1, "present")),
            ),
        Rule::every("Disc Herniation").pattern(
            r"\b(?:disc|disk)\s+(?:herniation|bulge|protrusion)[^.\n]*\b(L\d[-/](?:L|S)\d|C\d[-/]C?\d|T\d+[-/]T?\d+)\b",
            |name, c| finding(name, &c[1]),
        ),
        Rule::first("Stenosis").pattern(
            r"\b(foraminal|central|spinal\s+canal)\s+stenosis(?:[: \t]*(mild|moderate|severe)\b)?",
            |_, c| {
                finding(
                    format!("{} Stenosis", title_case(&c[1])),
                    lower_or(c, 2, "present"),
                )
            },
        ),
        Rule::first("Ligament").pattern(
            r"\b(ACL|PCL|MCL|LCL|anterior\s+cruciate|posterior\s+cruciate)\s+(?:ligament\s+)?(tear|rupture|injury|intact)\b",
            |_, c| {
                let ligament = c[1].split_whitespace().collect::<Vec<_>>().join(" ");
                finding(format!("{} Status", ligament.to_uppercase()), c[2].to_lowercase())
            },
        ),
        Rule::first("Meniscus").pattern(
            r"\b(medial|lateral)\s+meniscus[^.\n]*\b(tear|intact|degenerative)\b",
            |_, c| finding(format!("{} Meniscus", title_case(&c[1])), c[2].to_lowercase()),
        ),
    ]
});
