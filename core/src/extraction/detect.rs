use log::debug;

use crate::types::Modality;

// Keyword sets for modality detection, matched as lowercase substrings
const ECHO_KEYWORDS: &[&str] = &[
    "echocardiogram",
    "echo",
    "echocardiography",
    "tte",
    "tee",
    "transthoracic",
    "transesophageal",
    "cardiac ultrasound",
    "2d echo",
    "doppler echo",
    "ejection fraction",
    "lvef",
    "ef ",
    "e/f",
    "left ventricle",
    "lv function",
    "lv systolic",
];

const CT_KEYWORDS: &[&str] = &[
    "ct scan",
    "ct ",
    "computed tomography",
    "cat scan",
    "ct head",
    "ct chest",
    "ct abdomen",
    "ct pelvis",
    "ct spine",
    "ct cervical",
    "ct lumbar",
    "ct thoracic",
    "cta",
    "ct angiography",
    "ct angiogram",
    "ctpa",
    "ct pulmonary",
    "pe protocol",
    "ct with contrast",
    "ct without contrast",
    "non-contrast ct",
    "contrast-enhanced ct",
    "hounsfield",
    " hu ",
];

const MRI_KEYWORDS: &[&str] = &[
    "mri",
    "magnetic resonance",
    "mr imaging",
    "mr ",
    "mri brain",
    "mri spine",
    "mri lumbar",
    "mri cervical",
    "mri knee",
    "mri shoulder",
    "mri hip",
    "mra",
    "mr angiography",
    "mr angiogram",
    "mrcp",
    "cardiac mri",
    "cardiac mr",
    "flair",
    "t1 weighted",
    "t2 weighted",
    "t1w",
    "t2w",
    "dwi",
    "diffusion weighted",
    "diffusion restriction",
    "adc",
    "apparent diffusion",
    "gadolinium",
    "gad",
    "with contrast",
    "stir",
    "gre",
    "swi",
];

const XRAY_KEYWORDS: &[&str] = &[
    "x-ray",
    "xray",
    "x ray",
    "radiograph",
    "chest x-ray",
    "cxr",
    "chest film",
    "portable chest",
    "pa and lateral",
    "ap chest",
    "kub",
    "abdominal x-ray",
    "abdominal film",
    "plain film",
    "plain radiograph",
    "skeletal survey",
    "bone x-ray",
    "spine x-ray",
    "extremity x-ray",
];

const ULTRASOUND_KEYWORDS: &[&str] = &[
    "ultrasound",
    "sonogram",
    "sonography",
    "us ",
    "ruq ultrasound",
    "ruq us",
    "right upper quadrant",
    "abdominal ultrasound",
    "abdominal us",
    "renal ultrasound",
    "renal us",
    "kidney ultrasound",
    "pelvic ultrasound",
    "pelvic us",
    "transvaginal",
    "thyroid ultrasound",
    "thyroid us",
    "doppler",
    "duplex",
    "venous doppler",
    "carotid doppler",
    "carotid ultrasound",
    "lower extremity venous",
    "dvt study",
    "obstetric ultrasound",
    "ob ultrasound",
    "gallbladder",
    "hepatobiliary",
];

/// Strong echocardiogram indicators that veto an ultrasound detection
const ECHO_EXCLUSION_KEYWORDS: &[&str] = &[
    "echocardiogram",
    "echocardiography",
    "tte",
    "tee",
    "transthoracic echo",
    "transesophageal echo",
    "ejection fraction",
    "lvef",
    "cardiac echo",
];

/// Non-cardiac body regions that keep an ultrasound detection alive
const OTHER_REGION_KEYWORDS: &[&str] = &[
    "abdominal",
    "renal",
    "kidney",
    "liver",
    "gallbladder",
    "thyroid",
    "pelvic",
    "carotid",
    "dvt",
    "venous",
];

fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text_lower.contains(kw))
}

impl Modality {
    /// Keywords whose presence marks this modality as mentioned
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Modality::Echo => ECHO_KEYWORDS,
            Modality::Ct => CT_KEYWORDS,
            Modality::Mri => MRI_KEYWORDS,
            Modality::Xray => XRAY_KEYWORDS,
            Modality::Ultrasound => ULTRASOUND_KEYWORDS,
        }
    }

    /// Whether this modality is mentioned in `text`
    ///
    /// Case-insensitive substring containment of any keyword. Ultrasound is
    /// additionally vetoed when the text carries strong echocardiogram
    /// indicators and no other ultrasound body region.
    pub fn is_present(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        if !contains_any(&text_lower, self.keywords()) {
            return false;
        }

        if *self == Modality::Ultrasound
            && contains_any(&text_lower, ECHO_EXCLUSION_KEYWORDS)
            && !contains_any(&text_lower, OTHER_REGION_KEYWORDS)
        {
            debug!("Ultrasound keywords belong to an echocardiogram, skipping");
            return false;
        }

        true
    }
}

/// Lists the modalities mentioned in `text`, in canonical order
pub fn detect_modalities(text: &str) -> Vec<Modality> {
    detect_among(text, &Modality::ALL)
}

/// Like [`detect_modalities`] but only among `candidates`, keeping their order
pub fn detect_among(text: &str, candidates: &[Modality]) -> Vec<Modality> {
    candidates
        .iter()
        .copied()
        .filter(|m| m.is_present(text))
        .collect()
}
