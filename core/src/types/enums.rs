use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;

/// Imaging modality handled by the extractors
///
/// Declaration order is the canonical reporting order (ECHO, CT, MRI, XRAY,
/// ULTRASOUND) and is what `Ord` follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Echo,       // Echocardiogram (cardiac ultrasound)
    Ct,         // Computed tomography
    Mri,        // Magnetic resonance imaging
    Xray,       // Plain radiograph
    Ultrasound, // Non-cardiac ultrasound
}

impl Modality {
    /// All modalities in canonical order
    pub const ALL: [Modality; 5] = [
        Modality::Echo,
        Modality::Ct,
        Modality::Mri,
        Modality::Xray,
        Modality::Ultrasound,
    ];

    /// Returns the wire code ("ECHO", "CT", ...)
    pub fn code(&self) -> &'static str {
        match self {
            Modality::Echo => "ECHO",
            Modality::Ct => "CT",
            Modality::Mri => "MRI",
            Modality::Xray => "XRAY",
            Modality::Ultrasound => "ULTRASOUND",
        }
    }

    /// Returns simple lowercase name, used for prompt file names and reply keys
    pub fn simple_name(&self) -> &'static str {
        match self {
            Modality::Echo => "echo",
            Modality::Ct => "ct",
            Modality::Mri => "mri",
            Modality::Xray => "xray",
            Modality::Ultrasound => "ultrasound",
        }
    }

    /// Returns the `source_text` label attached to rule-based studies
    pub fn report_label(&self) -> &'static str {
        match self {
            Modality::Echo => "ECHO report",
            Modality::Ct => "CT report",
            Modality::Mri => "MRI report",
            Modality::Xray => "X-ray report",
            Modality::Ultrasound => "Ultrasound report",
        }
    }

    /// Returns a human-readable description for prompts and reports
    pub fn description(&self) -> &'static str {
        match self {
            Modality::Echo => "echocardiogram (ECHO)",
            Modality::Ct => "CT scan",
            Modality::Mri => "MRI",
            Modality::Xray => "X-ray",
            Modality::Ultrasound => "ultrasound",
        }
    }

    /// Returns the codes of all modalities, for error messages
    pub fn codes() -> impl Iterator<Item = &'static str> {
        Modality::ALL.iter().map(Modality::code)
    }
}

impl FromStr for Modality {
    type Err = ExtractError;

    /// Parses a modality name case-insensitively
    ///
    /// Accepts the wire codes plus "x-ray" and "us".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "echo" => Ok(Modality::Echo),
            "ct" => Ok(Modality::Ct),
            "mri" => Ok(Modality::Mri),
            "xray" | "x-ray" => Ok(Modality::Xray),
            "ultrasound" | "us" => Ok(Modality::Ultrasound),
            _ => Err(ExtractError::unknown_modality(s, Modality::codes())),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ECHO", Modality::Echo)]
    #[case("echo", Modality::Echo)]
    #[case(" Ct ", Modality::Ct)]
    #[case("MRI", Modality::Mri)]
    #[case("x-ray", Modality::Xray)]
    #[case("XRAY", Modality::Xray)]
    #[case("Ultrasound", Modality::Ultrasound)]
    fn test_from_str(#[case] input: &str, #[case] expected: Modality) {
        assert_eq!(input.parse::<Modality>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_unknown_fails_loudly() {
        let err = "PET".parse::<Modality>().unwrap_err();
        assert!(matches!(err, ExtractError::UnknownModality { .. }));
        assert!(err.to_string().contains("ECHO, CT, MRI, XRAY, ULTRASOUND"));
    }

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![Modality::Ultrasound, Modality::Ct, Modality::Echo];
        shuffled.sort();
        assert_eq!(shuffled, vec![Modality::Echo, Modality::Ct, Modality::Ultrasound]);
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Modality::Xray).unwrap(), "\"XRAY\"");
        assert_eq!(Modality::Ultrasound.to_string(), "ULTRASOUND");
    }
}
