use std::fmt;

use crate::types::{
    CombinedExtraction, CombinedStudy, Extraction, ImagingReport, LabGroup, Modality, Study,
    NO_DATA, NO_IMAGING_STATUS,
};

enum Body<'a> {
    Imaging(&'a ImagingReport),
    Studies(&'a Extraction<Study>),
    Combined(&'a CombinedExtraction),
    Labs(&'a Extraction<LabGroup>),
    Detected(&'a [Modality]),
}

/// Text report formatter for extraction results
pub struct TextReport<'a> {
    body: Body<'a>,
}

impl<'a> TextReport<'a> {
    /// Report of studies per modality
    pub fn imaging(report: &'a ImagingReport) -> Self {
        Self {
            body: Body::Imaging(report),
        }
    }

    /// Report of a single modality's studies
    pub fn studies(studies: &'a Extraction<Study>) -> Self {
        Self {
            body: Body::Studies(studies),
        }
    }

    /// Report of combined or flat multi-modality output
    pub fn combined(combined: &'a CombinedExtraction) -> Self {
        Self {
            body: Body::Combined(combined),
        }
    }

    /// Report of lab groups
    pub fn labs(labs: &'a Extraction<LabGroup>) -> Self {
        Self {
            body: Body::Labs(labs),
        }
    }

    /// List of detected modalities
    pub fn detected(modalities: &'a [Modality]) -> Self {
        Self {
            body: Body::Detected(modalities),
        }
    }
}

fn write_heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(title.len()))?;
    writeln!(f)
}

fn latest_marker(is_latest: bool) -> &'static str {
    if is_latest {
        " (latest)"
    } else {
        ""
    }
}

fn write_study(f: &mut fmt::Formatter<'_>, study: &Study) -> fmt::Result {
    writeln!(
        f,
        "{} [{}]{}",
        study.source_text,
        study.date,
        latest_marker(study.is_latest)
    )?;
    for finding in &study.findings {
        writeln!(f, "  {}: {}", finding.name, finding.value)?;
    }
    writeln!(f)
}

fn write_combined_study(f: &mut fmt::Formatter<'_>, study: &CombinedStudy) -> fmt::Result {
    let modalities: Vec<&str> = study.modalities.iter().map(|m| m.code()).collect();
    writeln!(
        f,
        "[{}] {}{}",
        study.date,
        modalities.join(", "),
        latest_marker(study.is_latest)
    )?;
    writeln!(f, "  Sources: {}", study.source_text)?;
    for finding in &study.findings {
        writeln!(
            f,
            "  {:<11}{}: {}",
            finding.modality.code(),
            finding.finding_name,
            finding.finding_value
        )?;
    }
    writeln!(f)
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Imaging(ImagingReport::NotFound) => writeln!(f, "{}", NO_IMAGING_STATUS),
            Body::Imaging(report) => {
                write_heading(f, "Imaging Findings")?;
                for modality in report.modalities() {
                    writeln!(f, "{}", modality.description())?;
                    writeln!(f, "{}", "-".repeat(modality.description().len()))?;
                    for study in report.get(modality).unwrap_or_default() {
                        write_study(f, study)?;
                    }
                }
                Ok(())
            }
            Body::Studies(Extraction::NoData)
            | Body::Combined(CombinedExtraction::NoData)
            | Body::Labs(Extraction::NoData) => writeln!(f, "{}", NO_DATA),
            Body::Studies(Extraction::Found(studies)) => {
                write_heading(f, "Imaging Findings")?;
                studies.iter().try_for_each(|s| write_study(f, s))
            }
            Body::Combined(CombinedExtraction::Flat(studies)) => {
                write_heading(f, "Imaging Studies")?;
                for study in studies {
                    write!(f, "{}: ", study.modality)?;
                    write_study(f, study)?;
                }
                Ok(())
            }
            Body::Combined(CombinedExtraction::ByDate(studies)) => {
                write_heading(f, "Imaging Studies by Date")?;
                studies.iter().try_for_each(|s| write_combined_study(f, s))
            }
            Body::Labs(Extraction::Found(groups)) => {
                write_heading(f, "Laboratory Results")?;
                for group in groups {
                    writeln!(f, "[{}]", group.date)?;
                    for lab in &group.labs {
                        writeln!(f, "  {:<18}{}", lab.lab_name, lab.lab_value)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Body::Detected([]) => writeln!(f, "No imaging modalities detected"),
            Body::Detected(modalities) => {
                write_heading(f, "Detected Modalities")?;
                for modality in modalities.iter() {
                    writeln!(f, "{:<11}{}", modality.code(), modality.description())?;
                }
                Ok(())
            }
        }
    }
}
