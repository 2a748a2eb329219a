//! Core type definitions for clinical text extraction
//!
//! This module provides the fundamental types used throughout the clinifind library:
//! - [`Modality`]: Imaging modality (ECHO, CT, MRI, XRAY, ULTRASOUND)
//! - [`StudyDate`]: A recovered calendar date or the "No Data" marker
//! - [`Finding`], [`Study`], [`CombinedStudy`]: Imaging results
//! - [`LabResult`], [`LabGroup`], [`LabCollection`]: Laboratory results grouped by date
//! - [`Extraction`], [`ImagingReport`], [`CombinedExtraction`]: Result shapes with their sentinels
//! - [`ExtractorConfig`]: Configuration for building an orchestrator

mod config;
mod date;
mod enums;
mod lab;
mod outcome;
mod study;

pub use config::{ExtractorConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
pub use date::{StudyDate, NO_DATA};
pub use enums::Modality;
pub use lab::{LabCollection, LabGroup, LabResult};
pub use outcome::{CombinedExtraction, Extraction, ImagingReport, JsonOutput, NO_IMAGING_STATUS};
pub use study::{CombinedFinding, CombinedStudy, Finding, Study};
