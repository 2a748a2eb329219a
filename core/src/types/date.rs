use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Literal used wherever a date or a whole result is absent
pub const NO_DATA: &str = "No Data";

const NO_DATA_SORT_KEY: &str = "0000-00-00";

/// Date attached to a study or lab group
///
/// `NoData` orders before every known date, so a descending sort puts
/// undated entries last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StudyDate {
    #[default]
    NoData,
    Known(NaiveDate),
}

impl StudyDate {
    /// Returns true when no date was recovered
    pub fn is_no_data(&self) -> bool {
        matches!(self, StudyDate::NoData)
    }

    /// Returns the calendar date, if known
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            StudyDate::Known(d) => Some(*d),
            StudyDate::NoData => None,
        }
    }

    /// String key used for ordering: ISO form, or "0000-00-00" when undated
    pub fn sort_key(&self) -> String {
        match self {
            StudyDate::Known(d) => d.format("%Y-%m-%d").to_string(),
            StudyDate::NoData => NO_DATA_SORT_KEY.to_string(),
        }
    }

    /// Reads back a value produced by `Display` ("YYYY-MM-DD" or "No Data")
    ///
    /// Anything else is treated as undated.
    pub fn from_iso(s: &str) -> Self {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(StudyDate::Known)
            .unwrap_or(StudyDate::NoData)
    }
}

impl From<NaiveDate> for StudyDate {
    fn from(date: NaiveDate) -> Self {
        StudyDate::Known(date)
    }
}

impl From<Option<NaiveDate>> for StudyDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(StudyDate::Known).unwrap_or(StudyDate::NoData)
    }
}

impl fmt::Display for StudyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyDate::Known(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            StudyDate::NoData => write!(f, "{}", NO_DATA),
        }
    }
}

impl Serialize for StudyDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
