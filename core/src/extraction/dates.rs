use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::types::StudyDate;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Date shapes located in free text, in priority order
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // ISO: 2024-09-15, 2024/9/15
        r"\b(\d{4}[/-]\d{1,2}[/-]\d{1,2})\b".to_string(),
        // US: 09/15/2024, 9-15-2024
        r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{4})\b".to_string(),
        // Short year: 9/30/24
        r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2})\b".to_string(),
        // Written: Oct 5, 2024 / October 5 2024
        format!(r"\b({MONTH}\.?\s+\d{{1,2}},?\s+\d{{4}})\b"),
        // Written: 5 October 2024
        format!(r"\b(\d{{1,2}}\s+{MONTH}\.?,?\s+\d{{4}})\b"),
    ]
    .iter()
    .map(|p| {
        RegexBuilder::new(p)
            .case_insensitive(true)
            .build()
            .expect("date pattern must compile")
    })
    .collect()
});

static MONTH_DAY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").expect("valid regex"));

static YEAR_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})").expect("valid regex"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+|\d+").expect("valid regex"));

/// A date located in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Byte offset of the match in the searched text
    pub position: usize,
    /// Matched text, verbatim
    pub raw: String,
    pub date: NaiveDate,
}

impl DateMatch {
    /// Byte offset just past the match
    pub fn end(&self) -> usize {
        self.position + self.raw.len()
    }
}

fn current_year() -> i32 {
    Local::now().year()
}

/// Locates every date in `text`, ordered by position
///
/// Uses the current year to resolve two-digit and missing years.
pub fn find_dates(text: &str) -> Vec<DateMatch> {
    find_dates_with_reference(text, current_year())
}

/// Locates every date in `text` against an explicit reference year
///
/// # Algorithm
///
/// 1. Run each date pattern over the text, in priority order
/// 2. Normalize every match; drop those that are not real calendar dates
/// 3. Sort by position; when two patterns match at the same offset the
///    higher-priority one is kept
pub fn find_dates_with_reference(text: &str, reference_year: i32) -> Vec<DateMatch> {
    let mut found: Vec<DateMatch> = Vec::new();

    for pattern in DATE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            if let StudyDate::Known(date) = normalize_date_with_reference(m.as_str(), reference_year)
            {
                found.push(DateMatch {
                    position: m.start(),
                    raw: m.as_str().to_string(),
                    date,
                });
            }
        }
    }

    // Stable sort keeps pattern priority among equal positions
    found.sort_by_key(|d| d.position);
    found.dedup_by_key(|d| d.position);
    found
}

/// Returns the first date found in `text`, or `NoData`
pub fn first_date(text: &str) -> StudyDate {
    find_dates(text)
        .first()
        .map(|d| StudyDate::Known(d.date))
        .unwrap_or(StudyDate::NoData)
}

/// Normalizes a raw date string against the current year
pub fn normalize_date(raw: &str) -> StudyDate {
    normalize_date_with_reference(raw, current_year())
}

/// Normalizes a raw date string to a calendar date
///
/// # Algorithm
///
/// 1. `M/D/YYYY` (or `-`) is read month first
/// 2. `YYYY/M/D` (or `-`) is read year first
/// 3. Anything else, or a fixed form that is not a valid date, goes through
///    the fuzzy parser
/// 4. Failure yields `NoData`
///
/// # Example
///
/// ```
/// use clinifind_core::extraction::normalize_date_with_reference;
///
/// assert_eq!(normalize_date_with_reference("09/15/2024", 2026).to_string(), "2024-09-15");
/// assert_eq!(normalize_date_with_reference("Oct 5 2024", 2026).to_string(), "2024-10-05");
/// assert_eq!(normalize_date_with_reference("9/30/24", 2026).to_string(), "2024-09-30");
/// assert!(normalize_date_with_reference("yesterday", 2026).is_no_data());
/// ```
pub fn normalize_date_with_reference(raw: &str, reference_year: i32) -> StudyDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return StudyDate::NoData;
    }

    if let Some(date) = parse_fixed(raw) {
        return StudyDate::Known(date);
    }

    match parse_fuzzy(raw, reference_year) {
        Some(date) => StudyDate::Known(date),
        None => {
            debug!("Could not interpret '{}' as a date", raw);
            StudyDate::NoData
        }
    }
}

fn parse_fixed(raw: &str) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_DAY_YEAR.captures(raw) {
        return ymd(&caps[3], &caps[1], &caps[2]);
    }
    if let Some(caps) = YEAR_MONTH_DAY.captures(raw) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }
    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Resolves a two-digit year to the century nearest the reference year
pub fn resolve_two_digit_year(yy: i32, reference_year: i32) -> i32 {
    let century = reference_year - reference_year.rem_euclid(100);
    let year = century + yy;
    if year >= reference_year + 50 {
        year - 100
    } else if year < reference_year - 50 {
        year + 100
    } else {
        year
    }
}

fn month_from_name(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|full| {
            *full == word
                || (word.len() == 3 && full.starts_with(word.as_str()))
                || (word == "sept" && *full == "september")
        })
        .map(|i| i as u32 + 1)
}

/// Month-first unless the first number cannot be a month
fn month_day(first: u32, second: u32) -> (u32, u32) {
    if first > 12 && second <= 12 {
        (second, first)
    } else {
        (first, second)
    }
}

/// Tolerant parser for dates embedded in words
///
/// Month names may be full, three-letter, or "Sept". Words that are not
/// months are ignored. A missing year defaults to `reference_year`.
fn parse_fuzzy(raw: &str, reference_year: i32) -> Option<NaiveDate> {
    let mut month_named = None;
    let mut numbers: Vec<&str> = Vec::new();

    for token in TOKEN.find_iter(raw) {
        let t = token.as_str();
        if t.starts_with(|c: char| c.is_ascii_digit()) {
            numbers.push(t);
        } else if month_named.is_none() {
            month_named = month_from_name(t);
        }
    }

    let (year, month, day) = match month_named {
        Some(month) => {
            let mut day = None;
            let mut year = None;
            for n in &numbers {
                let value: i32 = n.parse().ok()?;
                if n.len() == 4 && year.is_none() {
                    year = Some(value);
                } else if n.len() <= 2 && day.is_none() && (1..=31).contains(&value) {
                    day = Some(value as u32);
                } else if n.len() <= 2 && year.is_none() {
                    year = Some(resolve_two_digit_year(value, reference_year));
                }
            }
            (year.unwrap_or(reference_year), month, day?)
        }
        None => {
            let values = numbers
                .iter()
                .map(|n| n.parse::<u32>().ok().map(|v| (v, n.len())))
                .collect::<Option<Vec<_>>>()?;
            match values.as_slice() {
                [(y, 4), (m, _), (d, _), ..] => (*y as i32, *m, *d),
                [(a, _), (b, _), (y, len), ..] => {
                    let year = if *len <= 2 {
                        resolve_two_digit_year(*y as i32, reference_year)
                    } else {
                        *y as i32
                    };
                    let (month, day) = month_day(*a, *b);
                    (year, month, day)
                }
                [(a, _), (b, _)] => {
                    let (month, day) = month_day(*a, *b);
                    (reference_year, month, day)
                }
                _ => return None,
            }
        }
    };

    NaiveDate::from_ymd_opt(year, month, day)
}
