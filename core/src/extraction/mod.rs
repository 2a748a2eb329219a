pub mod dates;
pub mod detect;
pub mod labs;
pub mod rules;
pub mod values;
pub mod vocabulary;

pub use dates::{
    find_dates, find_dates_with_reference, first_date, normalize_date,
    normalize_date_with_reference, resolve_two_digit_year, DateMatch,
};
pub use detect::{detect_among, detect_modalities};
pub use labs::{LabExtractor, LabMention};
pub use rules::{extract_findings, rule_based_extract, Rule};
pub use values::{extract_value, extract_value_span, ValueMatch, LOOKAHEAD_CHARS};
pub use vocabulary::{TermMatch, VocabularyMatcher, LAB_ALIASES};
