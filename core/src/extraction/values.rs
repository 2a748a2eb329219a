use regex::Regex;
use std::sync::LazyLock;

/// Number of characters after a term searched for its value
pub const LOOKAHEAD_CHARS: usize = 50;

/// Optional separator, a number or range with optional comparison prefix,
/// then an optional unit on the same line
static VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?::|=|is|was|of)?\s*([<>]?\d+(?:\.\d+)?(?:\s*[-–]\s*\d+(?:\.\d+)?)?)[ \t]*(%|(?:[a-zA-Z]+/?[a-zA-Z]*(?:/[a-zA-Z]+)?)?(?:\^?\d+)?)?",
    )
    .expect("value pattern must compile")
});

/// A value found after a term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMatch {
    /// Number and unit joined by one space (percent attached), or the number alone
    pub text: String,
    /// Byte offset where the number starts
    pub start: usize,
    /// Byte offset just past the unit (or number)
    pub end: usize,
}

/// Finds the value following a term that ends at byte offset `after`
///
/// # Algorithm
///
/// 1. Take the next [`LOOKAHEAD_CHARS`] characters after the term
/// 2. Find the first number there, allowing `<`/`>` and ranges like `0.6-1.2`
/// 3. Attach a unit written directly after it on the same line
///
/// Offsets in the returned match are relative to `text`.
pub fn extract_value_span(text: &str, after: usize) -> Option<ValueMatch> {
    let rest = text.get(after..)?;
    let window_end = rest
        .char_indices()
        .nth(LOOKAHEAD_CHARS)
        .map_or(rest.len(), |(i, _)| i);
    let window = &rest[..window_end];

    let caps = VALUE_PATTERN.captures(window)?;
    let number = caps.get(1)?;
    let (text, end) = match caps.get(2).filter(|u| !u.as_str().is_empty()) {
        Some(unit) if unit.as_str() == "%" => (format!("{}%", number.as_str()), unit.end()),
        Some(unit) => (format!("{} {}", number.as_str(), unit.as_str()), unit.end()),
        None => (number.as_str().to_string(), number.end()),
    };

    Some(ValueMatch {
        text,
        start: after + number.start(),
        end: after + end,
    })
}

/// Returns only the value text following a term ending at `after`
///
/// # Example
///
/// ```
/// use clinifind_core::extraction::extract_value;
///
/// let line = "Creatinine: 1.2 mg/dL";
/// assert_eq!(extract_value(line, 10).as_deref(), Some("1.2 mg/dL"));
/// assert_eq!(extract_value("eGFR 62, INR 1.1", 4).as_deref(), Some("62"));
/// ```
pub fn extract_value(text: &str, after: usize) -> Option<String> {
    extract_value_span(text, after).map(|v| v.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn value_after(text: &str, term: &str) -> Option<String> {
        let after = text.find(term).unwrap() + term.len();
        extract_value(text, after)
    }

    #[rstest]
    #[case("Cr 1.3 mg/dL", "Cr", "1.3 mg/dL")]
    #[case("ALT 24 U/L.", "ALT", "24 U/L")]
    #[case("hsCRP 5.6 mg/L", "hsCRP", "5.6 mg/L")]
    #[case("eGFR 62, ALT", "eGFR", "62")]
    #[case("Troponin <0.01 ng/mL", "Troponin", "<0.01 ng/mL")]
    #[case("eGFR >60", "eGFR", ">60")]
    #[case("TSH was 2.5", "TSH", "2.5")]
    #[case("Creatinine = 0.9", "Creatinine", "0.9")]
    #[case("HbA1c 7.2%", "HbA1c", "7.2%")]
    #[case("Creatinine (ref 0.6-1.2)", "Creatinine", "0.6-1.2")]
    #[case("K 4.2 mEq/L", "K", "4.2 mEq/L")]
    fn test_value_forms(#[case] text: &str, #[case] term: &str, #[case] expected: &str) {
        assert_eq!(value_after(text, term).as_deref(), Some(expected));
    }

    #[test]
    fn test_unit_must_be_on_same_line() {
        assert_eq!(value_after("GFR 62\nALT 24 U/L", "GFR").as_deref(), Some("62"));
    }

    #[test]
    fn test_no_number_in_window() {
        assert_eq!(value_after("Troponin negative", "Troponin"), None);
        let far = format!("BNP {} 450", "x".repeat(60));
        assert_eq!(value_after(&far, "BNP"), None);
    }

    #[test]
    fn test_span_covers_unit() {
        let text = "Cr 1.3 mg/dL, Mg 2.0";
        let span = extract_value_span(text, 2).unwrap();
        assert_eq!(&text[span.start..span.end], "1.3 mg/dL");
    }

    #[test]
    fn test_window_respects_multibyte_text() {
        let text = "Hb ≥ 12.1 g/dL";
        assert_eq!(extract_value(text, 2).as_deref(), Some("12.1 g/dL"));
    }
}
