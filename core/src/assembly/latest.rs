use crate::types::{CombinedStudy, LabGroup, Study, StudyDate};

/// Anything that can be ordered by its study date
pub trait Dated {
    fn date(&self) -> StudyDate;
}

/// A dated result that carries an `is_latest` flag
pub trait Latest: Dated {
    fn set_latest(&mut self, latest: bool);
}

impl Dated for Study {
    fn date(&self) -> StudyDate {
        self.date
    }
}

impl Latest for Study {
    fn set_latest(&mut self, latest: bool) {
        self.is_latest = latest;
    }
}

impl Dated for CombinedStudy {
    fn date(&self) -> StudyDate {
        self.date
    }
}

impl Latest for CombinedStudy {
    fn set_latest(&mut self, latest: bool) {
        self.is_latest = latest;
    }
}

impl Dated for LabGroup {
    fn date(&self) -> StudyDate {
        self.date
    }
}

/// Sorts most recent first, undated entries last
///
/// The sort is stable, so entries sharing a date keep their input order.
pub fn sort_by_date_desc<T: Dated>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.date()));
}

/// Sorts by date and flags the first entry as the latest
///
/// # Arguments
///
/// * `items` - Results in any order
///
/// # Returns
///
/// The same results, most recent first, with `is_latest` set on index 0 only.
/// Applying it twice gives the same output as applying it once.
pub fn sort_and_mark_latest<T: Latest>(mut items: Vec<T>) -> Vec<T> {
    sort_by_date_desc(&mut items);
    for (i, item) in items.iter_mut().enumerate() {
        item.set_latest(i == 0);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finding, Modality};
    use chrono::NaiveDate;

    fn make_test_study(date: Option<(i32, u32, u32)>, label: &str) -> Study {
        let date = date
            .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .into();
        Study::new(
            Modality::Ct,
            date,
            label,
            vec![Finding::new("Pulmonary Nodule", "8 mm")],
        )
    }

    fn labels(studies: &[Study]) -> Vec<&str> {
        studies.iter().map(|s| s.source_text.as_str()).collect()
    }

    #[test]
    fn test_sorts_descending_with_no_data_last() {
        let studies = vec![
            make_test_study(None, "undated"),
            make_test_study(Some((2024, 9, 14)), "older"),
            make_test_study(Some((2024, 9, 15)), "newer"),
        ];
        let sorted = sort_and_mark_latest(studies);
        assert_eq!(labels(&sorted), vec!["newer", "older", "undated"]);
    }

    #[test]
    fn test_exactly_one_latest() {
        let studies = vec![
            make_test_study(Some((2023, 1, 1)), "a"),
            make_test_study(Some((2024, 1, 1)), "b"),
            make_test_study(Some((2022, 1, 1)), "c"),
        ];
        let sorted = sort_and_mark_latest(studies);
        let flags: Vec<bool> = sorted.iter().map(|s| s.is_latest).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert!(sorted.iter().all(|s| s.date <= sorted[0].date));
    }

    #[test]
    fn test_clears_stale_latest_flags() {
        let mut old = make_test_study(Some((2020, 5, 1)), "old");
        old.is_latest = true;
        let sorted = sort_and_mark_latest(vec![old, make_test_study(Some((2021, 5, 1)), "new")]);
        assert!(sorted[0].is_latest);
        assert!(!sorted[1].is_latest);
        assert_eq!(sorted[1].source_text, "old");
    }

    #[test]
    fn test_idempotent() {
        let studies = vec![
            make_test_study(None, "x"),
            make_test_study(Some((2024, 3, 1)), "y"),
            make_test_study(Some((2024, 3, 1)), "z"),
            make_test_study(Some((2019, 12, 31)), "w"),
        ];
        let once = sort_and_mark_latest(studies);
        let twice = sort_and_mark_latest(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_undated_still_marks_first() {
        let sorted = sort_and_mark_latest(vec![
            make_test_study(None, "first"),
            make_test_study(None, "second"),
        ]);
        assert_eq!(labels(&sorted), vec!["first", "second"]);
        assert!(sorted[0].is_latest);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_and_mark_latest(Vec::<Study>::new()).is_empty());
    }
}
