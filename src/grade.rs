//! Domain-level grade aggregation.
//!
//! A domain is graded by its weakest endpoint: the recognized SSL Labs classes
//! are walked from best to worst and every class present overwrites the
//! result, so the worst grade present wins.
//!
//! Grades outside the seven letter classes (`T`, `M`, empty, error states) do
//! not take part in aggregation. A domain whose endpoints only carry such
//! grades has no aggregate grade.

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::models::ServerRecord;

/// Recognized SSL Labs letter grades, declared best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, Display, AsRefStr,
)]
pub enum LetterGrade {
    #[strum(to_string = "A+")]
    APlus,
    #[strum(to_string = "A")]
    A,
    #[strum(to_string = "B")]
    B,
    #[strum(to_string = "C")]
    C,
    #[strum(to_string = "D")]
    D,
    #[strum(to_string = "E")]
    E,
    #[strum(to_string = "F")]
    F,
}

/// Aggregates the grades of a domain's endpoints into one grade.
///
/// Returns `None` when no record carries a recognized grade, including when
/// `records` is empty.
pub fn aggregate(records: &[ServerRecord]) -> Option<LetterGrade> {
    aggregate_grades(records.iter().map(|r| r.ssl_grade.as_str()))
}

/// Same as [`aggregate`] over bare grade strings.
pub fn aggregate_grades<'a, I>(grades: I) -> Option<LetterGrade>
where
    I: IntoIterator<Item = &'a str>,
{
    let grades: Vec<&str> = grades.into_iter().collect();
    let mut result = None;
    for class in LetterGrade::iter() {
        if grades.iter().any(|g| *g == class.as_ref()) {
            result = Some(class);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(grade: &str) -> ServerRecord {
        ServerRecord {
            address: "192.0.2.1".to_string(),
            ssl_grade: grade.to_string(),
            country: String::new(),
            owner: String::new(),
        }
    }

    #[test]
    fn test_worst_grade_wins() {
        let records = vec![record("A+"), record("B"), record("F")];
        assert_eq!(aggregate(&records), Some(LetterGrade::F));
    }

    #[test]
    fn test_a_beats_a_plus() {
        let records = vec![record("A+"), record("A")];
        assert_eq!(aggregate(&records), Some(LetterGrade::A));
    }

    #[test]
    fn test_order_of_records_is_irrelevant() {
        assert_eq!(
            aggregate_grades(["F", "A+", "C"]),
            aggregate_grades(["C", "F", "A+"])
        );
    }

    #[test]
    fn test_empty_input_is_unset() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn test_unrecognized_grades_are_ignored() {
        assert_eq!(aggregate_grades(["T", "M", ""]), None);
        assert_eq!(aggregate_grades(["T", "B", "M"]), Some(LetterGrade::B));
    }

    #[test]
    fn test_grades_match_exactly() {
        // "A-" and lowercase grades are not SSL Labs classes
        assert_eq!(aggregate_grades(["a", "A-", "b+"]), None);
    }

    #[test]
    fn test_letter_grade_round_trips_through_str() {
        for class in LetterGrade::iter() {
            let parsed: LetterGrade = class.to_string().parse().unwrap();
            assert_eq!(parsed, class);
        }
        assert_eq!(LetterGrade::APlus.to_string(), "A+");
    }

    fn grade_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A+", "A", "B", "C", "D", "E", "F", "T", "M", ""])
            .prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_worst_recognized_grade(grades in prop::collection::vec(grade_strategy(), 0..12)) {
            let expected = grades
                .iter()
                .filter_map(|g| g.parse::<LetterGrade>().ok())
                .max();
            prop_assert_eq!(aggregate_grades(grades.iter().map(String::as_str)), expected);
        }
    }
}
