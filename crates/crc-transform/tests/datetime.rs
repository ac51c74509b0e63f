//! Tests for date derivation.

use chrono::NaiveDate;
use proptest::prelude::*;

use crc_transform::{derive_date, parse_date, parse_integer, weeks_between};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn derived_date_adds_whole_weeks() {
    let diagnosis = date(2020, 1, 1);
    assert_eq!(derive_date(Some(diagnosis), Some(2)), Some(date(2020, 1, 15)));
    assert_eq!(derive_date(Some(diagnosis), Some(0)), Some(diagnosis));
    assert_eq!(derive_date(Some(diagnosis), Some(-1)), Some(date(2019, 12, 25)));
}

#[test]
fn derived_date_never_defaults() {
    assert_eq!(derive_date(None, Some(4)), None);
    assert_eq!(derive_date(Some(date(2020, 1, 1)), None), None);
}

#[test]
fn malformed_values_become_absent() {
    assert_eq!(parse_date("2020-13-01"), None);
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_integer("twelve"), None);
    assert_eq!(parse_integer(" 12 "), Some(12));
}

#[test]
fn weeks_between_is_fractional() {
    assert!((weeks_between(date(2020, 1, 1), date(2020, 1, 11)) - 10.0 / 7.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn absence_propagates(weeks in proptest::option::of(-500i64..500)) {
        prop_assert_eq!(derive_date(None, weeks), None);
    }

    #[test]
    fn derivation_round_trips_through_weeks(weeks in -500i64..500) {
        let diagnosis = date(2015, 6, 15);
        let derived = derive_date(Some(diagnosis), Some(weeks)).expect("in range");
        prop_assert!((weeks_between(diagnosis, derived) - weeks as f64).abs() < 1e-9);
    }
}
