//! Registry date parsing and week-offset date derivation.

use chrono::{Days, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, ignoring any time suffix.
///
/// Malformed dates become absent.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let date_part = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::warn!(value, %error, "malformed date");
            None
        }
    }
}

/// Parses an integer count (weeks, years). Malformed values become absent.
pub fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<i64>() {
        Ok(number) => Some(number),
        Err(error) => {
            tracing::warn!(value, %error, "malformed integer");
            None
        }
    }
}

/// `diagnosis + weeks * 7 days`; absent when either input is absent or the
/// result leaves the calendar range.
pub fn derive_date(diagnosis: Option<NaiveDate>, weeks: Option<i64>) -> Option<NaiveDate> {
    let diagnosis = diagnosis?;
    let days = weeks?.checked_mul(7)?;
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        diagnosis.checked_add_days(magnitude)
    } else {
        diagnosis.checked_sub_days(magnitude)
    }
}

/// Whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Days from `from` to `to` expressed in weeks.
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> f64 {
    days_between(from, to) as f64 / 7.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_suffix_is_ignored() {
        assert_eq!(
            parse_date("2021-05-04T10:00:00"),
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(parse_date("04.05.2021"), None);
    }
}
