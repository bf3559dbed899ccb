//! Business-day date generation for forecast horizons.
//!
//! Business day means Monday-Friday. Exchange holidays are not modeled; the
//! forecast dates are a label axis, not a trading calendar.

use chrono::{Datelike, NaiveDate, Weekday};

/// The `steps` business days strictly after `start`.
///
/// If `start` is a Friday the first returned date is the following Monday.
pub fn business_days_after(start: NaiveDate, steps: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(steps);
    let mut date = start;
    while out.len() < steps {
        date = date.succ_opt().expect("date out of range");
        if is_business_day(date) {
            out.push(date);
        }
    }
    out
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn friday_rolls_to_monday() {
        // 2025-10-31 is a Friday.
        let days = business_days_after(date(2025, 10, 31), 3);
        assert_eq!(
            days,
            vec![date(2025, 11, 3), date(2025, 11, 4), date(2025, 11, 5)]
        );
    }

    #[test]
    fn midweek_runs_consecutively() {
        // 2025-11-04 is a Tuesday.
        let days = business_days_after(date(2025, 11, 4), 2);
        assert_eq!(days, vec![date(2025, 11, 5), date(2025, 11, 6)]);
    }

    #[test]
    fn count_and_weekday_invariants() {
        let days = business_days_after(date(2025, 1, 1), 10);
        assert_eq!(days.len(), 10);
        assert!(days.iter().all(|d| is_business_day(*d)));
        assert!(days.iter().all(|d| *d > date(2025, 1, 1)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }
}
