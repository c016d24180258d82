//! Tests for the recurrence-date calculator.
//!
//! Dates are fixed so every case is deterministic; 2024 is a leap year and
//! 2024-01-01 is a Monday, which the weekday cases rely on.

use chrono::NaiveDate;
use todo_scheduler::nextdate::{DATE_FORMAT, NextDateError, next_date, next_date_bounded};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid test date")
}

mod daily_rule {
    use super::*;

    #[test]
    fn advances_past_now_in_steps() {
        assert_eq!(next_date(d("20240126"), "20240113", "d 7"), Ok("20240127".into()));
    }

    #[test]
    fn result_equal_to_now_keeps_advancing() {
        // 20240113 + 7 lands exactly on now; strictly-after means one more step
        assert_eq!(next_date(d("20240120"), "20240113", "d 7"), Ok("20240127".into()));
    }

    #[test]
    fn future_start_still_advances_once() {
        assert_eq!(next_date(d("20240101"), "20240210", "d 10"), Ok("20240220".into()));
    }

    #[test]
    fn max_step_of_400_days() {
        assert_eq!(next_date(d("20230101"), "20230101", "d 400"), Ok("20240205".into()));
    }

    #[test]
    fn result_is_positive_multiple_of_step_past_start() {
        let now = d("20240315");
        let start = d("20240101");
        let next = next_date(now, "20240101", "d 11").unwrap();
        let next = d(&next);
        assert!(next > now);
        let delta = (next - start).num_days();
        assert!(delta > 0 && delta % 11 == 0);
    }

    #[test]
    fn rejects_bad_day_counts() {
        for rule in ["d", "d 0", "d -5", "d 401", "d x", "d 1 2"] {
            assert_eq!(
                next_date(d("20240101"), "20240101", rule),
                Err(NextDateError::InvalidDayCount),
                "rule {:?}",
                rule
            );
        }
    }
}

mod yearly_rule {
    use super::*;

    #[test]
    fn advances_one_year() {
        assert_eq!(next_date(d("20240126"), "20240113", "y"), Ok("20250113".into()));
    }

    #[test]
    fn old_start_catches_up_past_now() {
        // 20240113 is on-or-before now, so the loop continues to 2025
        assert_eq!(next_date(d("20240126"), "20200113", "y"), Ok("20250113".into()));
    }

    #[test]
    fn keeps_month_day_of_start() {
        let next = next_date(d("20261231"), "20200615", "y").unwrap();
        assert_eq!(&next[4..], "0615");
    }

    #[test]
    fn leap_day_rolls_to_march_first() {
        assert_eq!(next_date(d("20240301"), "20240229", "y"), Ok("20250301".into()));
    }

    #[test]
    fn leap_day_rolls_in_later_years_too() {
        assert_eq!(next_date(d("20270101"), "20240229", "y"), Ok("20270301".into()));
    }
}

mod weekly_rule {
    use super::*;

    #[test]
    fn picks_first_listed_weekday_after_now() {
        // now is Thursday Jan 25; next Monday(1)/Friday(5) is Friday Jan 26
        assert_eq!(next_date(d("20240125"), "20240120", "w 1,5"), Ok("20240126".into()));
    }

    #[test]
    fn sunday_is_seven() {
        assert_eq!(next_date(d("20240126"), "20240101", "w 7"), Ok("20240128".into()));
    }

    #[test]
    fn scans_from_start_not_from_now() {
        // start is months after now; first Monday after Dec 21 2024
        assert_eq!(next_date(d("20240101"), "20241220", "w 1"), Ok("20241223".into()));
    }

    #[test]
    fn no_earlier_matching_date_exists() {
        let now = d("20240125");
        let next = d(&next_date(now, "20240101", "w 3,6").unwrap());
        let mut probe = now.succ_opt().unwrap();
        while probe < next {
            let wd = chrono::Datelike::weekday(&probe).number_from_monday();
            assert!(wd != 3 && wd != 6, "{} should not match before {}", probe, next);
            probe = probe.succ_opt().unwrap();
        }
    }

    #[test]
    fn rejects_bad_weekday_lists() {
        for rule in ["w", "w 0", "w 8", "w 1,8", "w a", "w 1,,2"] {
            assert_eq!(
                next_date(d("20240101"), "20240101", rule),
                Err(NextDateError::InvalidWeekdays),
                "rule {:?}",
                rule
            );
        }
    }
}

mod monthly_rule {
    use super::*;

    #[test]
    fn last_day_of_month() {
        assert_eq!(next_date(d("20240110"), "20240101", "m -1"), Ok("20240131".into()));
    }

    #[test]
    fn last_day_rolls_to_leap_february() {
        assert_eq!(next_date(d("20240131"), "20240101", "m -1"), Ok("20240229".into()));
    }

    #[test]
    fn second_to_last_day() {
        assert_eq!(next_date(d("20240110"), "20240101", "m -2"), Ok("20240130".into()));
    }

    #[test]
    fn plain_day_of_month() {
        assert_eq!(next_date(d("20240126"), "20240113", "m 13"), Ok("20240213".into()));
    }

    #[test]
    fn restricted_to_listed_months() {
        assert_eq!(next_date(d("20240126"), "20240101", "m 15 3,6"), Ok("20240315".into()));
    }

    #[test]
    fn unsatisfiable_rule_fails_within_bound() {
        // No February has 31 days
        assert_eq!(
            next_date(d("20230101"), "20230101", "m 31 2"),
            Err(NextDateError::NoMatchFound)
        );
    }

    #[test]
    fn bound_is_configurable() {
        assert_eq!(
            next_date_bounded(d("20240101"), "20240101", "m 31 2", 2),
            Err(NextDateError::NoMatchFound)
        );
    }

    #[test]
    fn rejects_bad_month_day_lists() {
        for rule in ["m", "m 0", "m 32", "m -3", "m x", "m 1 2 3 4"] {
            assert_eq!(
                next_date(d("20240101"), "20240101", rule),
                Err(NextDateError::InvalidMonthDays),
                "rule {:?}",
                rule
            );
        }
    }

    #[test]
    fn rejects_bad_month_lists() {
        for rule in ["m 15 0", "m 15 13", "m 15 1,13", "m 15 x"] {
            assert_eq!(
                next_date(d("20240101"), "20240101", rule),
                Err(NextDateError::InvalidMonths),
                "rule {:?}",
                rule
            );
        }
    }
}

mod rule_parsing {
    use super::*;

    #[test]
    fn empty_rule_is_rejected() {
        assert_eq!(
            next_date(d("20240101"), "20240101", ""),
            Err(NextDateError::EmptyRule)
        );
    }

    #[test]
    fn unknown_leading_token_is_rejected() {
        for rule in ["x 5", "weekly", "1 d"] {
            assert_eq!(
                next_date(d("20240101"), "20240101", rule),
                Err(NextDateError::UnsupportedRule),
                "rule {:?}",
                rule
            );
        }
    }

    #[test]
    fn malformed_start_date_is_rejected() {
        for start in ["2024010", "2024-01-01", "20240230", "abcdefgh", ""] {
            assert_eq!(
                next_date(d("20240101"), start, "d 1"),
                Err(NextDateError::InvalidDate),
                "start {:?}",
                start
            );
        }
    }

    #[test]
    fn determinism_on_repeated_calls() {
        let args = (d("20240126"), "20240113", "w 2,4,6");
        let first = next_date(args.0, args.1, args.2);
        for _ in 0..3 {
            assert_eq!(next_date(args.0, args.1, args.2), first);
        }
    }
}
