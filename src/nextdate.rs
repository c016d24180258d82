//! Recurrence-date calculator.
//!
//! Given a reference date, a start date, and a repeat rule, computes the next
//! occurrence strictly after the reference date. Pure calendar arithmetic:
//! no I/O, no shared state, deterministic on its inputs.

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Wire format for dates: 8 digits, `YYYYMMDD`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Forward-scan safety bound for the `w` and `m` rules, in years.
///
/// A weekday rule always matches within a week, but a month-day/month
/// combination can be unsatisfiable (day 31 restricted to February), so the
/// scan gives up once it passes `now + SCAN_BOUND_YEARS`.
pub const SCAN_BOUND_YEARS: i32 = 100;

/// Validation failures from rule parsing and date computation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NextDateError {
    #[error("invalid date format, expected YYYYMMDD")]
    InvalidDate,
    #[error("repeat rule is empty")]
    EmptyRule,
    #[error("unsupported repeat rule")]
    UnsupportedRule,
    #[error("day count must be between 1 and 400")]
    InvalidDayCount,
    #[error("week days must be between 1 and 7")]
    InvalidWeekdays,
    #[error("month days must be between 1 and 31 or -1, -2")]
    InvalidMonthDays,
    #[error("months must be between 1 and 12")]
    InvalidMonths,
    #[error("no matching date within the scan bound")]
    NoMatchFound,
}

/// A parsed repeat rule.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    /// `d <N>` - every N days.
    Daily(i64),
    /// `y` - every year.
    Yearly,
    /// `w <list>` - on the listed weekdays, Monday = 1 .. Sunday = 7.
    Weekly(Vec<u32>),
    /// `m <daylist> [monthlist]` - on the listed days of month, optionally
    /// restricted to the listed months. Negative day entries count from the
    /// end of the month: -1 is the last day, -2 the second-to-last.
    Monthly { days: Vec<i32>, months: Vec<u32> },
}

impl Rule {
    fn parse(rule: &str) -> Result<Self, NextDateError> {
        let parts: Vec<&str> = rule.split_whitespace().collect();
        let Some(&kind) = parts.first() else {
            return Err(NextDateError::EmptyRule);
        };

        match kind {
            "d" => {
                if parts.len() != 2 {
                    return Err(NextDateError::InvalidDayCount);
                }
                let days: i64 = parts[1]
                    .parse()
                    .map_err(|_| NextDateError::InvalidDayCount)?;
                if !(1..=400).contains(&days) {
                    return Err(NextDateError::InvalidDayCount);
                }
                Ok(Rule::Daily(days))
            }
            "y" => Ok(Rule::Yearly),
            "w" => {
                if parts.len() != 2 {
                    return Err(NextDateError::InvalidWeekdays);
                }
                let days = parse_numbers(parts[1], NextDateError::InvalidWeekdays)?;
                if days.iter().any(|&d| !(1..=7).contains(&d)) {
                    return Err(NextDateError::InvalidWeekdays);
                }
                Ok(Rule::Weekly(days.into_iter().map(|d| d as u32).collect()))
            }
            "m" => {
                if parts.len() < 2 || parts.len() > 3 {
                    return Err(NextDateError::InvalidMonthDays);
                }
                let days = parse_numbers(parts[1], NextDateError::InvalidMonthDays)?;
                if days.iter().any(|&d| d == 0 || d < -2 || d > 31) {
                    return Err(NextDateError::InvalidMonthDays);
                }
                let months = if parts.len() == 3 {
                    let months = parse_numbers(parts[2], NextDateError::InvalidMonths)?;
                    if months.iter().any(|&m| !(1..=12).contains(&m)) {
                        return Err(NextDateError::InvalidMonths);
                    }
                    months.into_iter().map(|m| m as u32).collect()
                } else {
                    (1..=12).collect()
                };
                Ok(Rule::Monthly { days, months })
            }
            _ => Err(NextDateError::UnsupportedRule),
        }
    }
}

/// Parse a comma-separated list of integers, mapping any failure to `err`.
fn parse_numbers(list: &str, err: NextDateError) -> Result<Vec<i32>, NextDateError> {
    if list.is_empty() {
        return Err(err);
    }
    list.split(',')
        .map(|n| n.trim().parse::<i32>().map_err(|_| err))
        .collect()
}

/// Advance a date by whole years.
///
/// Feb 29 in a non-leap target year rolls forward to March 1, matching the
/// overflow behavior of calendar addition rather than clamping to Feb 28.
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(NaiveDate::MAX)
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Compute the next occurrence of `rule` strictly after `now`.
///
/// `start` is the task's current date in `YYYYMMDD` form; the returned date
/// is in the same form. Uses the default [`SCAN_BOUND_YEARS`] bound for the
/// forward-scanning rules.
pub fn next_date(now: NaiveDate, start: &str, rule: &str) -> Result<String, NextDateError> {
    next_date_bounded(now, start, rule, SCAN_BOUND_YEARS)
}

/// Like [`next_date`] but with an explicit scan bound in years.
pub fn next_date_bounded(
    now: NaiveDate,
    start: &str,
    rule: &str,
    bound_years: i32,
) -> Result<String, NextDateError> {
    let start =
        NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| NextDateError::InvalidDate)?;
    if rule.is_empty() {
        return Err(NextDateError::EmptyRule);
    }
    let rule = Rule::parse(rule)?;
    let next = advance(now, start, &rule, bound_years)?;
    Ok(next.format(DATE_FORMAT).to_string())
}

fn advance(
    now: NaiveDate,
    start: NaiveDate,
    rule: &Rule,
    bound_years: i32,
) -> Result<NaiveDate, NextDateError> {
    match rule {
        Rule::Daily(step) => {
            let mut date = start;
            loop {
                date = date
                    .checked_add_signed(Duration::days(*step))
                    .ok_or(NextDateError::NoMatchFound)?;
                // Strictly after: a result equal to `now` keeps advancing.
                if date > now {
                    return Ok(date);
                }
            }
        }
        Rule::Yearly => {
            let mut date = shift_years(start, 1);
            while date <= now {
                date = shift_years(date, 1);
            }
            Ok(date)
        }
        Rule::Weekly(weekdays) => {
            let bound = shift_years(now, bound_years);
            let mut date = start;
            loop {
                date = date.succ_opt().ok_or(NextDateError::NoMatchFound)?;
                if date > bound {
                    return Err(NextDateError::NoMatchFound);
                }
                if date > now && weekdays.contains(&date.weekday().number_from_monday()) {
                    return Ok(date);
                }
            }
        }
        Rule::Monthly { days, months } => {
            let bound = shift_years(now, bound_years);
            let mut date = start;
            loop {
                date = date.succ_opt().ok_or(NextDateError::NoMatchFound)?;
                if date > bound {
                    return Err(NextDateError::NoMatchFound);
                }
                if date > now && months.contains(&date.month()) && day_matches(date, days) {
                    return Ok(date);
                }
            }
        }
    }
}

fn day_matches(date: NaiveDate, days: &[i32]) -> bool {
    let day = date.day() as i32;
    days.iter().any(|&entry| {
        if entry > 0 {
            entry == day
        } else {
            // -1 is the last day of the month, -2 the second-to-last.
            day == last_day_of_month(date) as i32 + entry + 1
        }
    })
}
