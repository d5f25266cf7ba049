//! Calendar helpers shared by the payoff calculator and the recurrence expander.

pub mod clock;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, Result};

pub use clock::{Clock, FixedClock, SystemClock};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One calendar month, bounded by its first and last day (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(BudgetError::InvalidMonth { year, month })?;
        let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .ok_or(BudgetError::InvalidMonth { year, month })?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// Window of the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .map(|next| next - Duration::days(1))
            .unwrap_or(date);
        Self {
            year: date.year(),
            month: date.month(),
            start,
            end,
        }
    }

    /// Resolves a `YYYY-MM` parameter, falling back to the clock's current month
    /// when the parameter is absent or malformed.
    pub fn from_param_or_current(param: Option<&str>, clock: &dyn Clock) -> Self {
        param
            .and_then(parse_month_param)
            .and_then(|(year, month)| Self::new(year, month).ok())
            .unwrap_or_else(|| Self::containing(clock.today()))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn len_days(&self) -> u32 {
        self.end.day()
    }

    pub fn param(&self) -> String {
        format_month_param(self.year, self.month)
    }

    pub fn label(&self) -> String {
        format_month_label(self.year, self.month)
    }
}

/// Number of days in the given month, or 0 when the month is out of range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(0)
}

/// Moves `date` by whole calendar months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.len() != 10 {
        return Err(BudgetError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|_| BudgetError::InvalidDate(raw.to_string()))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM` month parameter.
pub fn parse_month_param(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.trim().split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub fn format_month_param(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// `"June 2024"` style label.
pub fn format_month_label(year: i32, month: u32) -> String {
    match month_name(month) {
        Some(name) => format!("{} {}", name, year),
        None => format_month_param(year, month),
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}
