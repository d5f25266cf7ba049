//! Expands a recurring rule into the calendar dates it fires on within one month.

use std::iter::FusedIterator;

use chrono::{Datelike, Duration, NaiveDate};

use crate::calendar::{format_iso_date, parse_iso_date, MonthWindow};
use crate::errors::Result;

use super::Frequency;

/// Lazy, ascending sequence of occurrence dates inside a [`MonthWindow`].
///
/// Cloning yields an independent iterator from the same position, so an
/// expansion can be replayed without recomputing its starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrences {
    cursor: Option<NaiveDate>,
    step_days: Option<i64>,
    window_end: NaiveDate,
}

impl Occurrences {
    pub fn new(frequency: Frequency, start_date: NaiveDate, window: MonthWindow) -> Self {
        let step_days = frequency.interval_days();
        let cursor = if start_date > window.end {
            None
        } else {
            match step_days {
                None => monthly_anchor(start_date, window),
                Some(interval) => Some(first_on_or_after(start_date, window.start, interval)),
            }
        };
        Self {
            cursor: cursor.filter(|date| *date <= window.end),
            step_days,
            window_end: window.end,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self
            .step_days
            .and_then(|days| current.checked_add_signed(Duration::days(days)))
            .filter(|next| *next <= self.window_end);
        Some(current)
    }
}

impl FusedIterator for Occurrences {}

/// Anchor day clamped to the window's month length, kept only when the series has begun.
fn monthly_anchor(start_date: NaiveDate, window: MonthWindow) -> Option<NaiveDate> {
    let day = start_date.day().min(window.len_days());
    window
        .start
        .with_day(day)
        .filter(|date| *date >= start_date && *date >= window.start)
}

/// Jumps whole intervals from `start_date` to the first step on/after `month_start`.
fn first_on_or_after(start_date: NaiveDate, month_start: NaiveDate, interval: i64) -> NaiveDate {
    if start_date >= month_start {
        return start_date;
    }
    let gap = (month_start - start_date).num_days();
    let skipped = gap.div_euclid(interval);
    let mut cursor = start_date + Duration::days(skipped * interval);
    if cursor < month_start {
        cursor += Duration::days(interval);
    }
    cursor
}

pub fn occurrences_in_month(
    frequency: Frequency,
    start_date: NaiveDate,
    window: MonthWindow,
) -> Vec<NaiveDate> {
    Occurrences::new(frequency, start_date, window).collect()
}

/// Occurrence dates (`YYYY-MM-DD`) of a rule within `year`/`month`.
///
/// Errors only on a malformed `start_date` or an out-of-range month.
pub fn generate_occurrences(
    frequency: Frequency,
    start_date: &str,
    year: i32,
    month: u32,
) -> Result<Vec<String>> {
    let start = parse_iso_date(start_date)?;
    let window = MonthWindow::new(year, month)?;
    Ok(Occurrences::new(frequency, start, window)
        .map(format_iso_date)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BudgetError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(y: i32, m: u32) -> MonthWindow {
        MonthWindow::new(y, m).unwrap()
    }

    #[test]
    fn monthly_clamps_to_leap_february() {
        assert_eq!(
            generate_occurrences(Frequency::Monthly, "2024-01-31", 2024, 2).unwrap(),
            vec!["2024-02-29"]
        );
        assert_eq!(
            generate_occurrences(Frequency::Monthly, "2023-01-31", 2023, 2).unwrap(),
            vec!["2023-02-28"]
        );
        assert_eq!(
            generate_occurrences(Frequency::Monthly, "2024-01-31", 2024, 4).unwrap(),
            vec!["2024-04-30"]
        );
    }

    #[test]
    fn monthly_fires_in_its_start_month_only_from_the_anchor() {
        assert_eq!(
            occurrences_in_month(Frequency::Monthly, date(2024, 3, 15), window(2024, 3)),
            vec![date(2024, 3, 15)]
        );
        assert!(
            occurrences_in_month(Frequency::Monthly, date(2024, 3, 15), window(2024, 2))
                .is_empty()
        );
    }

    #[test]
    fn weekly_fast_forwards_to_target_month() {
        let dates = occurrences_in_month(Frequency::Weekly, date(2024, 1, 1), window(2024, 6));
        assert_eq!(
            dates,
            vec![
                date(2024, 6, 3),
                date(2024, 6, 10),
                date(2024, 6, 17),
                date(2024, 6, 24)
            ]
        );
        assert!(dates.iter().all(|d| d.weekday() == chrono::Weekday::Mon));
    }

    #[test]
    fn biweekly_keeps_phase_with_start() {
        assert_eq!(
            occurrences_in_month(Frequency::Biweekly, date(2024, 1, 1), window(2024, 6)),
            vec![date(2024, 6, 3), date(2024, 6, 17)]
        );
        assert_eq!(
            occurrences_in_month(Frequency::Biweekly, date(2024, 1, 8), window(2024, 6)),
            vec![date(2024, 6, 10), date(2024, 6, 24)]
        );
    }

    #[test]
    fn weekly_starting_mid_month_skips_earlier_days() {
        assert_eq!(
            occurrences_in_month(Frequency::Weekly, date(2024, 6, 12), window(2024, 6)),
            vec![date(2024, 6, 12), date(2024, 6, 19), date(2024, 6, 26)]
        );
    }

    #[test]
    fn start_on_month_start_is_included() {
        assert_eq!(
            occurrences_in_month(Frequency::Weekly, date(2024, 5, 4), window(2024, 6))[0],
            date(2024, 6, 1)
        );
        assert_eq!(
            occurrences_in_month(Frequency::Weekly, date(2024, 6, 1), window(2024, 6)).len(),
            5
        );
    }

    #[test]
    fn rules_starting_after_the_month_are_empty() {
        for frequency in Frequency::ALL {
            assert!(
                generate_occurrences(frequency, "2024-07-01", 2024, 6)
                    .unwrap()
                    .is_empty(),
                "{frequency}"
            );
        }
    }

    #[test]
    fn start_on_last_day_of_month() {
        assert_eq!(
            occurrences_in_month(Frequency::Weekly, date(2024, 6, 30), window(2024, 6)),
            vec![date(2024, 6, 30)]
        );
    }

    #[test]
    fn expansion_is_idempotent_and_replayable() {
        let first = generate_occurrences(Frequency::Biweekly, "2023-11-20", 2024, 3).unwrap();
        let second = generate_occurrences(Frequency::Biweekly, "2023-11-20", 2024, 3).unwrap();
        assert_eq!(first, second);

        let iter = Occurrences::new(Frequency::Weekly, date(2024, 1, 1), window(2024, 6));
        let replay = iter.clone();
        assert_eq!(iter.collect::<Vec<_>>(), replay.collect::<Vec<_>>());
    }

    #[test]
    fn far_past_start_dates_still_land_on_phase() {
        let start = date(1990, 1, 1);
        let dates = occurrences_in_month(Frequency::Weekly, start, window(2024, 6));
        assert_eq!(dates.len(), 4);
        for d in dates {
            assert_eq!((d - start).num_days() % 7, 0);
        }
    }

    #[test]
    fn malformed_inputs_are_errors() {
        assert!(matches!(
            generate_occurrences(Frequency::Weekly, "06/01/2024", 2024, 6),
            Err(BudgetError::InvalidDate(_))
        ));
        assert!(matches!(
            generate_occurrences(Frequency::Weekly, "2024-06-01", 2024, 13),
            Err(BudgetError::InvalidMonth { year: 2024, month: 13 })
        ));
    }

    #[test]
    fn iterator_is_fused() {
        let mut iter = Occurrences::new(Frequency::Monthly, date(2024, 1, 5), window(2024, 2));
        assert_eq!(iter.next(), Some(date(2024, 2, 5)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
