use chrono::{Datelike, NaiveDate};

use crate::calendar::format_month_label;

/// Month-granular payoff date, e.g. `"April 2027"`.
pub fn format_payoff_date(date: NaiveDate) -> String {
    format_month_label(date.year(), date.month())
}

/// Compact duration, e.g. `"7 mo"`, `"2 yr"`, `"2 yr 3 mo"`.
pub fn format_months(months: u32) -> String {
    let years = months / 12;
    let rem = months % 12;
    match (years, rem) {
        (0, rem) => format!("{} mo", rem),
        (years, 0) => format!("{} yr", years),
        (years, rem) => format!("{} yr {} mo", years, rem),
    }
}
