#![doc(test(attr(deny(warnings))))]

//! BudgetU core: debt payoff simulation and recurring-transaction scheduling
//! for student budgets.
//!
//! Both engines are pure functions of their inputs. "Today" is always passed
//! in (directly or through a [`calendar::Clock`]) so results are reproducible.
//!
//! ```
//! use budgetu_core::debt::calculate_payoff;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! let plan = calculate_payoff(1200.0, 0.0, 100.0, today).into_feasible().unwrap();
//! assert_eq!(plan.months_to_payoff, 12);
//! ```

pub mod calendar;
pub mod cli;
pub mod config;
pub mod currency;
pub mod debt;
pub mod errors;
pub mod recurring;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("BudgetU core tracing initialized.");
    });
}
