//! Debt payoff projections: amortization schedules and extra-payment comparisons.

pub mod comparison;
pub mod display;
pub mod payoff;

pub use comparison::{compare_extra_payment, PaymentComparison};
pub use display::{format_months, format_payoff_date};
pub use payoff::{
    calculate_payoff, AmortizationRow, Infeasibility, LoanState, PayoffOutcome, PayoffResult,
    MAX_PAYOFF_MONTHS,
};
