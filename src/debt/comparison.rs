//! "What if I paid a little more each month?" comparisons.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::round_cents;

use super::payoff::{LoanState, PayoffOutcome};

/// Base plan against the same debt with an extra amount added to every payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentComparison {
    pub extra_payment: f64,
    pub base: PayoffOutcome,
    /// Absent when `extra_payment` is not positive.
    pub boosted: Option<PayoffOutcome>,
    pub months_saved: Option<u32>,
    pub interest_saved: Option<f64>,
}

impl PaymentComparison {
    /// True when the base plan is infeasible but the boosted one pays the debt off.
    pub fn extra_makes_feasible(&self) -> bool {
        !self.base.is_feasible()
            && self
                .boosted
                .as_ref()
                .map(PayoffOutcome::is_feasible)
                .unwrap_or(false)
    }
}

pub fn compare_extra_payment(loan: &LoanState, extra: f64, today: NaiveDate) -> PaymentComparison {
    let base = loan.payoff_on(today);
    let boosted = (extra.is_finite() && extra > 0.0)
        .then(|| loan.with_extra_payment(extra).payoff_on(today));

    let savings = match (base.feasible(), boosted.as_ref().and_then(|o| o.feasible())) {
        (Some(base), Some(boosted)) => Some((
            base.months_to_payoff
                .saturating_sub(boosted.months_to_payoff),
            round_cents(base.total_interest - boosted.total_interest),
        )),
        _ => None,
    };

    PaymentComparison {
        extra_payment: extra,
        base,
        boosted,
        months_saved: savings.map(|(months, _)| months),
        interest_saved: savings.map(|(_, interest)| interest),
    }
}
