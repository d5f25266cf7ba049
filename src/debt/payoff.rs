//! Month-by-month payoff simulation for a single debt.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{shift_month, Clock};
use crate::currency::round_cents;

/// Simulation stops after 100 years of monthly periods.
pub const MAX_PAYOFF_MONTHS: u32 = 1200;

/// Snapshot of a debt at the moment a payoff projection is requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub monthly_payment: f64,
}

impl LoanState {
    pub fn new(principal: f64, annual_rate_percent: f64, monthly_payment: f64) -> Self {
        Self {
            principal,
            annual_rate_percent,
            monthly_payment,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    /// Same debt with `extra` added to every monthly payment.
    pub fn with_extra_payment(&self, extra: f64) -> Self {
        Self {
            monthly_payment: self.monthly_payment + extra,
            ..*self
        }
    }

    pub fn payoff_on(&self, today: NaiveDate) -> PayoffOutcome {
        calculate_payoff(
            self.principal,
            self.annual_rate_percent,
            self.monthly_payment,
            today,
        )
    }

    pub fn payoff(&self, clock: &dyn Clock) -> PayoffOutcome {
        self.payoff_on(clock.today())
    }
}

/// One simulated month. Currency fields are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month_index: u32,
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub ending_balance: f64,
}

impl AmortizationRow {
    fn rounded(month_index: u32, payment: f64, principal: f64, interest: f64, balance: f64) -> Self {
        Self {
            month_index,
            payment: round_cents(payment),
            principal_portion: round_cents(principal),
            interest_portion: round_cents(interest),
            ending_balance: round_cents(balance),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    pub months_to_payoff: u32,
    pub payoff_date: NaiveDate,
    pub total_paid: f64,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationRow>,
}

impl PayoffResult {
    fn settled(today: NaiveDate) -> Self {
        Self {
            months_to_payoff: 0,
            payoff_date: today,
            total_paid: 0.0,
            total_interest: 0.0,
            schedule: Vec::new(),
        }
    }

    fn from_schedule(
        principal: f64,
        schedule: Vec<AmortizationRow>,
        interest_bearing: bool,
        today: NaiveDate,
    ) -> Self {
        let months_to_payoff = schedule.len() as u32;
        let total_paid = round_cents(schedule.iter().map(|row| row.payment).sum());
        let total_interest = if interest_bearing {
            round_cents(total_paid - principal)
        } else {
            0.0
        };
        Self {
            months_to_payoff,
            payoff_date: shift_month(today, months_to_payoff),
            total_paid,
            total_interest,
            schedule,
        }
    }

    pub fn final_row(&self) -> Option<&AmortizationRow> {
        self.schedule.last()
    }
}

/// Why a payment plan can never retire the debt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Infeasibility {
    /// Zero-interest debt with a payment of zero or less.
    NonPositivePayment,
    /// The payment does not exceed the interest accrued in the first month.
    PaymentBelowInterest { monthly_interest: f64 },
    /// Non-finite amounts or a negative rate.
    InvalidInput,
    /// Balance still outstanding after the simulation horizon.
    ExceedsHorizon { months: u32 },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::NonPositivePayment => {
                write!(f, "a payment of zero or less never reduces the balance; increase it")
            }
            Infeasibility::PaymentBelowInterest { monthly_interest } => write!(
                f,
                "payment doesn't cover the {:.2} monthly interest; increase it",
                monthly_interest
            ),
            Infeasibility::InvalidInput => {
                write!(f, "balance, rate, and payment must be valid non-negative amounts")
            }
            Infeasibility::ExceedsHorizon { months } => write!(
                f,
                "payment is too small to clear the balance within {} months; increase it",
                months
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PayoffOutcome {
    Feasible(PayoffResult),
    Infeasible(Infeasibility),
}

impl PayoffOutcome {
    pub fn feasible(&self) -> Option<&PayoffResult> {
        match self {
            PayoffOutcome::Feasible(result) => Some(result),
            PayoffOutcome::Infeasible(_) => None,
        }
    }

    pub fn into_feasible(self) -> Option<PayoffResult> {
        match self {
            PayoffOutcome::Feasible(result) => Some(result),
            PayoffOutcome::Infeasible(_) => None,
        }
    }

    pub fn infeasibility(&self) -> Option<Infeasibility> {
        match self {
            PayoffOutcome::Feasible(_) => None,
            PayoffOutcome::Infeasible(reason) => Some(*reason),
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, PayoffOutcome::Feasible(_))
    }
}

/// Simulates paying `monthly_payment` each month against `principal` accruing
/// `annual_rate_percent` APR, compounded monthly.
///
/// `today` anchors `payoff_date`; only its month matters to callers.
pub fn calculate_payoff(
    principal: f64,
    annual_rate_percent: f64,
    monthly_payment: f64,
    today: NaiveDate,
) -> PayoffOutcome {
    if principal.is_nan() {
        return PayoffOutcome::Infeasible(Infeasibility::InvalidInput);
    }
    if principal <= 0.0 {
        return PayoffOutcome::Feasible(PayoffResult::settled(today));
    }
    if !principal.is_finite()
        || !annual_rate_percent.is_finite()
        || annual_rate_percent < 0.0
        || !monthly_payment.is_finite()
    {
        debug!(
            principal,
            annual_rate_percent, monthly_payment, "rejected payoff inputs"
        );
        return PayoffOutcome::Infeasible(Infeasibility::InvalidInput);
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let outcome = if monthly_rate == 0.0 {
        interest_free_schedule(principal, monthly_payment)
    } else {
        interest_bearing_schedule(principal, monthly_rate, monthly_payment)
    };

    match outcome {
        Ok(schedule) => {
            let result =
                PayoffResult::from_schedule(principal, schedule, monthly_rate != 0.0, today);
            debug!(
                months = result.months_to_payoff,
                total_paid = result.total_paid,
                total_interest = result.total_interest,
                "computed payoff schedule"
            );
            PayoffOutcome::Feasible(result)
        }
        Err(reason) => {
            debug!(%reason, "payoff infeasible");
            PayoffOutcome::Infeasible(reason)
        }
    }
}

/// Straight-line payoff counted in whole cents, so float residue never adds a month.
fn interest_free_schedule(
    principal: f64,
    monthly_payment: f64,
) -> Result<Vec<AmortizationRow>, Infeasibility> {
    let payment_cents = to_cents(monthly_payment);
    if monthly_payment <= 0.0 || payment_cents == 0 {
        return Err(Infeasibility::NonPositivePayment);
    }
    let principal_cents = to_cents(principal);
    let months = principal_cents.div_ceil(payment_cents);
    if months > u64::from(MAX_PAYOFF_MONTHS) {
        warn!(principal, monthly_payment, "interest-free payoff exceeds horizon");
        return Err(Infeasibility::ExceedsHorizon {
            months: MAX_PAYOFF_MONTHS,
        });
    }

    let schedule = (1..=months)
        .map(|month| {
            let remaining = principal_cents.saturating_sub(month * payment_cents);
            let paid = if month == months {
                principal_cents - (months - 1) * payment_cents
            } else {
                payment_cents
            };
            AmortizationRow::rounded(
                month as u32,
                from_cents(paid),
                from_cents(paid),
                0.0,
                from_cents(remaining),
            )
        })
        .collect();
    Ok(schedule)
}

fn to_cents(amount: f64) -> u64 {
    (amount * 100.0).round() as u64
}

fn from_cents(cents: u64) -> f64 {
    cents as f64 / 100.0
}

fn interest_bearing_schedule(
    principal: f64,
    monthly_rate: f64,
    monthly_payment: f64,
) -> Result<Vec<AmortizationRow>, Infeasibility> {
    let first_interest = principal * monthly_rate;
    if monthly_payment <= first_interest {
        return Err(Infeasibility::PaymentBelowInterest {
            monthly_interest: round_cents(first_interest),
        });
    }

    let schedule: Vec<AmortizationRow> = Amortization::new(principal, monthly_rate, monthly_payment)
        .take(MAX_PAYOFF_MONTHS as usize + 1)
        .collect();
    if schedule.len() > MAX_PAYOFF_MONTHS as usize {
        warn!(
            principal,
            monthly_rate, monthly_payment, "payoff simulation hit the horizon guard"
        );
        return Err(Infeasibility::ExceedsHorizon {
            months: MAX_PAYOFF_MONTHS,
        });
    }
    Ok(schedule)
}

/// Yields one row per month until the balance reaches zero.
struct Amortization {
    balance: f64,
    month_index: u32,
    monthly_rate: f64,
    monthly_payment: f64,
}

impl Amortization {
    fn new(principal: f64, monthly_rate: f64, monthly_payment: f64) -> Self {
        Self {
            balance: principal,
            month_index: 0,
            monthly_rate,
            monthly_payment,
        }
    }
}

impl Iterator for Amortization {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.balance <= 0.0 {
            return None;
        }
        self.month_index += 1;
        let interest = self.balance * self.monthly_rate;
        let due = self.balance + interest;
        // The closing payment settles exactly; no residue carries into another month.
        let (payment, principal_portion, closing) = if self.monthly_payment >= due {
            (due, self.balance, 0.0)
        } else {
            let principal_portion = self.monthly_payment - interest;
            (
                self.monthly_payment,
                principal_portion,
                (self.balance - principal_portion).max(0.0),
            )
        };
        self.balance = closing;
        Some(AmortizationRow::rounded(
            self.month_index,
            payment,
            principal_portion,
            interest,
            closing,
        ))
    }
}
