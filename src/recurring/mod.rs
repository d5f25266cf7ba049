//! Recurring transactions: frequency rules, per-month occurrence expansion, and projections.

pub mod frequency;
pub mod occurrences;
pub mod projection;

pub use frequency::Frequency;
pub use occurrences::{generate_occurrences, occurrences_in_month, Occurrences};
pub use projection::{project_month, FlowKind, MonthProjection, ProjectionLine, RecurringRule};
