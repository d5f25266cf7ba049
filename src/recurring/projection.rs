//! Monthly totals projected from recurring income and expense rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::MonthWindow;
use crate::currency::round_cents;

use super::{Frequency, Occurrences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

/// A recurring income or expense as stored by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub kind: FlowKind,
    pub amount: f64,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_active() -> bool {
    true
}

impl RecurringRule {
    pub fn new(kind: FlowKind, amount: f64, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            frequency,
            start_date,
            is_active: true,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn occurrences_in(&self, window: MonthWindow) -> Occurrences {
        Occurrences::new(self.frequency, self.start_date, window)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionLine {
    pub rule_id: Uuid,
    pub kind: FlowKind,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub occurrences: Vec<NaiveDate>,
    pub month_total: f64,
}

impl ProjectionLine {
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    pub window: MonthWindow,
    pub lines: Vec<ProjectionLine>,
    pub recurring_income: f64,
    pub recurring_expense: f64,
}

impl MonthProjection {
    pub fn net(&self) -> f64 {
        round_cents(self.recurring_income - self.recurring_expense)
    }

    /// Lines for rules that fire at least once in the month.
    pub fn firing_lines(&self) -> impl Iterator<Item = &ProjectionLine> {
        self.lines.iter().filter(|line| line.occurrence_count() > 0)
    }
}

/// Projects every active rule onto `window`, totalling `occurrences * amount` per flow kind.
pub fn project_month(rules: &[RecurringRule], window: MonthWindow) -> MonthProjection {
    let lines: Vec<ProjectionLine> = rules
        .iter()
        .filter(|rule| rule.is_active)
        .map(|rule| {
            let occurrences: Vec<NaiveDate> = rule.occurrences_in(window).collect();
            let month_total = round_cents(occurrences.len() as f64 * rule.amount);
            ProjectionLine {
                rule_id: rule.id,
                kind: rule.kind,
                frequency: rule.frequency,
                label: rule.label.clone(),
                occurrences,
                month_total,
            }
        })
        .collect();

    let total_for = |kind: FlowKind| {
        round_cents(
            lines
                .iter()
                .filter(|line| line.kind == kind)
                .map(|line| line.month_total)
                .sum(),
        )
    };
    let recurring_income = total_for(FlowKind::Income);
    let recurring_expense = total_for(FlowKind::Expense);

    debug!(
        month = %window.param(),
        rules = lines.len(),
        recurring_income,
        recurring_expense,
        "projected recurring totals"
    );

    MonthProjection {
        window,
        lines,
        recurring_income,
        recurring_expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_split_by_kind() {
        let rules = vec![
            RecurringRule::new(FlowKind::Income, 450.0, Frequency::Biweekly, date(2024, 1, 5))
                .with_label("Campus job"),
            RecurringRule::new(FlowKind::Expense, 12.99, Frequency::Monthly, date(2023, 9, 30))
                .with_label("Streaming"),
            RecurringRule::new(FlowKind::Expense, 40.0, Frequency::Weekly, date(2024, 5, 27)),
        ];
        let projection = project_month(&rules, MonthWindow::new(2024, 6).unwrap());

        // Biweekly from Jan 5 lands on Jun 7 and Jun 21.
        assert_eq!(
            projection.lines[0].occurrences,
            vec![date(2024, 6, 7), date(2024, 6, 21)]
        );
        assert_eq!(projection.lines[1].occurrences, vec![date(2024, 6, 30)]);
        assert_eq!(projection.lines[2].occurrence_count(), 4);
        assert_eq!(projection.recurring_income, 900.0);
        assert_eq!(projection.recurring_expense, 172.99);
        assert_eq!(projection.net(), 727.01);
    }

    #[test]
    fn inactive_and_future_rules() {
        let mut paused =
            RecurringRule::new(FlowKind::Expense, 30.0, Frequency::Weekly, date(2024, 1, 1));
        paused.is_active = false;
        let future =
            RecurringRule::new(FlowKind::Income, 100.0, Frequency::Monthly, date(2024, 8, 1));
        let projection = project_month(&[paused, future], MonthWindow::new(2024, 6).unwrap());
        assert_eq!(projection.lines.len(), 1);
        assert_eq!(projection.firing_lines().count(), 0);
        assert_eq!(projection.recurring_income, 0.0);
        assert_eq!(projection.recurring_expense, 0.0);
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "kind": "expense",
            "amount": 9.5,
            "frequency": "weekly",
            "start_date": "2024-02-01"
        }"#;
        let rule: RecurringRule = serde_json::from_str(json).unwrap();
        assert!(rule.is_active);
        assert!(rule.label.is_none());
        assert_eq!(rule.frequency, Frequency::Weekly);
    }
}
