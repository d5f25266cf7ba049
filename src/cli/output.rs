use colored::Colorize;
use std::fmt;

use crate::{
    config::Config,
    currency::{format_currency_value, format_date, CurrencyCode, FormatOptions, LocaleConfig},
    debt::AmortizationRow,
};
use chrono::NaiveDate;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[ok]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Section => ("", ""),
    }
}

pub fn styled(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        return format!("=== {} ===", text.trim()).bold().to_string();
    }
    let (label, icon) = build_label(kind);
    let line = format!("{label}: {icon} {text}");
    match kind {
        MessageKind::Success => line.green().to_string(),
        MessageKind::Warning => line.yellow().to_string(),
        MessageKind::Error => line.red().bold().to_string(),
        MessageKind::Info | MessageKind::Section => line,
    }
}

/// Formats money and dates according to the loaded configuration.
pub struct Presenter {
    locale: LocaleConfig,
    currency: CurrencyCode,
    options: FormatOptions,
}

impl Presenter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            locale: config.locale_config(),
            currency: config.currency_code(),
            options: FormatOptions::default(),
        }
    }

    pub fn money(&self, amount: f64) -> String {
        format_currency_value(amount, &self.currency, &self.locale, &self.options)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }

    /// Fixed-width amortization table, header first.
    pub fn schedule_table(&self, rows: &[AmortizationRow]) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            format!(
                "{:>5}  {:>14}  {:>14}  {:>14}  {:>14}",
                "Month", "Payment", "Principal", "Interest", "Balance"
            )
            .bold()
            .to_string(),
        );
        for row in rows {
            lines.push(format!(
                "{:>5}  {:>14}  {:>14}  {:>14}  {:>14}",
                row.month_index,
                self.money(row.payment),
                self.money(row.principal_portion),
                self.money(row.interest_portion),
                self.money(row.ending_balance)
            ));
        }
        lines
    }
}
