use std::{fs, io::Write};

use crate::{
    calendar::{format_iso_date, parse_iso_date, parse_month_param, MonthWindow},
    config::Config,
    debt::{compare_extra_payment, format_months, format_payoff_date, LoanState, PayoffOutcome},
    errors::CliError,
    recurring::{occurrences_in_month, project_month, FlowKind, Frequency, RecurringRule},
};

use super::{
    output::{styled, MessageKind, Presenter},
    ParsedArgs, Shell,
};

const PAYOFF_USAGE: &str =
    "payoff <balance> <apr-percent> <monthly-payment> [--extra <amount>] [--schedule] [--json]";
const OCCURRENCES_USAGE: &str =
    "occurrences <weekly|biweekly|monthly> <YYYY-MM-DD> <YYYY-MM> [--json]";
const PROJECT_USAGE: &str = "project <rules.json> [YYYY-MM] [--json]";
const CONFIG_USAGE: &str = "config show | config path | config set <key> <value>";

fn parse_amount(label: &str, raw: &str) -> Result<f64, CliError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| CliError::Input(format!("{} `{}` is not a number", label, raw)))
}

fn parse_month(raw: &str) -> Result<MonthWindow, CliError> {
    let (year, month) = parse_month_param(raw)
        .ok_or_else(|| CliError::Input(format!("month `{}` must look like YYYY-MM", raw)))?;
    Ok(MonthWindow::new(year, month)?)
}

fn usage(text: &str) -> CliError {
    CliError::Input(format!("usage: {}", text))
}

impl<W: Write> Shell<W> {
    pub(crate) fn payoff(&mut self, args: &ParsedArgs) -> Result<(), CliError> {
        let [balance, rate, payment] = args.positional.as_slice() else {
            return Err(usage(PAYOFF_USAGE));
        };
        let loan = LoanState::new(
            parse_amount("balance", balance)?,
            parse_amount("rate", rate)?,
            parse_amount("payment", payment)?,
        );
        let extra = args
            .option("extra")
            .map(|raw| parse_amount("extra", raw))
            .transpose()?;
        let today = self.clock.today();

        if args.flag("json") {
            let json = match extra {
                Some(extra) => {
                    serde_json::to_string_pretty(&compare_extra_payment(&loan, extra, today))?
                }
                None => serde_json::to_string_pretty(&loan.payoff_on(today))?,
            };
            writeln!(self.out, "{}", json)?;
            return Ok(());
        }

        let presenter = Presenter::from_config(&self.config);
        writeln!(self.out, "{}", styled(MessageKind::Section, "Payoff plan"))?;
        writeln!(
            self.out,
            "Balance {} at {}% APR, paying {}/mo",
            presenter.money(loan.principal),
            loan.annual_rate_percent,
            presenter.money(loan.monthly_payment)
        )?;

        let base = loan.payoff_on(today);
        match &base {
            PayoffOutcome::Feasible(result) => {
                writeln!(
                    self.out,
                    "Debt-free by {} ({})",
                    format_payoff_date(result.payoff_date),
                    format_months(result.months_to_payoff)
                )?;
                writeln!(self.out, "Total paid: {}", presenter.money(result.total_paid))?;
                writeln!(
                    self.out,
                    "Total interest: {}",
                    presenter.money(result.total_interest)
                )?;
                if args.flag("schedule") {
                    for line in presenter.schedule_table(&result.schedule) {
                        writeln!(self.out, "{}", line)?;
                    }
                }
            }
            PayoffOutcome::Infeasible(reason) => {
                writeln!(self.out, "{}", styled(MessageKind::Warning, reason))?;
            }
        }

        if let Some(extra) = extra {
            let comparison = compare_extra_payment(&loan, extra, today);
            let boosted = comparison.boosted.as_ref().and_then(PayoffOutcome::feasible);
            match (boosted, comparison.months_saved, comparison.interest_saved) {
                (Some(boosted), Some(months), Some(interest)) => {
                    writeln!(
                        self.out,
                        "{}",
                        styled(
                            MessageKind::Success,
                            format!(
                                "Adding {}/mo: debt-free by {}, {} sooner, saving {} in interest",
                                presenter.money(extra),
                                format_payoff_date(boosted.payoff_date),
                                format_months(months),
                                presenter.money(interest)
                            )
                        )
                    )?;
                }
                (Some(boosted), _, _) => {
                    writeln!(
                        self.out,
                        "{}",
                        styled(
                            MessageKind::Success,
                            format!(
                                "Adding {}/mo pays it off by {}",
                                presenter.money(extra),
                                format_payoff_date(boosted.payoff_date)
                            )
                        )
                    )?;
                }
                (None, _, _) => {
                    writeln!(
                        self.out,
                        "{}",
                        styled(
                            MessageKind::Warning,
                            format!(
                                "Adding {}/mo still doesn't pay off this debt. Try a higher amount.",
                                presenter.money(extra)
                            )
                        )
                    )?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn occurrences(&mut self, args: &ParsedArgs) -> Result<(), CliError> {
        let [frequency, start, month] = args.positional.as_slice() else {
            return Err(usage(OCCURRENCES_USAGE));
        };
        let frequency: Frequency = frequency.parse()?;
        let window = parse_month(month)?;
        let start_date = parse_iso_date(start)?;
        let dates = occurrences_in_month(frequency, start_date, window);

        if args.flag("json") {
            let iso: Vec<String> = dates.iter().copied().map(format_iso_date).collect();
            writeln!(self.out, "{}", serde_json::to_string_pretty(&iso)?)?;
            return Ok(());
        }
        writeln!(
            self.out,
            "{}",
            styled(
                MessageKind::Section,
                format!("{} from {} in {}", frequency.label(), start, window.label())
            )
        )?;
        writeln!(self.out, "{} occurrence(s)", dates.len())?;
        let presenter = Presenter::from_config(&self.config);
        for date in dates {
            writeln!(
                self.out,
                "  {} ({})",
                format_iso_date(date),
                presenter.date(date)
            )?;
        }
        Ok(())
    }

    pub(crate) fn project(&mut self, args: &ParsedArgs) -> Result<(), CliError> {
        let (path, month) = match args.positional.as_slice() {
            [path] => (path, None),
            [path, month] => (path, Some(parse_month(month)?)),
            _ => return Err(usage(PROJECT_USAGE)),
        };
        let data = fs::read_to_string(path)?;
        let rules: Vec<RecurringRule> = serde_json::from_str(&data)
            .map_err(|err| CliError::Input(format!("rules file `{}`: {}", path, err)))?;
        let window =
            month.unwrap_or_else(|| MonthWindow::from_param_or_current(None, &*self.clock));
        let projection = project_month(&rules, window);

        if args.flag("json") {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&projection)?)?;
            return Ok(());
        }

        let presenter = Presenter::from_config(&self.config);
        writeln!(
            self.out,
            "{}",
            styled(
                MessageKind::Section,
                format!("Recurring totals for {}", window.label())
            )
        )?;
        for line in projection.firing_lines() {
            let name = line.label.clone().unwrap_or_else(|| match line.kind {
                FlowKind::Income => "Income".to_string(),
                FlowKind::Expense => "Expense".to_string(),
            });
            writeln!(
                self.out,
                "  {} ({}, {}x): {}",
                name,
                line.frequency.label(),
                line.occurrence_count(),
                presenter.money(line.month_total)
            )?;
        }
        writeln!(
            self.out,
            "Recurring income: {}",
            presenter.money(projection.recurring_income)
        )?;
        writeln!(
            self.out,
            "Recurring expense: {}",
            presenter.money(projection.recurring_expense)
        )?;
        writeln!(self.out, "Net: {}", presenter.money(projection.net()))?;
        Ok(())
    }

    pub(crate) fn config_command(&mut self, args: &ParsedArgs) -> Result<(), CliError> {
        match args
            .positional
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .as_slice()
        {
            ["show"] | [] => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(&self.config)?)?;
            }
            ["path"] => match &self.manager {
                Some(manager) => writeln!(self.out, "{}", manager.path().display())?,
                None => writeln!(
                    self.out,
                    "{}",
                    styled(MessageKind::Info, "configuration is not persisted")
                )?,
            },
            ["set", key, value] => {
                let mut updated: Config = self.config.clone();
                updated.set(key, value)?;
                if let Some(manager) = &self.manager {
                    manager.save(&updated)?;
                }
                self.config = updated;
                writeln!(
                    self.out,
                    "{}",
                    styled(MessageKind::Success, format!("{} set to {}", key, value))
                )?;
            }
            _ => return Err(usage(CONFIG_USAGE)),
        }
        Ok(())
    }

    pub(crate) fn help(&mut self) -> Result<(), CliError> {
        writeln!(self.out, "{}", styled(MessageKind::Section, "Commands"))?;
        for line in [
            PAYOFF_USAGE,
            OCCURRENCES_USAGE,
            PROJECT_USAGE,
            CONFIG_USAGE,
            "help",
            "exit",
        ] {
            writeln!(self.out, "  {}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use chrono::NaiveDate;

    fn run(line: &str) -> Result<String, CliError> {
        colored::control::set_override(false);
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        let mut shell = Shell::new(Config::default(), None, Box::new(clock), Vec::new());
        shell.run_line(line)?;
        Ok(String::from_utf8(shell.into_output()).unwrap())
    }

    #[test]
    fn amounts_accept_symbols_and_grouping() {
        assert_eq!(parse_amount("balance", "$5,000.50").unwrap(), 5000.5);
        assert!(parse_amount("balance", "five").is_err());
    }

    #[test]
    fn payoff_summary() {
        let text = run("payoff 5000 6 200").unwrap();
        assert!(text.contains("Debt-free by April 2027 (2 yr 3 mo)"), "{text}");
        assert!(text.contains("Total paid: $5,354.69"), "{text}");
        assert!(text.contains("Total interest: $354.69"), "{text}");
    }

    #[test]
    fn payoff_with_extra_reports_savings() {
        let text = run("payoff 5000 6 200 --extra 100").unwrap();
        assert!(text.contains("9 mo sooner"), "{text}");
        assert!(text.contains("saving $120.78 in interest"), "{text}");
    }

    #[test]
    fn infeasible_payoff_is_a_warning_not_an_error() {
        let text = run("payoff 5000 6 20").unwrap();
        assert!(text.contains("WARNING"), "{text}");
        assert!(text.contains("increase it"), "{text}");
    }

    #[test]
    fn payoff_json_is_tagged() {
        let text = run("payoff 1200 0 100 --json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "feasible");
        assert_eq!(value["detail"]["months_to_payoff"], 12);
        let text = run("payoff 1200 12 5 --json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "infeasible");
        assert_eq!(value["detail"]["reason"], "payment_below_interest");
    }

    #[test]
    fn schedule_table_lists_every_month() {
        let text = run("payoff 1200 0 100 --schedule").unwrap();
        assert!(text.contains("Month"));
        assert_eq!(text.lines().filter(|l| l.contains("$100.00")).count(), 13);
    }

    #[test]
    fn occurrences_listing() {
        let text = run("occurrences monthly 2024-01-31 2024-02").unwrap();
        assert!(text.contains("Monthly from 2024-01-31 in February 2024"), "{text}");
        assert!(text.contains("1 occurrence(s)"));
        assert!(text.contains("2024-02-29 (29 Feb 2024)"), "{text}");
    }

    #[test]
    fn occurrences_json_lists_each_date_once() {
        let text = run("occurrences biweekly 2024-01-01 2024-06 --json").unwrap();
        let dates: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(dates, vec!["2024-06-03", "2024-06-17"]);
    }

    #[test]
    fn occurrences_listing_pairs_iso_and_display_dates() {
        let text = run("occurrences weekly 2024-01-01 2024-06").unwrap();
        let listed: Vec<&str> = text.lines().filter(|l| l.starts_with("  ")).collect();
        assert_eq!(
            listed,
            vec![
                "  2024-06-03 (03 Jun 2024)",
                "  2024-06-10 (10 Jun 2024)",
                "  2024-06-17 (17 Jun 2024)",
                "  2024-06-24 (24 Jun 2024)",
            ]
        );
    }

    #[test]
    fn occurrences_reject_bad_arguments() {
        assert!(run("occurrences yearly 2024-01-01 2024-02").is_err());
        assert!(run("occurrences weekly 2024-01-01 Feb").is_err());
        assert!(run("occurrences weekly 01/01/2024 2024-02").is_err());
        assert!(run("occurrences weekly").is_err());
    }

    #[test]
    fn config_set_updates_presentation() {
        colored::control::set_override(false);
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        let mut shell = Shell::new(Config::default(), None, Box::new(clock), Vec::new());
        shell.run_line("config set currency EUR").unwrap();
        shell.run_line("config set locale de-DE").unwrap();
        assert_eq!(shell.config().currency, "EUR");
        shell.run_line("payoff 5000 6 200").unwrap();
        let text = String::from_utf8(shell.into_output()).unwrap();
        assert!(text.contains("Total paid: €5.354,69"), "{text}");
    }
}
