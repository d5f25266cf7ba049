//! Command surface for the `budgetu_cli` binary.
//!
//! Commands run either once from process arguments or line by line from a
//! script on stdin.

pub mod handlers;
pub mod output;

use std::{
    collections::{HashMap, HashSet},
    env,
    io::{BufRead, Write},
};

use strsim::levenshtein;

use crate::{
    calendar::{parse_iso_date, Clock, FixedClock, SystemClock},
    config::{Config, ConfigManager},
    errors::CliError,
};

use output::{styled, MessageKind};

pub const SCRIPT_ENV: &str = "BUDGETU_CLI_SCRIPT";
pub const TODAY_ENV: &str = "BUDGETU_TODAY";

pub const COMMANDS: [&str; 6] = ["payoff", "occurrences", "project", "config", "help", "exit"];

/// Options that consume the following argument as their value.
const VALUE_OPTIONS: [&str; 1] = ["extra"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<W: Write> {
    pub(crate) config: Config,
    pub(crate) manager: Option<ConfigManager>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(
        config: Config,
        manager: Option<ConfigManager>,
        clock: Box<dyn Clock>,
        out: W,
    ) -> Self {
        Self {
            config,
            manager,
            clock,
            out,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn execute(&mut self, args: &[String]) -> Result<Flow, CliError> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };
        let parsed = ParsedArgs::parse(rest)?;
        match command.as_str() {
            "payoff" => self.payoff(&parsed)?,
            "occurrences" => self.occurrences(&parsed)?,
            "project" => self.project(&parsed)?,
            "config" => self.config_command(&parsed)?,
            "help" => self.help()?,
            "exit" | "quit" => return Ok(Flow::Exit),
            other => {
                let mut message = format!("unknown command `{}`", other);
                if let Some(best) = suggest(other) {
                    message.push_str(&format!("; did you mean `{}`?", best));
                }
                return Err(CliError::Input(message));
            }
        }
        Ok(Flow::Continue)
    }

    pub fn run_line(&mut self, line: &str) -> Result<Flow, CliError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let words = shell_words::split(trimmed).map_err(|err| CliError::Input(err.to_string()))?;
        self.execute(&words)
    }

    /// Runs each line of `input`; failures are reported and the script continues.
    pub fn run_script<R: BufRead>(&mut self, input: R) -> Result<usize, CliError> {
        let mut failures = 0usize;
        for line in input.lines() {
            let line = line?;
            match self.run_line(&line) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    failures += 1;
                    tracing::debug!(line = %line, error = %err, "script command failed");
                    writeln!(self.out, "{}", styled(MessageKind::Error, err))?;
                }
            }
        }
        Ok(failures)
    }
}

/// Closest known command within an edit distance of three.
pub fn suggest(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|name| (levenshtein(name, input), *name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

/// `BUDGETU_TODAY=YYYY-MM-DD` pins the clock; the system clock is used otherwise.
pub fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            Ok(Box::new(FixedClock::new(parse_iso_date(&raw)?)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}

#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub positional: Vec<String>,
    flags: HashSet<String>,
    options: HashMap<String, String>,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.strip_prefix("--") {
                Some(name) if VALUE_OPTIONS.contains(&name) => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Input(format!("`--{}` needs a value", name)))?;
                    parsed.options.insert(name.to_string(), value.clone());
                }
                Some(name) if !name.is_empty() => {
                    parsed.flags.insert(name.to_string());
                }
                _ => parsed.positional.push(arg.clone()),
            }
        }
        Ok(parsed)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}
