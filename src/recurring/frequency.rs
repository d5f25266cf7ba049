use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::errors::BudgetError;

/// How often a recurring rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
        }
    }

    /// Fixed step in days; `None` for calendar-month rules.
    pub fn interval_days(&self) -> Option<i64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::Biweekly => Some(14),
            Frequency::Monthly => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        if let Some(frequency) = Frequency::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalized)
        {
            return Ok(frequency);
        }
        let mut message = format!(
            "unknown frequency `{}` (expected weekly, biweekly, or monthly)",
            raw.trim()
        );
        if let Some(closest) = Frequency::ALL
            .into_iter()
            .map(|candidate| (levenshtein(candidate.as_str(), &normalized), candidate))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
        {
            message.push_str(&format!("; did you mean `{}`?", closest.1));
        }
        Err(BudgetError::InvalidInput(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!(" Biweekly ".parse::<Frequency>().unwrap(), Frequency::Biweekly);
        assert_eq!("MONTHLY".parse::<Frequency>().unwrap(), Frequency::Monthly);
    }

    #[test]
    fn unknown_names_suggest_closest() {
        let err = "wekly".parse::<Frequency>().unwrap_err();
        assert!(err.to_string().contains("did you mean `weekly`"), "{err}");
        let err = "fortnightly-ish".parse::<Frequency>().unwrap_err();
        assert!(!err.to_string().contains("did you mean"), "{err}");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Frequency::Biweekly).unwrap();
        assert_eq!(json, "\"biweekly\"");
        let parsed: Frequency = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(parsed, Frequency::Monthly);
    }

    #[test]
    fn intervals_and_labels() {
        assert_eq!(Frequency::Weekly.interval_days(), Some(7));
        assert_eq!(Frequency::Biweekly.interval_days(), Some(14));
        assert_eq!(Frequency::Monthly.interval_days(), None);
        assert_eq!(Frequency::Biweekly.label(), "Biweekly");
    }
}
