//! Command-line rendition of a recurrence rule.

use std::str::FromStr;

use beatplan_core::{Frequency, RecurrenceRule, Until, Weekdays};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::error::BpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// `permanent` or an ISO date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UntilArg(pub Until);

impl FromStr for UntilArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("permanent") {
            return Ok(UntilArg(Until::Permanent));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| UntilArg(Until::Date(d)))
            .map_err(|e| format!("expected YYYY-MM-DD or 'permanent': {e}"))
    }
}

#[derive(Debug, Clone, Args)]
pub struct RuleArgs {
    /// Repetition: daily, weekly, monthly or custom
    #[arg(long, value_enum)]
    pub frequency: FrequencyArg,

    /// Weekday indices for weekly/monthly, 0 = Sunday .. 6 = Saturday
    #[arg(long, value_delimiter = ',')]
    pub weekdays: Vec<u8>,

    /// Days between visits for custom frequency
    #[arg(long)]
    pub interval: Option<u32>,

    /// Last date (YYYY-MM-DD) or "permanent"
    #[arg(long, default_value = "permanent")]
    pub until: UntilArg,
}

impl RuleArgs {
    pub fn to_rule(&self) -> Result<RecurrenceRule, BpError> {
        let frequency = match self.frequency {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly {
                weekdays: Weekdays::from_indices(self.weekdays.iter().copied())?,
            },
            FrequencyArg::Monthly => Frequency::Monthly {
                weekdays: Weekdays::from_indices(self.weekdays.iter().copied())?,
            },
            FrequencyArg::Custom => Frequency::CustomInterval {
                interval_days: self.interval.ok_or(BpError::MissingInterval)?,
            },
        };

        Ok(RecurrenceRule {
            frequency,
            until: self.until.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatplan_core::InvalidRuleError;

    fn args(frequency: FrequencyArg) -> RuleArgs {
        RuleArgs {
            frequency,
            weekdays: vec![],
            interval: None,
            until: UntilArg(Until::Permanent),
        }
    }

    #[test]
    fn parses_until() {
        assert_eq!(
            "permanent".parse::<UntilArg>().unwrap(),
            UntilArg(Until::Permanent)
        );
        assert_eq!(
            "2024-02-29".parse::<UntilArg>().unwrap(),
            UntilArg(Until::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!("next week".parse::<UntilArg>().is_err());
    }

    #[test]
    fn weekly_uses_weekday_indices() {
        let mut a = args(FrequencyArg::Weekly);
        a.weekdays = vec![1, 3];
        assert_eq!(
            a.to_rule().unwrap().frequency,
            Frequency::Weekly {
                weekdays: Weekdays::from_indices([1, 3]).unwrap()
            }
        );
    }

    #[test]
    fn out_of_range_weekday_is_a_rule_error() {
        let mut a = args(FrequencyArg::Monthly);
        a.weekdays = vec![8];
        assert!(matches!(
            a.to_rule(),
            Err(BpError::Rule(InvalidRuleError::WeekdayOutOfRange(8)))
        ));
    }

    #[test]
    fn custom_requires_interval() {
        assert!(matches!(
            args(FrequencyArg::Custom).to_rule(),
            Err(BpError::MissingInterval)
        ));

        let mut a = args(FrequencyArg::Custom);
        a.interval = Some(4);
        assert_eq!(
            a.to_rule().unwrap().frequency,
            Frequency::CustomInterval { interval_days: 4 }
        );
    }
}
