use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::weekday::Weekdays;

/// Horizon used when a rule has no end date.
pub const PERMANENT_HORIZON_DAYS: u64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRuleError {
    #[error("end date {until} is before anchor date {anchor}")]
    EndBeforeAnchor { anchor: NaiveDate, until: NaiveDate },

    #[error("custom interval must be at least one day")]
    ZeroInterval,

    #[error("weekly and monthly rules need at least one weekday")]
    NoWeekdays,

    #[error("weekday index {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    WeekdayOutOfRange(u8),
}

/// How often a beat repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly { weekdays: Weekdays },
    /// Filters by weekday exactly like `Weekly`. Week-of-month and
    /// day-of-month refinements are not modelled.
    Monthly { weekdays: Weekdays },
    /// Every `interval_days` days counted from the anchor date.
    CustomInterval { interval_days: u32 },
}

impl Frequency {
    /// Whether `day` is an occurrence for a rule anchored at `anchor`.
    pub fn includes(&self, day: NaiveDate, anchor: NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Weekly { weekdays } | Frequency::Monthly { weekdays } => {
                weekdays.contains(day.weekday())
            }
            Frequency::CustomInterval { interval_days } => {
                *interval_days != 0
                    && (day - anchor).num_days().rem_euclid(i64::from(*interval_days)) == 0
            }
        }
    }
}

/// End condition of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Until {
    Date(NaiveDate),
    Permanent,
}

impl Until {
    /// Resolves to a concrete, inclusive end date.
    pub fn resolve(&self, anchor: NaiveDate) -> NaiveDate {
        match self {
            Until::Date(date) => *date,
            Until::Permanent => anchor
                .checked_add_days(Days::new(PERMANENT_HORIZON_DAYS))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

/// A beat's repetition pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub frequency: Frequency,
    pub until: Until,
}

impl RecurrenceRule {
    pub fn validate(&self, anchor: NaiveDate) -> Result<(), InvalidRuleError> {
        match &self.frequency {
            Frequency::Daily => {}
            Frequency::Weekly { weekdays } | Frequency::Monthly { weekdays } => {
                if weekdays.is_empty() {
                    return Err(InvalidRuleError::NoWeekdays);
                }
            }
            Frequency::CustomInterval { interval_days } => {
                if *interval_days == 0 {
                    return Err(InvalidRuleError::ZeroInterval);
                }
            }
        }

        if let Until::Date(until) = self.until {
            if until < anchor {
                return Err(InvalidRuleError::EndBeforeAnchor { anchor, until });
            }
        }

        Ok(())
    }

    /// Occurrence dates from `anchor` through the resolved end date, ascending.
    ///
    /// Walks the range one day at a time and filters.
    pub fn occurrences(
        &self,
        anchor: NaiveDate,
    ) -> Result<impl Iterator<Item = NaiveDate> + '_, InvalidRuleError> {
        self.validate(anchor)?;
        let end = self.until.resolve(anchor);

        Ok(anchor
            .iter_days()
            .take_while(move |day| *day <= end)
            .filter(move |day| self.frequency.includes(*day, anchor)))
    }
}
