use chrono::{NaiveDate, NaiveDateTime};

use crate::beat::{BeatPlan, BeatRef, RetailerId};
use crate::recurrence::{InvalidRuleError, RecurrenceRule};

/// Drops the time of day.
pub fn normalize(at: NaiveDateTime) -> NaiveDate {
    at.date()
}

/// Expands `rule` into one plan per occurrence date, ascending.
///
/// Pure: the result depends only on the arguments. A range with no matching
/// day yields an empty list rather than an error.
pub fn expand(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    beat: &BeatRef,
    retailer_ids: &[RetailerId],
) -> Result<Vec<BeatPlan>, InvalidRuleError> {
    let plans = rule
        .occurrences(anchor)?
        .map(|plan_date| BeatPlan {
            beat_id: beat.id,
            beat_name: beat.name.clone(),
            plan_date,
            retailer_ids: retailer_ids.to_vec(),
        })
        .collect();

    Ok(plans)
}
