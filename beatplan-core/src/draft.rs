use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::beat::{Beat, BeatPlan, RetailerId};
use crate::clock::Clock;
use crate::expand::expand;
use crate::operation::Operation;
use crate::recurrence::{InvalidRuleError, RecurrenceRule};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateBeatError {
    #[error("beat name is empty")]
    EmptyName,

    #[error("no retailers selected")]
    NoRetailers,

    #[error("invalid recurrence rule: {0}")]
    Rule(#[from] InvalidRuleError),
}

/// Everything a user fills in to create a beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatDraft {
    pub name: String,
    pub owner_id: String,
    pub retailer_ids: Vec<RetailerId>,
    pub rule: RecurrenceRule,
}

impl BeatDraft {
    /// Checks the form-level preconditions. Rule checks need an anchor and
    /// happen in [`materialize`].
    pub fn validate(&self) -> Result<(), CreateBeatError> {
        if self.name.trim().is_empty() {
            return Err(CreateBeatError::EmptyName);
        }
        if self.retailer_ids.is_empty() {
            return Err(CreateBeatError::NoRetailers);
        }
        Ok(())
    }
}

/// A freshly created beat together with its expanded plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeat {
    pub beat: Beat,
    pub plans: Vec<BeatPlan>,
}

impl NewBeat {
    /// The writes that persist this beat: the beat row first, then one
    /// insert per plan in date order.
    pub fn operations(&self) -> Vec<Operation> {
        std::iter::once(Operation::CreateBeat(self.beat.clone()))
            .chain(self.plans.iter().cloned().map(Operation::InsertBeatPlan))
            .collect()
    }
}

/// Creates a beat from `draft`, anchored on `clock.today()`.
pub fn materialize(draft: &BeatDraft, clock: &impl Clock) -> Result<NewBeat, CreateBeatError> {
    draft.validate()?;

    let anchor = clock.today();
    let beat = Beat {
        id: Uuid::new_v4(),
        name: draft.name.trim().to_string(),
        owner_id: draft.owner_id.clone(),
        active: true,
    };

    let plans = expand(&draft.rule, anchor, &beat.beat_ref(), &draft.retailer_ids)?;

    if plans.is_empty() {
        warn!(beat = %beat.name, %anchor, "recurrence rule produced no plan dates");
    } else {
        debug!(beat = %beat.name, %anchor, count = plans.len(), "materialized beat plans");
    }

    Ok(NewBeat { beat, plans })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::recurrence::{Frequency, Until};
    use crate::weekday::Weekdays;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(rule: RecurrenceRule) -> BeatDraft {
        BeatDraft {
            name: "  Station road ".to_string(),
            owner_id: "rep-7".to_string(),
            retailer_ids: vec!["r-1".to_string(), "r-2".to_string()],
            rule,
        }
    }

    #[test]
    fn materialize_anchors_on_clock() {
        let clock = FixedClock(date(2024, 1, 1));
        let new_beat = materialize(
            &draft(RecurrenceRule {
                frequency: Frequency::Daily,
                until: Until::Date(date(2024, 1, 3)),
            }),
            &clock,
        )
        .unwrap();

        assert_eq!(new_beat.beat.name, "Station road");
        assert!(new_beat.beat.active);
        let dates: Vec<_> = new_beat.plans.iter().map(|p| p.plan_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert!(new_beat.plans.iter().all(|p| p.beat_id == new_beat.beat.id));
    }

    #[test]
    fn empty_selection_is_rejected_before_expansion() {
        let mut d = draft(RecurrenceRule {
            frequency: Frequency::Daily,
            until: Until::Date(date(2023, 1, 1)),
        });
        d.retailer_ids.clear();

        let err = materialize(&d, &FixedClock(date(2024, 1, 1))).unwrap_err();
        assert_eq!(err, CreateBeatError::NoRetailers);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut d = draft(RecurrenceRule {
            frequency: Frequency::Daily,
            until: Until::Permanent,
        });
        d.name = "   ".to_string();
        assert_eq!(d.validate(), Err(CreateBeatError::EmptyName));
    }

    #[test]
    fn rule_errors_are_wrapped() {
        let err = materialize(
            &draft(RecurrenceRule {
                frequency: Frequency::Weekly {
                    weekdays: Weekdays::empty(),
                },
                until: Until::Permanent,
            }),
            &FixedClock(date(2024, 1, 1)),
        )
        .unwrap_err();
        assert_eq!(err, CreateBeatError::Rule(InvalidRuleError::NoWeekdays));
    }

    #[test]
    fn empty_expansion_is_not_an_error() {
        // 2024-01-01 is a Monday.
        let new_beat = materialize(
            &draft(RecurrenceRule {
                frequency: Frequency::Weekly {
                    weekdays: Weekdays::from_indices([0]).unwrap(),
                },
                until: Until::Date(date(2024, 1, 1)),
            }),
            &FixedClock(date(2024, 1, 1)),
        )
        .unwrap();
        assert!(new_beat.plans.is_empty());
        assert_eq!(new_beat.operations().len(), 1);
    }

    #[test]
    fn operations_start_with_beat_then_plans_in_order() {
        let new_beat = materialize(
            &draft(RecurrenceRule {
                frequency: Frequency::CustomInterval { interval_days: 2 },
                until: Until::Date(date(2024, 1, 5)),
            }),
            &FixedClock(date(2024, 1, 1)),
        )
        .unwrap();

        let ops = new_beat.operations();
        assert_eq!(ops.len(), 4);
        assert!(matches!(&ops[0], Operation::CreateBeat(b) if b.id == new_beat.beat.id));
        let dates: Vec<_> = ops[1..]
            .iter()
            .map(|op| match op {
                Operation::InsertBeatPlan(p) => p.plan_date,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)]);
    }
}
