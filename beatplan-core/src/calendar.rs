//! Per-day rollups for the visit calendar.
//!
//! Planned retailers come from [`BeatPlan::retailer_ids`] and nothing else.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::beat::{BeatPlan, RetailerId};

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Planned,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub retailer_id: RetailerId,
    pub date: NaiveDate,
    pub status: VisitStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub retailer_id: RetailerId,
    pub date: NaiveDate,
    /// Amount in minor currency units.
    pub amount_minor: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRollup {
    /// Distinct retailers planned across every beat for the day.
    pub planned: usize,
    pub completed: usize,
    /// Distinct retailers that placed at least one order.
    pub productive: usize,
    pub revenue_minor: i64,
    pub holiday: bool,
    pub on_leave: bool,
}

/// Records for one rollup, already fetched by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarInputs<'a> {
    pub plans: &'a [BeatPlan],
    pub visits: &'a [Visit],
    pub orders: &'a [Order],
    pub holidays: &'a [NaiveDate],
    pub leaves: &'a [NaiveDate],
}

/// Builds one rollup per day of `range`. Records outside the range are ignored.
pub fn rollup(range: DateRange, inputs: CalendarInputs<'_>) -> BTreeMap<NaiveDate, DayRollup> {
    let mut planned: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for plan in inputs.plans.iter().filter(|p| range.contains(p.plan_date)) {
        planned
            .entry(plan.plan_date)
            .or_default()
            .extend(plan.retailer_ids.iter().map(String::as_str));
    }

    let mut productive: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    let mut days: BTreeMap<NaiveDate, DayRollup> =
        range.days().map(|day| (day, DayRollup::default())).collect();

    for order in inputs.orders.iter().filter(|o| range.contains(o.date)) {
        productive
            .entry(order.date)
            .or_default()
            .insert(order.retailer_id.as_str());
        if let Some(day) = days.get_mut(&order.date) {
            day.revenue_minor += order.amount_minor;
        }
    }

    for visit in inputs.visits {
        if visit.status != VisitStatus::Completed {
            continue;
        }
        if let Some(day) = days.get_mut(&visit.date) {
            day.completed += 1;
        }
    }

    for date in inputs.holidays {
        if let Some(day) = days.get_mut(date) {
            day.holiday = true;
        }
    }
    for date in inputs.leaves {
        if let Some(day) = days.get_mut(date) {
            day.on_leave = true;
        }
    }

    for (date, day) in days.iter_mut() {
        day.planned = planned.get(date).map_or(0, BTreeSet::len);
        day.productive = productive.get(date).map_or(0, BTreeSet::len);
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn plan(day: u32, retailers: &[&str]) -> BeatPlan {
        BeatPlan {
            beat_id: Uuid::new_v4(),
            beat_name: "beat".to_string(),
            plan_date: date(day),
            retailer_ids: retailers.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn order(day: u32, retailer: &str, amount_minor: i64) -> Order {
        Order {
            retailer_id: retailer.to_string(),
            date: date(day),
            amount_minor,
        }
    }

    #[test]
    fn one_entry_per_day_in_range() {
        let range = DateRange {
            start: date(1),
            end: date(7),
        };
        let days = rollup(range, CalendarInputs::default());
        assert_eq!(days.len(), 7);
        assert!(days.values().all(|d| *d == DayRollup::default()));
    }

    #[test]
    fn planned_counts_distinct_retailers_across_beats() {
        let range = DateRange {
            start: date(1),
            end: date(2),
        };
        let plans = [plan(1, &["a", "b"]), plan(1, &["b", "c"]), plan(2, &["a"])];
        // A visit to an unplanned retailer does not make it planned.
        let visits = [Visit {
            retailer_id: "z".to_string(),
            date: date(2),
            status: VisitStatus::Completed,
        }];

        let days = rollup(
            range,
            CalendarInputs {
                plans: &plans,
                visits: &visits,
                ..Default::default()
            },
        );

        assert_eq!(days[&date(1)].planned, 3);
        assert_eq!(days[&date(2)].planned, 1);
        assert_eq!(days[&date(2)].completed, 1);
    }

    #[test]
    fn orders_drive_productive_and_revenue() {
        let range = DateRange {
            start: date(1),
            end: date(1),
        };
        let orders = [order(1, "a", 1500), order(1, "a", 500), order(1, "b", 250)];

        let days = rollup(
            range,
            CalendarInputs {
                orders: &orders,
                ..Default::default()
            },
        );

        let day = &days[&date(1)];
        assert_eq!(day.productive, 2);
        assert_eq!(day.revenue_minor, 2250);
    }

    #[test]
    fn only_completed_visits_count() {
        let range = DateRange {
            start: date(3),
            end: date(3),
        };
        let visits: Vec<_> = [VisitStatus::Planned, VisitStatus::Completed, VisitStatus::Cancelled]
            .into_iter()
            .map(|status| Visit {
                retailer_id: "a".to_string(),
                date: date(3),
                status,
            })
            .collect();

        let days = rollup(
            range,
            CalendarInputs {
                visits: &visits,
                ..Default::default()
            },
        );
        assert_eq!(days[&date(3)].completed, 1);
    }

    #[test]
    fn out_of_range_records_are_ignored() {
        let range = DateRange {
            start: date(5),
            end: date(6),
        };
        let plans = [plan(4, &["a"]), plan(7, &["b"])];
        let orders = [order(4, "a", 100)];
        let holidays = [date(6), date(8)];
        let leaves = [date(5)];

        let days = rollup(
            range,
            CalendarInputs {
                plans: &plans,
                orders: &orders,
                holidays: &holidays,
                leaves: &leaves,
                ..Default::default()
            },
        );

        assert_eq!(days.len(), 2);
        assert_eq!(days[&date(5)].planned, 0);
        assert_eq!(days[&date(5)].revenue_minor, 0);
        assert!(days[&date(5)].on_leave);
        assert!(days[&date(6)].holiday);
        assert!(!days[&date(6)].on_leave);
    }
}
