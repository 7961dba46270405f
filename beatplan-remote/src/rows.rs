use beatplan_core::{Beat, BeatId, BeatPlan, Operation, RetailerId};
use serde::Serialize;
use uuid::Uuid;

pub const BEATS_TABLE: &str = "beats";
pub const BEAT_PLANS_TABLE: &str = "beat_plans";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestMethod {
    Post,
    Patch,
}

/// A single REST call against the hosted database.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: RestMethod,
    /// Table name plus optional filter query, relative to `/rest/v1/`.
    pub path: String,
    pub body: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct BeatRow<'a> {
    id: Uuid,
    name: &'a str,
    owner_id: &'a str,
    is_active: bool,
}

#[derive(Debug, Serialize)]
struct BeatData<'a> {
    retailer_ids: &'a [RetailerId],
}

#[derive(Debug, Serialize)]
struct BeatPlanRow<'a> {
    beat_id: BeatId,
    beat_name: &'a str,
    plan_date: String,
    beat_data: BeatData<'a>,
}

#[derive(Debug, Serialize)]
struct BeatActivePatch {
    is_active: bool,
}

/// Maps an operation onto the table layout of the hosted database.
pub fn build_request(op: &Operation) -> Result<RestRequest, serde_json::Error> {
    let request = match op {
        Operation::CreateBeat(beat) => RestRequest {
            method: RestMethod::Post,
            path: BEATS_TABLE.to_string(),
            body: serde_json::to_value(beat_row(beat))?,
        },
        Operation::InsertBeatPlan(plan) => RestRequest {
            method: RestMethod::Post,
            path: BEAT_PLANS_TABLE.to_string(),
            body: serde_json::to_value(plan_row(plan))?,
        },
        Operation::SetBeatActive { beat_id, active } => RestRequest {
            method: RestMethod::Patch,
            path: format!("{BEATS_TABLE}?id=eq.{beat_id}"),
            body: serde_json::to_value(BeatActivePatch { is_active: *active })?,
        },
    };
    Ok(request)
}

fn beat_row(beat: &Beat) -> BeatRow<'_> {
    BeatRow {
        id: beat.id,
        name: &beat.name,
        owner_id: &beat.owner_id,
        is_active: beat.active,
    }
}

fn plan_row(plan: &BeatPlan) -> BeatPlanRow<'_> {
    BeatPlanRow {
        beat_id: plan.beat_id,
        beat_name: &plan.beat_name,
        plan_date: plan.plan_date.format("%Y-%m-%d").to_string(),
        beat_data: BeatData {
            retailer_ids: &plan.retailer_ids,
        },
    }
}
