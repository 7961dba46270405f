use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BeatId = Uuid;
pub type RetailerId = String;

/// A named route grouping a set of retailers.
///
/// Created once; the only mutation afterwards is (de)activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    pub id: BeatId,
    pub name: String,
    pub owner_id: String,
    pub active: bool,
}

impl Beat {
    pub fn beat_ref(&self) -> BeatRef {
        BeatRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Identity of a beat as copied onto each of its plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatRef {
    pub id: BeatId,
    pub name: String,
}

/// One dated occurrence of a beat.
///
/// `retailer_ids` is a snapshot taken when the plan was materialized and is
/// the sole record of who is planned for `plan_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatPlan {
    pub beat_id: BeatId,
    pub beat_name: String,
    pub plan_date: NaiveDate,
    pub retailer_ids: Vec<RetailerId>,
}
