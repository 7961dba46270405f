use serde::{Deserialize, Serialize};

use crate::beat::{Beat, BeatId, BeatPlan};

/// A single write destined for the backend.
///
/// Serialized as `{ "kind": ..., "payload": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Operation {
    CreateBeat(Beat),
    InsertBeatPlan(BeatPlan),
    SetBeatActive { beat_id: BeatId, active: bool },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateBeat(_) => "create_beat",
            Operation::InsertBeatPlan(_) => "insert_beat_plan",
            Operation::SetBeatActive { .. } => "set_beat_active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn serialized_with_kind_and_payload() {
        let beat_id = Uuid::nil();
        let op = Operation::SetBeatActive {
            beat_id,
            active: false,
        };

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["kind"], op.kind());
        assert_eq!(json["payload"]["active"], false);
        assert_eq!(
            json["payload"]["beat_id"],
            "00000000-0000-0000-0000-000000000000"
        );
    }
}
