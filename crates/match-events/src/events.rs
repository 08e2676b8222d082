//! Event contract
//!
//! Every notification crossing the service boundary. Delivery is
//! at-least-once; consumers must tolerate duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::side::MatchSide;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum MatchEvent {
    MatchCreated {
        match_id: Uuid,
        created_at_utc: DateTime<Utc>,
        vs_bot: bool,
        ai_level: Option<i32>,
        time_limit: Option<i64>,
        extra_time_per_move: Option<i64>,
        first_to_act_side: Option<i32>,
        creator: String,
    },
    MatchStarted {
        match_id: Uuid,
        started_at_utc: DateTime<Utc>,
        acceptor: String,
        white_side_player: String,
    },
    MatchCancelled {
        match_id: Uuid,
    },
    DrawRequested {
        match_id: Uuid,
        req_side: MatchSide,
    },
    DrawRejected {
        match_id: Uuid,
    },
    MatchFinished {
        match_id: Uuid,
        ended_at_utc: DateTime<Utc>,
        winner: Option<String>,
        win_by: Option<String>,
        draw_by: Option<String>,
    },
    /// The clock was handed to `side_to_act` and runs out at `exp_time_utc`.
    SideToActChanged {
        match_id: Uuid,
        side_to_act: MatchSide,
        exp_time_utc: DateTime<Utc>,
    },
    TimedOut {
        match_id: Uuid,
        timed_out_side: MatchSide,
    },
}

impl MatchEvent {
    /// Id of the match the event belongs to.
    pub fn match_id(&self) -> Uuid {
        match self {
            MatchEvent::MatchCreated { match_id, .. }
            | MatchEvent::MatchStarted { match_id, .. }
            | MatchEvent::MatchCancelled { match_id }
            | MatchEvent::DrawRequested { match_id, .. }
            | MatchEvent::DrawRejected { match_id }
            | MatchEvent::MatchFinished { match_id, .. }
            | MatchEvent::SideToActChanged { match_id, .. }
            | MatchEvent::TimedOut { match_id, .. } => *match_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = MatchEvent::TimedOut {
            match_id: Uuid::new_v4(),
            timed_out_side: MatchSide::White,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timed_out");
        assert_eq!(json["payload"]["timed_out_side"], "white");
    }

    #[test]
    fn test_match_id_accessor() {
        let id = Uuid::new_v4();
        let event = MatchEvent::MatchCancelled { match_id: id };
        assert_eq!(event.match_id(), id);
    }
}
