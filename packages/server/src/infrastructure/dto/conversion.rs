//! Conversion logic between DTOs and domain types.

use crate::domain::{GroupEvent, Round};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<GroupEvent> for dto::ServerEvent {
    fn from(event: GroupEvent) -> Self {
        match event {
            GroupEvent::ScoreUpdated(score) => Self::ReceiveScoreUpdate {
                team1_score: score.team1_score,
                team2_score: score.team2_score,
                team1_penalty: score.team1_penalty,
                team2_penalty: score.team2_penalty,
            },
            GroupEvent::TimerUpdated(timer) => Self::ReceiveTimerUpdate {
                minutes: timer.minutes,
                seconds: timer.seconds,
                is_running: timer.is_running,
            },
            GroupEvent::RoundUpdated(Round(round)) => Self::ReceiveRoundUpdate { round },
            GroupEvent::CountChanged(count) => Self::ReceiveCount { count },
            GroupEvent::ClientsConnected {
                group_name,
                connected,
            } => Self::ClientsConnected {
                group_name,
                connected,
            },
            GroupEvent::Error(message) => Self::Error { message },
        }
    }
}

/// Encode an event as the JSON text frame sent to clients.
pub fn encode_event(event: &GroupEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerEvent::from(event.clone()))
}
