//! WebSocket message DTOs.
//!
//! Every frame is a JSON object whose `type` field names the hub method (inbound)
//! or the event (outbound). Field names are camelCase.

use serde::{Deserialize, Serialize};

/// Messages sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinGroup {
        group_name: String,
    },
    LeaveGroup {
        group_name: String,
    },
    UpdateScore {
        group_name: String,
        team1_score: i32,
        team2_score: i32,
        team1_penalty: i32,
        team2_penalty: i32,
    },
    UpdateTimer {
        group_name: String,
        minutes: i32,
        seconds: i32,
        is_running: bool,
    },
    UpdateRound {
        group_name: String,
        round: i32,
    },
    AreClientsConnected {
        group_name: String,
    },
    IncrementCounter,
    ResetCounter,
}

/// Events sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    ReceiveScoreUpdate {
        team1_score: i32,
        team2_score: i32,
        team1_penalty: i32,
        team2_penalty: i32,
    },
    ReceiveTimerUpdate {
        minutes: i32,
        seconds: i32,
        is_running: bool,
    },
    ReceiveRoundUpdate {
        round: i32,
    },
    ReceiveCount {
        count: i64,
    },
    ClientsConnected {
        group_name: String,
        connected: bool,
    },
    Error {
        message: String,
    },
}
