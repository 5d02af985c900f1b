//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummaryDto {
    pub name: String,
    pub connections: usize,
    pub created_at: String,
}

/// Body of `GET /api/groups/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetailDto {
    pub name: String,
    pub connections: usize,
    pub created_at: String,
    pub team1_score: i32,
    pub team2_score: i32,
    pub team1_penalty: i32,
    pub team2_penalty: i32,
    pub timer_minutes: i32,
    pub timer_seconds: i32,
    pub timer_running: bool,
    pub current_round: i32,
}

/// Body of `GET /api/groups/{name}/connected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsConnectedDto {
    pub connected: bool,
}
