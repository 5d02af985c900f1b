//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ClientsConnectedDto, GroupDetailDto, GroupSummaryDto},
    ui::state::AppState,
    usecase::{GetGroupError, GroupOverview},
};
use scoreline_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live groups
pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<Vec<GroupSummaryDto>> {
    let groups = state.get_groups_usecase.list().await;

    // Domain Model から DTO への変換
    let summaries = groups
        .into_iter()
        .map(|group| GroupSummaryDto {
            name: group.name.into_string(),
            connections: group.connections,
            created_at: timestamp_to_rfc3339(group.state.created_at().value()),
        })
        .collect();

    Json(summaries)
}

/// Get group detail by name
pub async fn get_group_detail(
    State(state): State<Arc<AppState>>,
    Path(group_name): Path<String>,
) -> Result<Json<GroupDetailDto>, StatusCode> {
    match state.get_groups_usecase.detail(&group_name).await {
        Ok(group) => Ok(Json(to_detail_dto(group))),
        Err(GetGroupError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}

/// Whether the group has at least one member
pub async fn get_group_connected(
    State(state): State<Arc<AppState>>,
    Path(group_name): Path<String>,
) -> Json<ClientsConnectedDto> {
    let connected = state
        .are_clients_connected_usecase
        .execute(&group_name)
        .await;
    Json(ClientsConnectedDto { connected })
}

fn to_detail_dto(group: GroupOverview) -> GroupDetailDto {
    let GroupOverview {
        name,
        state,
        connections,
    } = group;
    GroupDetailDto {
        name: name.into_string(),
        connections,
        created_at: timestamp_to_rfc3339(state.created_at().value()),
        team1_score: state.score.team1_score,
        team2_score: state.score.team2_score,
        team1_penalty: state.score.team1_penalty,
        team2_penalty: state.score.team2_penalty,
        timer_minutes: state.timer.minutes,
        timer_seconds: state.timer.seconds,
        timer_running: state.timer.is_running,
        current_round: state.round.0,
    }
}
