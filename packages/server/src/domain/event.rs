//! Outbound events delivered to connected clients.

use super::{GroupState, GroupStateUpdate, Round, Score, Timer};

/// サーバーからクライアントへ送るイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEvent {
    /// `ReceiveScoreUpdate`
    ScoreUpdated(Score),
    /// `ReceiveTimerUpdate`
    TimerUpdated(Timer),
    /// `ReceiveRoundUpdate`
    RoundUpdated(Round),
    /// `ReceiveCount` (groupless counter mode)
    CountChanged(i64),
    /// Reply to `AreClientsConnected`.
    ClientsConnected { group_name: String, connected: bool },
    /// `Error`, sent to the caller only.
    Error(String),
}

impl GroupEvent {
    /// Event name as seen by clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScoreUpdated(_) => "ReceiveScoreUpdate",
            Self::TimerUpdated(_) => "ReceiveTimerUpdate",
            Self::RoundUpdated(_) => "ReceiveRoundUpdate",
            Self::CountChanged(_) => "ReceiveCount",
            Self::ClientsConnected { .. } => "ClientsConnected",
            Self::Error(_) => "Error",
        }
    }

    /// Initial sync for a newly joined connection: score, timer, round, in that order.
    pub fn snapshot(state: &GroupState) -> [GroupEvent; 3] {
        [
            Self::ScoreUpdated(state.score),
            Self::TimerUpdated(state.timer),
            Self::RoundUpdated(state.round),
        ]
    }
}

impl From<GroupStateUpdate> for GroupEvent {
    fn from(update: GroupStateUpdate) -> Self {
        match update {
            GroupStateUpdate::Score(score) => Self::ScoreUpdated(score),
            GroupStateUpdate::Timer(timer) => Self::TimerUpdated(timer),
            GroupStateUpdate::Round(round) => Self::RoundUpdated(round),
        }
    }
}
