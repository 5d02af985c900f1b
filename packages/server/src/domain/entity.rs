//! Entity: GroupState
//!
//! グループごとに保持される可変なスコアボード状態。
//! フィールドは 3 つのグループ（Score / Timer / Round）に分かれており、
//! 更新は常にフィールドグループ単位で行われる。

use serde::{Deserialize, Serialize};

use super::value_object::Timestamp;

/// Score and penalties of both teams. Always replaced together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team1_score: i32,
    pub team2_score: i32,
    pub team1_penalty: i32,
    pub team2_penalty: i32,
}

/// Timer of the current round. Always replaced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub minutes: i32,
    pub seconds: i32,
    pub is_running: bool,
}

impl Timer {
    pub const DEFAULT_MINUTES: i32 = 2;
    pub const DEFAULT_SECONDS: i32 = 0;

    /// Stopped timer showing `minutes:seconds`.
    pub fn stopped(minutes: i32, seconds: i32) -> Self {
        Self {
            minutes,
            seconds,
            is_running: false,
        }
    }
}

impl Default for Timer {
    /// 2:00, stopped.
    fn default() -> Self {
        Self::stopped(Self::DEFAULT_MINUTES, Self::DEFAULT_SECONDS)
    }
}

/// Current round number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round(pub i32);

impl Default for Round {
    fn default() -> Self {
        Self(1)
    }
}

/// One field-group update submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStateUpdate {
    Score(Score),
    Timer(Timer),
    Round(Round),
}

/// グループの状態スナップショット
///
/// `created_at` はグループ作成時に一度だけ設定され、以降変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    pub score: Score,
    pub timer: Timer,
    pub round: Round,
    created_at: Timestamp,
}

impl GroupState {
    /// Fresh state with default scores, the given initial timer and round 1.
    pub fn new(created_at: Timestamp, initial_timer: Timer) -> Self {
        Self {
            score: Score::default(),
            timer: initial_timer,
            round: Round::default(),
            created_at,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Apply one field-group update; fields outside that group are left untouched.
    pub fn apply(&mut self, update: GroupStateUpdate) {
        match update {
            GroupStateUpdate::Score(score) => self.score = score,
            GroupStateUpdate::Timer(timer) => self.timer = timer,
            GroupStateUpdate::Round(round) => self.round = round,
        }
    }

    /// Whether the group has lived strictly longer than `lifetime_millis` at `now`.
    pub fn is_expired(&self, now: Timestamp, lifetime_millis: i64) -> bool {
        self.created_at.millis_until(now) > lifetime_millis
    }
}
