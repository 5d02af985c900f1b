//! Command-line configuration of the server binary.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::domain::{GroupLimits, Timer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("--{flag} must be at least 1")]
    ZeroCapacity { flag: &'static str },

    #[error("--group-lifetime-secs must be at least 1")]
    ZeroLifetime,

    #[error("--timer-seconds must be less than 60 (got {0})")]
    TimerSecondsOutOfRange(i32),

    #[error("--timer-minutes must not be negative (got {0})")]
    NegativeTimerMinutes(i32),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "scoreline-server")]
#[command(about = "Real-time scoreboard server with group-scoped broadcast", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,

    /// Maximum number of live groups
    #[arg(long, default_value_t = GroupLimits::default().max_groups)]
    pub max_groups: usize,

    /// Maximum number of connections per group
    #[arg(long, default_value_t = GroupLimits::default().max_connections_per_group)]
    pub max_connections_per_group: usize,

    /// Seconds after creation at which a group becomes reclaimable
    #[arg(long, default_value = "3600")]
    pub group_lifetime_secs: u64,

    /// Initial timer minutes of a new group
    #[arg(long, default_value_t = Timer::DEFAULT_MINUTES)]
    pub timer_minutes: i32,

    /// Initial timer seconds of a new group
    #[arg(long, default_value_t = Timer::DEFAULT_SECONDS)]
    pub timer_seconds: i32,

    /// Period of the background reclamation sweep in seconds (0 disables it)
    #[arg(long, default_value = "0")]
    pub reclaim_interval_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_groups == 0 {
            return Err(ConfigError::ZeroCapacity { flag: "max-groups" });
        }
        if self.max_connections_per_group == 0 {
            return Err(ConfigError::ZeroCapacity {
                flag: "max-connections-per-group",
            });
        }
        if self.group_lifetime_secs == 0 {
            return Err(ConfigError::ZeroLifetime);
        }
        if self.timer_minutes < 0 {
            return Err(ConfigError::NegativeTimerMinutes(self.timer_minutes));
        }
        if !(0..60).contains(&self.timer_seconds) {
            return Err(ConfigError::TimerSecondsOutOfRange(self.timer_seconds));
        }
        Ok(())
    }

    pub fn group_limits(&self) -> GroupLimits {
        GroupLimits {
            max_groups: self.max_groups,
            max_connections_per_group: self.max_connections_per_group,
            group_lifetime: Duration::from_secs(self.group_lifetime_secs),
        }
    }

    pub fn initial_timer(&self) -> Timer {
        Timer::stopped(self.timer_minutes, self.timer_seconds)
    }

    pub fn reclaim_interval(&self) -> Option<Duration> {
        (self.reclaim_interval_secs > 0).then(|| Duration::from_secs(self.reclaim_interval_secs))
    }
}
