//! Configuration for a [`ScheduleGraph`](crate::graph::ScheduleGraph).

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("period length must be at least one day")]
    ZeroPeriodLength,

    #[error("a shared graph needs at least one commit attempt")]
    ZeroCommitAttempts,
}

/// Tunables shared by the container, its builders and the shared handle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Number of calendar days in every planning period.
    pub period_length_days: u32,
    /// How many times [`SharedScheduleGraph::commit`](crate::graph::SharedScheduleGraph::commit)
    /// and `replace` validate an edge before giving up on a contended lock.
    pub max_commit_attempts: u32,
}

impl GraphConfig {
    pub const DEFAULT_PERIOD_LENGTH_DAYS: u32 = 14;
    pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 8;

    pub fn with_period_length_days(mut self, days: u32) -> Self {
        self.period_length_days = days;
        self
    }

    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_length_days == 0 {
            return Err(ConfigError::ZeroPeriodLength);
        }
        if self.max_commit_attempts == 0 {
            return Err(ConfigError::ZeroCommitAttempts);
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            period_length_days: Self::DEFAULT_PERIOD_LENGTH_DAYS,
            max_commit_attempts: Self::DEFAULT_MAX_COMMIT_ATTEMPTS,
        }
    }
}
