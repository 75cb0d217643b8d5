//! Scheduler and run configuration.

use std::time::Duration;

use karel_eval::EngineLimits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Milliseconds between heartbeats.
    pub heartbeat_ms: u64,
    /// Heartbeats per executed step while running.
    pub action_heartbeats: u32,
    /// Most heartbeats fired for one clock poll; older backlog is dropped.
    pub max_catch_up: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: 8,
            action_heartbeats: 1,
            max_catch_up: 4,
        }
    }
}

impl SchedulerConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    /// `action_heartbeats`, never less than one.
    pub(crate) fn heartbeats_per_step(&self) -> u32 {
        self.action_heartbeats.max(1)
    }
}

/// Everything a front-end needs to configure a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KarelConfig {
    pub scheduler: SchedulerConfig,
    pub limits: EngineLimits,
}
