//! Presence: how many visitors are online right now.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Heartbeats older than this no longer count as online.
pub const DEFAULT_HEARTBEAT_TTL: Duration = Duration::from_secs(30);

/// Interval between two sweeps of expired heartbeats.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// Snapshot broadcast whenever the online count or its visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdate {
    pub count: usize,
    /// Whether non-admin visitors are allowed to see the count.
    pub show_to_all: bool,
}
