//! Config struct definition and default implementation.

use super::defaults::*;
use serde::{Deserialize, Serialize};

/// Configuration for a buildlock workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between polls while waiting for a build to finish.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Give up waiting after this many ticks. Unset waits forever.
    ///
    /// Giving up leaves the persisted intent in place; the next `start`
    /// resumes the wait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_ticks: Option<u64>,

    /// Host marker directory, relative to the workspace unless absolute.
    #[serde(default = "default_host_dir")]
    pub host_dir: String,

    /// Whether to append transitions to `events/events.ndjson`.
    #[serde(default = "default_true")]
    pub record_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_wait_ticks: None,
            host_dir: default_host_dir(),
            record_events: default_true(),
        }
    }
}
