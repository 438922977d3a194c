//! Append-only audit log of lock transitions.
//!
//! Events are stored in NDJSON format (one JSON object per line) in
//! `<workspace>/events/events.ndjson`.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`init`, `startup`, `lock`, `unlock`, ...)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `details`: freeform object with action-specific details
//!
//! ```no_run
//! use buildlock::context::WorkspaceContext;
//! use buildlock::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ctx = WorkspaceContext::resolve(None)?;
//! let event = Event::new(EventAction::Lock).with_details(json!({"desired_locked": true}));
//! append_event(&ctx, &event)?;
//! # Ok::<(), buildlock::error::BuildLockError>(())
//! ```

use crate::context::WorkspaceContext;
use crate::error::{BuildLockError, Result};
use crate::host::owner_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Workspace created.
    Init,
    /// `initialize` reconciled persisted state with the host.
    Startup,
    /// Builds locked by a toggle.
    Lock,
    /// Builds unlocked by a toggle.
    Unlock,
    /// A forced compile was requested.
    ForceCompile,
    /// Lock reapplied after a forced compile.
    Relock,
    /// Deferred startup lock applied.
    ApplyDesiredLock,
    /// Gave up waiting on a build; intent left for the next start.
    WaitTimeout,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Startup => write!(f, "startup"),
            EventAction::Lock => write!(f, "lock"),
            EventAction::Unlock => write!(f, "unlock"),
            EventAction::ForceCompile => write!(f, "force_compile"),
            EventAction::Relock => write!(f, "relock"),
            EventAction::ApplyDesiredLock => write!(f, "apply_desired_lock"),
            EventAction::WaitTimeout => write!(f, "wait_timeout"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who performed it (e.g., `user@HOST`).
    pub actor: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: owner_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            BuildLockError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Append an event to the workspace's events log, creating it if needed.
pub fn append_event(ctx: &WorkspaceContext, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            BuildLockError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let events_file = ctx.events_file();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            BuildLockError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        BuildLockError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        BuildLockError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })
}

/// Read the last `limit` events. Unparsable lines are skipped.
pub fn tail_events(ctx: &WorkspaceContext, limit: usize) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    let content = match fs::read_to_string(&events_file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(BuildLockError::UserError(format!(
                "failed to read events file '{}': {}",
                events_file.display(),
                e
            )));
        }
    };

    let events: Vec<Event> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let skip = events.len().saturating_sub(limit);
    Ok(events.into_iter().skip(skip).collect())
}
