//! Metadata written into host marker files.

use crate::error::{BuildLockError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Who wrote a marker file, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerMetadata {
    /// Owner of the marker (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the writer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the marker was written (RFC3339).
    pub created_at: DateTime<Utc>,

    /// What the marker requests (`lock` or `rescan`).
    pub action: String,
}

impl MarkerMetadata {
    /// Create metadata for `action` stamped with the current time.
    pub fn new(action: &str) -> Self {
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
        }
    }

    /// Parse metadata from a marker file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BuildLockError::HostUnavailable(format!(
                "failed to read marker '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            BuildLockError::HostUnavailable(format!(
                "failed to parse marker '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            BuildLockError::HostUnavailable(format!("failed to serialize marker: {}", e))
        })
    }

    /// How long ago the marker was written.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Age as a short human-readable string (`3m`, `2h 5m`, `1d 4h`).
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

/// `user@HOST` for the current process.
pub(crate) fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
