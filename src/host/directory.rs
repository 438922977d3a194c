//! A build host reached through marker files.
//!
//! Layout of the host directory:
//!
//! - `building`: present while the host is rebuilding (written by the host)
//! - `builds.lock`: present while rebuilds are suspended (written by us)
//! - `rescan.request`: a pending rescan request (written by us, consumed by the host)
//!
//! The directory itself must exist; a missing directory means the host is
//! not there and every call fails with `HostUnavailable`.

use super::BuildHost;
use super::metadata::MarkerMetadata;
use crate::error::{BuildLockError, Result};
use crate::fs::{atomic_write_file, remove_if_exists};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker the host keeps while a rebuild is running.
pub const BUILDING_MARKER: &str = "building";

/// Marker that suspends rebuilds while present.
pub const LOCK_MARKER: &str = "builds.lock";

/// Marker requesting a source rescan.
pub const RESCAN_REQUEST: &str = "rescan.request";

/// [`BuildHost`] backed by a marker-file directory.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    dir: PathBuf,
}

impl DirectoryHost {
    /// Talk to the host through `dir`.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The host directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the lock marker.
    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_MARKER)
    }

    /// Path of the building marker.
    pub fn building_path(&self) -> PathBuf {
        self.dir.join(BUILDING_MARKER)
    }

    /// Path of the rescan request.
    pub fn rescan_path(&self) -> PathBuf {
        self.dir.join(RESCAN_REQUEST)
    }

    /// Whether rebuilds are currently suspended.
    pub fn is_locked(&self) -> Result<bool> {
        self.require_dir()?;
        Ok(self.lock_path().exists())
    }

    /// Metadata of the current lock marker, if any.
    pub fn lock_metadata(&self) -> Result<Option<MarkerMetadata>> {
        if !self.is_locked()? {
            return Ok(None);
        }
        MarkerMetadata::from_file(self.lock_path()).map(Some)
    }

    fn require_dir(&self) -> Result<()> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(BuildLockError::HostUnavailable(format!(
                "host directory '{}' does not exist",
                self.dir.display()
            )))
        }
    }

    fn write_marker(&self, path: &Path, action: &str) -> Result<()> {
        self.require_dir()?;
        let json = MarkerMetadata::new(action).to_json()?;
        atomic_write_file(path, &json).map_err(|e| {
            BuildLockError::HostUnavailable(format!(
                "failed to write '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

impl BuildHost for DirectoryHost {
    fn lock_builds(&mut self) -> Result<()> {
        self.write_marker(&self.lock_path(), "lock")?;
        debug!(path = %self.lock_path().display(), "lock marker written");
        Ok(())
    }

    fn unlock_builds(&mut self) -> Result<()> {
        self.require_dir()?;
        let path = self.lock_path();
        let removed = remove_if_exists(&path).map_err(|e| {
            BuildLockError::HostUnavailable(format!(
                "failed to remove '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), removed, "lock marker cleared");
        Ok(())
    }

    fn is_building(&self) -> Result<bool> {
        self.require_dir()?;
        Ok(self.building_path().exists())
    }

    fn request_rebuild_scan(&mut self) -> Result<()> {
        self.write_marker(&self.rescan_path(), "rescan")?;
        debug!(path = %self.rescan_path().display(), "rescan requested");
        Ok(())
    }
}
