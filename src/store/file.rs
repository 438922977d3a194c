//! JSON-file flag store.
//!
//! The file looks like:
//!
//! ```json
//! {
//!   "version": 1,
//!   "flags": { "DesiredLocked": true, "PendingRelock": false }
//! }
//! ```
//!
//! Every read goes to disk so two processes sharing a workspace always see the
//! latest committed value. Every write is an atomic replace.

use super::{FlagKey, PersistentStore};
use crate::error::{BuildLockError, Result};
use crate::fs::atomic_write_file;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredFlags {
    version: u32,
    #[serde(default)]
    flags: BTreeMap<String, bool>,
}

impl Default for StoredFlags {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            flags: BTreeMap::new(),
        }
    }
}

/// A [`PersistentStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoredFlags> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredFlags::default());
            }
            Err(e) => {
                return Err(BuildLockError::PersistenceUnavailable(format!(
                    "failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let stored: StoredFlags = serde_json::from_str(&content).map_err(|e| {
            BuildLockError::PersistenceUnavailable(format!(
                "failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        if stored.version != STORE_VERSION {
            return Err(BuildLockError::PersistenceUnavailable(format!(
                "'{}' has unsupported version {} (expected {})",
                self.path.display(),
                stored.version,
                STORE_VERSION
            )));
        }

        Ok(stored)
    }

    fn save(&self, stored: &StoredFlags) -> Result<()> {
        let json = serde_json::to_string_pretty(stored).map_err(|e| {
            BuildLockError::PersistenceUnavailable(format!("failed to serialize flags: {}", e))
        })?;

        atomic_write_file(&self.path, &json).map_err(|e| {
            BuildLockError::PersistenceUnavailable(format!(
                "failed to write '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl PersistentStore for FileStore {
    fn get_flag(&self, key: FlagKey) -> Result<bool> {
        let stored = self.load()?;
        Ok(stored.flags.get(key.as_str()).copied().unwrap_or(false))
    }

    fn set_flag(&mut self, key: FlagKey, value: bool) -> Result<()> {
        let mut stored = self.load()?;
        stored.flags.insert(key.as_str().to_string(), value);
        self.save(&stored)
    }
}
