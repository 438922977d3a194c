//! In-memory flag store.

use super::{FlagKey, PersistentStore};
use crate::error::Result;
use std::collections::BTreeMap;

/// A [`PersistentStore`] that lives only as long as the value.
///
/// Useful for hosts that persist the flags themselves and for simulating a
/// restart in tests: hand the same store to a fresh coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    flags: BTreeMap<FlagKey, bool>,
}

impl MemoryStore {
    /// Create an empty store (every flag reads as `false`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with both flags preset.
    pub fn with_flags(desired_locked: bool, pending_relock: bool) -> Self {
        let mut flags = BTreeMap::new();
        flags.insert(FlagKey::DesiredLocked, desired_locked);
        flags.insert(FlagKey::PendingRelock, pending_relock);
        Self { flags }
    }
}

impl PersistentStore for MemoryStore {
    fn get_flag(&self, key: FlagKey) -> Result<bool> {
        Ok(self.flags.get(&key).copied().unwrap_or(false))
    }

    fn set_flag(&mut self, key: FlagKey, value: bool) -> Result<()> {
        self.flags.insert(key, value);
        Ok(())
    }
}
