//! Durable flag storage.
//!
//! The coordinator keeps exactly two booleans across process restarts:
//! `DesiredLocked` and `PendingRelock`. Anything implementing
//! [`PersistentStore`] can hold them; [`FileStore`] keeps them in a JSON file
//! and [`MemoryStore`] keeps them in memory for embedding and tests.
//!
//! A flag that was never written reads as `false`. A store that cannot be
//! read must return [`BuildLockError::PersistenceUnavailable`] rather than
//! guessing a default.
//!
//! [`BuildLockError::PersistenceUnavailable`]: crate::error::BuildLockError::PersistenceUnavailable

mod file;
mod memory;

pub use file::{FileStore, STORE_VERSION};
pub use memory::MemoryStore;

use crate::error::Result;

/// The fixed keys the coordinator persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagKey {
    /// The user wants rebuilds prevented.
    DesiredLocked,
    /// A force-compile sequence unlocked the host and must relock it.
    PendingRelock,
}

impl FlagKey {
    /// The identifier the flag is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKey::DesiredLocked => "DesiredLocked",
            FlagKey::PendingRelock => "PendingRelock",
        }
    }
}

impl std::fmt::Display for FlagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for the coordinator's persisted flags.
pub trait PersistentStore {
    /// Read a flag; unset flags read as `false`.
    fn get_flag(&self, key: FlagKey) -> Result<bool>;

    /// Durably write a flag. When this returns `Ok`, the value survives a restart.
    fn set_flag(&mut self, key: FlagKey, value: bool) -> Result<()>;
}

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn get_flag(&self, key: FlagKey) -> Result<bool> {
        (**self).get_flag(key)
    }

    fn set_flag(&mut self, key: FlagKey, value: bool) -> Result<()> {
        (**self).set_flag(key, value)
    }
}
