//! buildlock: restart-safe coordination of a build host's rebuild lock.
//!
//! The host can only be told to lock or unlock rebuilds, asked to rescan, and
//! polled for whether a build is running. [`coordinator::LockCoordinator`]
//! turns that into a lock the user can toggle, a "compile now" that relocks
//! afterwards, and both survive process restarts through two persisted flags.
//!
//! ```no_run
//! use buildlock::coordinator::LockCoordinator;
//! use buildlock::host::DirectoryHost;
//! use buildlock::store::FileStore;
//! use buildlock::tick::{IntervalScheduler, drive_until_idle};
//! use std::time::Duration;
//!
//! let mut coordinator = LockCoordinator::new(
//!     DirectoryHost::new(".buildlock/host"),
//!     FileStore::new(".buildlock/state.json"),
//!     IntervalScheduler::new(Duration::from_millis(250)),
//! );
//! coordinator.initialize()?;
//! coordinator.force_compile()?;
//! drive_until_idle(&mut coordinator, None)?;
//! # Ok::<(), buildlock::error::BuildLockError>(())
//! ```

pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod host;
pub mod store;
pub mod tick;

#[cfg(test)]
mod test_support;
