//! Recording fakes for coordinator tests.

use crate::coordinator::PollKind;
use crate::error::{BuildLockError, Result};
use crate::host::BuildHost;
use crate::store::{FlagKey, MemoryStore, PersistentStore};
use crate::tick::TickScheduler;
use std::cell::{Cell, RefCell};

/// One call the coordinator made on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostCall {
    Lock,
    Unlock,
    /// `is_building` and what it answered.
    IsBuilding(bool),
    RescanRequested,
}

/// A host that records every call and reports "building" for a scripted
/// number of `is_building` queries.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    locked: bool,
    building_polls: Cell<u32>,
    calls: RefCell<Vec<HostCall>>,
    pub(crate) fail_lock: bool,
    pub(crate) fail_unlock: bool,
    pub(crate) fail_status: bool,
    pub(crate) fail_rescan: bool,
}

impl RecordingHost {
    /// A host with no build running.
    pub(crate) fn idle() -> Self {
        Self::default()
    }

    /// A host whose next `polls` `is_building` queries answer `true`.
    pub(crate) fn building_for(polls: u32) -> Self {
        let host = Self::default();
        host.building_polls.set(polls);
        host
    }

    /// Keep building for `polls` more queries.
    pub(crate) fn set_building_for(&mut self, polls: u32) {
        self.building_polls.set(polls);
    }

    /// Simulate a host restart: it forgets its lock and the call log.
    pub(crate) fn restarted(&self) -> Self {
        let host = Self::default();
        host.building_polls.set(self.building_polls.get());
        host
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, call: HostCall) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl BuildHost for RecordingHost {
    fn lock_builds(&mut self) -> Result<()> {
        if self.fail_lock {
            return Err(BuildLockError::HostUnavailable("lock refused".to_string()));
        }
        self.record(HostCall::Lock);
        self.locked = true;
        Ok(())
    }

    fn unlock_builds(&mut self) -> Result<()> {
        if self.fail_unlock {
            return Err(BuildLockError::HostUnavailable("unlock refused".to_string()));
        }
        self.record(HostCall::Unlock);
        self.locked = false;
        Ok(())
    }

    fn is_building(&self) -> Result<bool> {
        if self.fail_status {
            return Err(BuildLockError::HostUnavailable("status unknown".to_string()));
        }
        let remaining = self.building_polls.get();
        let building = remaining > 0;
        if building {
            self.building_polls.set(remaining - 1);
        }
        self.record(HostCall::IsBuilding(building));
        Ok(building)
    }

    fn request_rebuild_scan(&mut self) -> Result<()> {
        if self.fail_rescan {
            return Err(BuildLockError::HostUnavailable("rescan refused".to_string()));
        }
        self.record(HostCall::RescanRequested);
        Ok(())
    }
}

/// A scheduler that remembers which polls are registered.
#[derive(Debug, Default)]
pub(crate) struct RecordingScheduler {
    registered: Vec<PollKind>,
    pub(crate) registrations: usize,
}

impl RecordingScheduler {
    pub(crate) fn registered(&self) -> &[PollKind] {
        &self.registered
    }
}

impl TickScheduler for RecordingScheduler {
    fn register_per_tick(&mut self, poll: PollKind) {
        self.registrations += 1;
        if !self.registered.contains(&poll) {
            self.registered.push(poll);
        }
    }

    fn deregister_per_tick(&mut self, poll: PollKind) {
        self.registered.retain(|p| *p != poll);
    }
}

/// A memory store whose reads or writes can be made to fail.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
}

impl FlakyStore {
    pub(crate) fn with_flags(desired_locked: bool, pending_relock: bool) -> Self {
        Self {
            inner: MemoryStore::with_flags(desired_locked, pending_relock),
            ..Self::default()
        }
    }
}

impl PersistentStore for FlakyStore {
    fn get_flag(&self, key: FlagKey) -> Result<bool> {
        if self.fail_reads {
            return Err(BuildLockError::PersistenceUnavailable(format!(
                "cannot read {}",
                key
            )));
        }
        self.inner.get_flag(key)
    }

    fn set_flag(&mut self, key: FlagKey, value: bool) -> Result<()> {
        if self.fail_writes {
            return Err(BuildLockError::PersistenceUnavailable(format!(
                "cannot write {}",
                key
            )));
        }
        self.inner.set_flag(key, value)
    }
}
