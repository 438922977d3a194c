//! The rebuild lock coordinator.
//!
//! The coordinator owns the only writer path to a host's rebuild lock. It
//! keeps two durable flags (see [`FlagKey`]) and re-derives everything else
//! from them plus the live host when the process starts.
//!
//! # Lifecycle
//!
//! 1. [`LockCoordinator::initialize`] once at process start.
//! 2. [`LockCoordinator::toggle_lock`] / [`LockCoordinator::force_compile`]
//!    from the UI.
//! 3. [`LockCoordinator::on_tick`] from the host's periodic tick while a poll
//!    is registered with the [`TickScheduler`].
//!
//! # States
//!
//! ```text
//!                 toggle                      force (desired locked)
//!   Unlocked  <----------->  LockedActive  ------------------------> WaitingPendingRelock
//!      |                         ^   ^                                      |
//!      | init, desired locked,   |   +----------- tick, not building -------+
//!      | host building           |
//!      v                         |
//!   WaitingApplyDesiredLock -----+ tick, not building
//! ```
//!
//! Waiting states hold no host lock. Calling `toggle_lock`/`force_compile`
//! while waiting is rejected with `InvalidCallerSequence`.
//!
//! # Failures
//!
//! A failed host call leaves the coordinator where it was (or keeps the poll
//! registered). A failed store read or write fails closed: the poll is
//! dropped, any lock this process just took is released, and the state
//! becomes `Unlocked`. Whatever was already persisted is resumed on the next
//! process start.

mod operations;
mod poll;
mod state;


pub use state::{CoordinatorState, ForceOutcome, InitOutcome, PollKind, TickOutcome};

use crate::error::{BuildLockError, Result};
use crate::host::BuildHost;
use crate::store::{FlagKey, PersistentStore};
use crate::tick::TickScheduler;
use tracing::{error, warn};

/// Coordinates a build host's rebuild lock across process restarts.
#[derive(Debug)]
pub struct LockCoordinator<H, S, T> {
    host: H,
    store: S,
    scheduler: T,
    state: CoordinatorState,
    initialized: bool,
}

impl<H, S, T> LockCoordinator<H, S, T>
where
    H: BuildHost,
    S: PersistentStore,
    T: TickScheduler,
{
    /// Build a coordinator around its collaborators. Call
    /// [`initialize`](Self::initialize) before anything else.
    pub fn new(host: H, store: S, scheduler: T) -> Self {
        Self {
            host,
            store,
            scheduler,
            state: CoordinatorState::Unlocked,
            initialized: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The build host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for hosts that are driven in-process.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The persistent flag store.
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The tick scheduler polls are registered with.
    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    /// Tear the coordinator down, handing back its collaborators.
    pub fn into_parts(self) -> (H, S, T) {
        (self.host, self.store, self.scheduler)
    }

    /// Move to `next`, deregistering the current poll if `next` does not own it.
    fn settle(&mut self, next: CoordinatorState) {
        if let Some(poll) = self.state.poll()
            && next.poll() != Some(poll)
        {
            self.scheduler.deregister_per_tick(poll);
        }
        self.state = next;
    }

    /// Enter the waiting state for `poll` and register it.
    fn enter_waiting(&mut self, poll: PollKind) {
        debug_assert!(
            !self.state.is_waiting() || self.state.poll() == Some(poll),
            "only one poll may be registered at a time"
        );
        if self.state.poll() != Some(poll) {
            self.scheduler.register_per_tick(poll);
        }
        self.state = poll.waiting_state();
    }

    /// Reject entry points that would interleave with a wait.
    fn require_idle(&self, action: &str) -> Result<()> {
        if !self.initialized {
            return Err(BuildLockError::InvalidCallerSequence(format!(
                "cannot {} before the coordinator is initialized",
                action
            )));
        }
        if self.state.is_waiting() {
            return Err(BuildLockError::InvalidCallerSequence(format!(
                "cannot {} while {}",
                action, self.state
            )));
        }
        Ok(())
    }

    /// Read a flag, failing closed if the store is unreadable.
    fn load_flag(&mut self, key: FlagKey) -> Result<bool> {
        match self.store.get_flag(key) {
            Ok(value) => Ok(value),
            Err(e) => Err(self.fail_closed(e, false)),
        }
    }

    /// Persistence is gone: drop any poll, release a lock this process holds,
    /// and fall back to `Unlocked`.
    fn fail_closed(&mut self, err: BuildLockError, holds_host_lock: bool) -> BuildLockError {
        error!(
            error = %err,
            state = %self.state,
            "persistent store failed; falling back to unlocked"
        );

        if (holds_host_lock || self.state == CoordinatorState::LockedActive)
            && let Err(unlock_err) = self.host.unlock_builds()
        {
            warn!(error = %unlock_err, "failed to release host lock while failing closed");
        }

        self.settle(CoordinatorState::Unlocked);
        err
    }
}
