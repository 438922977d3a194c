//! Caller-invoked entry points: `initialize`, `toggle_lock`, `force_compile`.

use super::LockCoordinator;
use super::state::{CoordinatorState, ForceOutcome, InitOutcome, PollKind};
use crate::error::Result;
use crate::host::BuildHost;
use crate::store::{FlagKey, PersistentStore};
use crate::tick::TickScheduler;
use tracing::{debug, info, warn};

impl<H, S, T> LockCoordinator<H, S, T>
where
    H: BuildHost,
    S: PersistentStore,
    T: TickScheduler,
{
    /// Reconcile the persisted flags with the live host.
    ///
    /// Runs once per process start. A second call is a no-op that reports the
    /// current state.
    ///
    /// - `PendingRelock` set: resume waiting for the build to relock. The host
    ///   forgot its lock on restart, so nothing is unlocked here.
    /// - `DesiredLocked` set: lock now, or wait if a build is running.
    /// - Neither: stay unlocked.
    pub fn initialize(&mut self) -> Result<InitOutcome> {
        if self.initialized {
            debug!(state = %self.state, "initialize called again; nothing to do");
            return Ok(InitOutcome::AlreadyInitialized(self.state));
        }
        self.initialized = true;

        if self.load_flag(FlagKey::PendingRelock)? {
            info!("forced compile interrupted by a restart; relock pending");
            self.enter_waiting(PollKind::PendingRelock);
            return Ok(InitOutcome::ResumedPendingRelock);
        }

        if !self.load_flag(FlagKey::DesiredLocked)? {
            debug!("no lock requested");
            return Ok(InitOutcome::Unlocked);
        }

        match self.host.is_building() {
            Ok(false) => {}
            Ok(true) => {
                info!("build running; desired lock deferred until it finishes");
                self.enter_waiting(PollKind::ApplyDesiredLock);
                return Ok(InitOutcome::LockDeferred);
            }
            Err(e) => {
                warn!(error = %e, "could not query build status; lock deferred");
                self.enter_waiting(PollKind::ApplyDesiredLock);
                return Ok(InitOutcome::LockDeferred);
            }
        }

        if let Err(e) = self.host.lock_builds() {
            warn!(error = %e, "failed to reapply lock; retrying every tick");
            self.enter_waiting(PollKind::ApplyDesiredLock);
            return Ok(InitOutcome::LockDeferred);
        }

        info!("lock reapplied on startup");
        self.settle(CoordinatorState::LockedActive);
        Ok(InitOutcome::LockReapplied)
    }

    /// Flip the desired lock and apply it to the host.
    ///
    /// Returns the new `DesiredLocked` value. Rejected while waiting on a build.
    pub fn toggle_lock(&mut self) -> Result<bool> {
        self.require_idle("toggle the lock")?;

        if self.load_flag(FlagKey::DesiredLocked)? {
            if let Err(e) = self.host.unlock_builds() {
                warn!(error = %e, "unlock failed; lock left in place");
                return Err(e);
            }
            if let Err(e) = self.store.set_flag(FlagKey::DesiredLocked, false) {
                // Host lock is already released.
                self.settle(CoordinatorState::Unlocked);
                return Err(self.fail_closed(e, false));
            }
            self.settle(CoordinatorState::Unlocked);
            info!("builds unlocked");
            Ok(false)
        } else {
            if let Err(e) = self.host.lock_builds() {
                warn!(error = %e, "lock failed; builds stay unlocked");
                return Err(e);
            }
            if let Err(e) = self.store.set_flag(FlagKey::DesiredLocked, true) {
                return Err(self.fail_closed(e, true));
            }
            self.settle(CoordinatorState::LockedActive);
            info!("builds locked");
            Ok(true)
        }
    }

    /// Trigger a rebuild now.
    ///
    /// If builds are unlocked this only requests a rescan. If they are locked,
    /// the lock is released for the rebuild and reapplied by [`on_tick`] once
    /// the host is idle again; the intent is persisted first so a restart in
    /// between resumes the relock.
    ///
    /// When the rescan request itself fails after the lock was released, the
    /// coordinator still waits to relock and the error is returned.
    ///
    /// [`on_tick`]: Self::on_tick
    pub fn force_compile(&mut self) -> Result<ForceOutcome> {
        self.require_idle("force a compile")?;

        if !self.load_flag(FlagKey::DesiredLocked)? {
            self.host.request_rebuild_scan()?;
            info!("rescan requested; builds already unlocked");
            return Ok(ForceOutcome::ScanRequested);
        }

        if let Err(e) = self.store.set_flag(FlagKey::PendingRelock, true) {
            return Err(self.fail_closed(e, false));
        }

        if let Err(e) = self.host.unlock_builds() {
            warn!(error = %e, "unlock for forced compile failed; lock left in place");
            if let Err(store_err) = self.store.set_flag(FlagKey::PendingRelock, false) {
                return Err(self.fail_closed(store_err, false));
            }
            return Err(e);
        }

        let scan = self.host.request_rebuild_scan();
        self.enter_waiting(PollKind::PendingRelock);

        match scan {
            Ok(()) => {
                info!("builds unlocked for forced compile; relock pending");
                Ok(ForceOutcome::RelockPending)
            }
            Err(e) => {
                warn!(error = %e, "rescan request failed; relock still pending");
                Err(e)
            }
        }
    }
}
