//! The per-tick poll that finishes a wait.

use super::LockCoordinator;
use super::state::{CoordinatorState, PollKind, TickOutcome};
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
    /// Advance the registered poll by one tick.
    ///
    /// Never blocks. While the host is building this returns
    /// [`TickOutcome::StillBuilding`]; once it is idle the lock is applied,
    /// the poll deregisters, and the coordinator is `LockedActive`. The lock
    /// is only requested when the `is_building` check of the same tick said
    /// the host is idle.
    pub fn on_tick(&mut self) -> Result<TickOutcome> {
        let Some(poll) = self.state.poll() else {
            return Ok(TickOutcome::Idle);
        };

        if !self.load_flag(poll.governing_flag())? {
            debug!(%poll, "governing flag already cleared; dropping poll");
            self.settle(CoordinatorState::Unlocked);
            return Ok(TickOutcome::Stale);
        }

        match self.host.is_building() {
            Ok(false) => {}
            Ok(true) => return Ok(TickOutcome::StillBuilding),
            Err(e) => {
                warn!(error = %e, %poll, "could not query build status; retrying next tick");
                return Ok(TickOutcome::HostUnavailable);
            }
        }

        if let Err(e) = self.host.lock_builds() {
            warn!(error = %e, %poll, "lock failed; retrying next tick");
            return Ok(TickOutcome::HostUnavailable);
        }

        match poll {
            PollKind::PendingRelock => {
                let persisted = self
                    .store
                    .set_flag(FlagKey::DesiredLocked, true)
                    .and_then(|()| self.store.set_flag(FlagKey::PendingRelock, false));
                if let Err(e) = persisted {
                    return Err(self.fail_closed(e, true));
                }
                self.settle(CoordinatorState::LockedActive);
                info!("build finished; lock reapplied");
                Ok(TickOutcome::Relocked)
            }
            PollKind::ApplyDesiredLock => {
                self.settle(CoordinatorState::LockedActive);
                info!("build finished; desired lock applied");
                Ok(TickOutcome::LockApplied)
            }
        }
    }
}
