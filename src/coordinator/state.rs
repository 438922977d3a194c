//! Coordinator states and the outcomes its entry points report.

use crate::store::FlagKey;
use serde::Serialize;

/// Where the coordinator is in its lock lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    /// Rebuilds are permitted and nothing is pending.
    Unlocked,
    /// This process holds the host lock.
    LockedActive,
    /// A forced compile released the lock; relock once the build finishes.
    WaitingPendingRelock,
    /// The lock is wanted but a build was running at startup; apply it once idle.
    WaitingApplyDesiredLock,
}

impl CoordinatorState {
    /// The poll that must be registered while in this state, if any.
    pub fn poll(&self) -> Option<PollKind> {
        match self {
            CoordinatorState::WaitingPendingRelock => Some(PollKind::PendingRelock),
            CoordinatorState::WaitingApplyDesiredLock => Some(PollKind::ApplyDesiredLock),
            CoordinatorState::Unlocked | CoordinatorState::LockedActive => None,
        }
    }

    /// Whether the coordinator is waiting on a build.
    pub fn is_waiting(&self) -> bool {
        self.poll().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinatorState::Unlocked => "unlocked",
            CoordinatorState::LockedActive => "locked",
            CoordinatorState::WaitingPendingRelock => "waiting to relock after forced compile",
            CoordinatorState::WaitingApplyDesiredLock => "waiting to apply lock",
        }
    }
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a per-tick poll is registered.
///
/// At most one is registered at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollKind {
    /// Relock after a forced compile.
    PendingRelock,
    /// Apply the persisted desired lock once the host is idle.
    ApplyDesiredLock,
}

impl PollKind {
    /// The persisted flag that keeps this poll alive. When it reads `false`
    /// the poll is stale and deregisters itself.
    pub fn governing_flag(&self) -> FlagKey {
        match self {
            PollKind::PendingRelock => FlagKey::PendingRelock,
            PollKind::ApplyDesiredLock => FlagKey::DesiredLocked,
        }
    }

    /// The waiting state this poll belongs to.
    pub fn waiting_state(&self) -> CoordinatorState {
        match self {
            PollKind::PendingRelock => CoordinatorState::WaitingPendingRelock,
            PollKind::ApplyDesiredLock => CoordinatorState::WaitingApplyDesiredLock,
        }
    }
}

impl std::fmt::Display for PollKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollKind::PendingRelock => write!(f, "pending relock"),
            PollKind::ApplyDesiredLock => write!(f, "desired lock"),
        }
    }
}

/// What `initialize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitOutcome {
    /// Nothing persisted asks for a lock.
    Unlocked,
    /// The desired lock was applied immediately.
    LockReapplied,
    /// The desired lock waits for the running build (or an unreachable host).
    LockDeferred,
    /// An interrupted forced compile was resumed; relock once the build finishes.
    ResumedPendingRelock,
    /// `initialize` already ran in this process; carries the current state.
    AlreadyInitialized(CoordinatorState),
}

/// What `force_compile` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceOutcome {
    /// Builds were unlocked already; only a rescan was requested.
    ScanRequested,
    /// The lock was released for the rebuild and will be reapplied after it.
    RelockPending,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// No poll is registered.
    Idle,
    /// The host is still building; the poll stays registered.
    StillBuilding,
    /// The host call failed; the poll stays registered and retries next tick.
    HostUnavailable,
    /// The poll's governing flag was already cleared; it deregistered.
    Stale,
    /// A forced compile finished and the lock is back.
    Relocked,
    /// The desired lock deferred at startup is now applied.
    LockApplied,
}

impl TickOutcome {
    /// Whether the poll that produced this outcome is finished.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TickOutcome::Idle
                | TickOutcome::Stale
                | TickOutcome::Relocked
                | TickOutcome::LockApplied
        )
    }
}
