//! Cooperative per-tick polling.
//!
//! The coordinator never blocks while a build runs. Instead it registers a
//! [`PollKind`] with a [`TickScheduler`], and whoever owns the tick calls
//! [`LockCoordinator::on_tick`] once per tick until the poll deregisters.
//!
//! Embedding hosts implement [`TickScheduler`] on top of their own update
//! loop. The CLI uses [`IntervalScheduler`] and [`drive_until_idle`], which
//! sleep one interval between ticks on the calling thread.

use crate::coordinator::{LockCoordinator, PollKind, TickOutcome};
use crate::error::{BuildLockError, Result};
use crate::host::BuildHost;
use crate::store::PersistentStore;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// The host's facility for running a callback every tick.
pub trait TickScheduler {
    /// Start calling the coordinator's `on_tick` every tick for `poll`.
    fn register_per_tick(&mut self, poll: PollKind);

    /// Stop calling `on_tick` for `poll`.
    fn deregister_per_tick(&mut self, poll: PollKind);
}

/// A single-slot scheduler ticking at a fixed interval.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    active: Option<PollKind>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: None,
        }
    }

    /// Time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The registered poll, if any.
    pub fn active(&self) -> Option<PollKind> {
        self.active
    }
}

impl TickScheduler for IntervalScheduler {
    fn register_per_tick(&mut self, poll: PollKind) {
        if let Some(current) = self.active
            && current != poll
        {
            warn!(%current, %poll, "replacing registered poll");
        }
        self.active = Some(poll);
    }

    fn deregister_per_tick(&mut self, poll: PollKind) {
        if self.active == Some(poll) {
            self.active = None;
        }
    }
}

/// Summary of a [`drive_until_idle`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveReport {
    /// Ticks delivered.
    pub ticks: u64,
    /// Outcome of the last tick (`Idle` if nothing was registered).
    pub last: TickOutcome,
}

/// Tick the coordinator until no poll is registered.
///
/// With `max_ticks` set, gives up with [`BuildLockError::WaitTimeout`] after
/// that many ticks; the persisted intent is untouched, so the next process
/// start resumes the wait.
pub fn drive_until_idle<H, S>(
    coordinator: &mut LockCoordinator<H, S, IntervalScheduler>,
    max_ticks: Option<u64>,
) -> Result<DriveReport>
where
    H: BuildHost,
    S: PersistentStore,
{
    let mut report = DriveReport {
        ticks: 0,
        last: TickOutcome::Idle,
    };

    while let Some(poll) = coordinator.scheduler().active() {
        if let Some(limit) = max_ticks
            && report.ticks >= limit
        {
            return Err(BuildLockError::WaitTimeout(format!(
                "{} still waiting after {} ticks",
                poll, report.ticks
            )));
        }

        thread::sleep(coordinator.scheduler().interval());
        report.last = coordinator.on_tick()?;
        report.ticks += 1;
        debug!(tick = report.ticks, outcome = ?report.last, "tick");
    }

    Ok(report)
}
