//! One process lifetime of the coordinator, as seen by the CLI.

use buildlock::config::Config;
use buildlock::context::WorkspaceContext;
use buildlock::coordinator::{InitOutcome, LockCoordinator, TickOutcome};
use buildlock::error::{BuildLockError, Result};
use buildlock::events::{Event, EventAction, append_event};
use buildlock::host::{BuildHost, DirectoryHost};
use buildlock::store::FileStore;
use buildlock::tick::{IntervalScheduler, drive_until_idle};
use serde_json::{Value, json};
use std::path::Path;
use tracing::warn;

pub(crate) type CliCoordinator = LockCoordinator<DirectoryHost, FileStore, IntervalScheduler>;

/// A workspace, its config, and the coordinator wired to both.
pub(crate) struct Session {
    pub(crate) ctx: WorkspaceContext,
    pub(crate) config: Config,
    pub(crate) coordinator: CliCoordinator,
}

impl Session {
    /// Open an initialized workspace and run startup reconciliation.
    pub(crate) fn start(dir: Option<&Path>) -> Result<(Self, InitOutcome)> {
        let ctx = WorkspaceContext::resolve(dir)?;
        ctx.ensure_initialized()?;
        let config = ctx.load_config()?;

        let coordinator = LockCoordinator::new(
            DirectoryHost::new(ctx.host_dir(&config)),
            FileStore::new(ctx.state_path()),
            IntervalScheduler::new(config.tick_interval()),
        );

        let mut session = Self {
            ctx,
            config,
            coordinator,
        };

        let outcome = match session.coordinator.initialize() {
            Ok(outcome) => outcome,
            Err(err @ BuildLockError::PersistenceUnavailable(_)) => {
                session.release_carried_lock();
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        if outcome != InitOutcome::Unlocked {
            session.record(EventAction::Startup, json!({ "outcome": outcome }));
        }

        Ok((session, outcome))
    }

    /// The lock marker outlives the process that wrote it. With the flags
    /// unreadable nothing can justify keeping it, so drop it.
    fn release_carried_lock(&mut self) {
        let host = self.coordinator.host_mut();
        match host.is_locked() {
            Ok(true) => match host.unlock_builds() {
                Ok(()) => warn!("released lock left by a previous process"),
                Err(e) => warn!(error = %e, "failed to release lock left by a previous process"),
            },
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not check for a leftover lock"),
        }
    }

    /// Append an event if the workspace records them. Failing to record never
    /// fails the command; the transition already happened.
    pub(crate) fn record(&self, action: EventAction, details: Value) {
        if !self.config.record_events {
            return;
        }
        let event = Event::new(action).with_details(details);
        if let Err(e) = append_event(&self.ctx, &event) {
            warn!(error = %e, %action, "failed to record event");
        }
    }

    /// Tick until the coordinator stops waiting (or the configured tick limit).
    pub(crate) fn wait(&mut self) -> Result<TickOutcome> {
        if !self.coordinator.state().is_waiting() {
            return Ok(TickOutcome::Idle);
        }

        println!("Waiting for the build to finish...");
        match drive_until_idle(&mut self.coordinator, self.config.max_wait_ticks) {
            Ok(report) => {
                match report.last {
                    TickOutcome::Relocked => {
                        self.record(EventAction::Relock, json!({ "ticks": report.ticks }))
                    }
                    TickOutcome::LockApplied => self.record(
                        EventAction::ApplyDesiredLock,
                        json!({ "ticks": report.ticks }),
                    ),
                    _ => {}
                }
                Ok(report.last)
            }
            Err(err @ BuildLockError::WaitTimeout(_)) => {
                self.record(
                    EventAction::WaitTimeout,
                    json!({ "state": self.coordinator.state() }),
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
