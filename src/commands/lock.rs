//! Implementations of `start`, `toggle`, and `force`.

use super::session::Session;
use crate::cli::WaitArgs;
use buildlock::coordinator::{ForceOutcome, InitOutcome, TickOutcome};
use buildlock::error::{BuildLockError, Result};
use buildlock::events::EventAction;
use serde_json::json;
use std::path::Path;

pub fn cmd_start(dir: Option<&Path>, args: WaitArgs) -> Result<()> {
    let (mut session, outcome) = Session::start(dir)?;

    match outcome {
        InitOutcome::Unlocked => println!("Builds unlocked."),
        InitOutcome::LockReapplied => println!("Lock reapplied."),
        InitOutcome::LockDeferred => println!("Lock deferred until the build finishes."),
        InitOutcome::ResumedPendingRelock => {
            println!("Resuming forced compile; relock pending.")
        }
        InitOutcome::AlreadyInitialized(state) => println!("Already started ({}).", state),
    }

    finish(&mut session, args)
}

pub fn cmd_toggle(dir: Option<&Path>) -> Result<()> {
    let (mut session, _) = Session::start(dir)?;

    let locked = session
        .coordinator
        .toggle_lock()
        .map_err(with_resume_hint)?;

    let action = if locked {
        EventAction::Lock
    } else {
        EventAction::Unlock
    };
    session.record(action, json!({ "desired_locked": locked }));

    println!("{}", if locked { "locked" } else { "unlocked" });
    Ok(())
}

pub fn cmd_force(dir: Option<&Path>, args: WaitArgs) -> Result<()> {
    let (mut session, _) = Session::start(dir)?;

    let result = session.coordinator.force_compile();
    let outcome = match &result {
        Ok(outcome) => json!(outcome),
        Err(e) => json!({ "error": e.to_string() }),
    };
    session.record(
        EventAction::ForceCompile,
        json!({ "outcome": outcome, "state": session.coordinator.state() }),
    );

    match result.map_err(with_resume_hint)? {
        ForceOutcome::ScanRequested => {
            println!("Rebuild requested.");
            Ok(())
        }
        ForceOutcome::RelockPending => {
            println!("Lock released for one rebuild.");
            finish(&mut session, args)
        }
    }
}

/// Wait for a pending lock unless asked not to.
fn finish(session: &mut Session, args: WaitArgs) -> Result<()> {
    if !session.coordinator.state().is_waiting() {
        return Ok(());
    }

    if args.no_wait {
        println!("Not waiting; run `buildlock start` to apply the lock after the build.");
        return Ok(());
    }

    match session.wait()? {
        TickOutcome::Relocked | TickOutcome::LockApplied => println!("Build finished; locked."),
        TickOutcome::Stale => println!("Lock request was withdrawn elsewhere; unlocked."),
        _ => {}
    }
    Ok(())
}

fn with_resume_hint(err: BuildLockError) -> BuildLockError {
    match err {
        BuildLockError::InvalidCallerSequence(msg) => BuildLockError::InvalidCallerSequence(
            format!("{}\nRun `buildlock start` to wait for the build first.", msg),
        ),
        other => other,
    }
}
