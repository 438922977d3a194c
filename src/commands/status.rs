//! Implementation of the `buildlock status` command.
//!
//! Read-only: this does not run startup reconciliation, so it never locks or
//! unlocks anything.

use crate::cli::StatusArgs;
use buildlock::context::WorkspaceContext;
use buildlock::error::Result;
use buildlock::events::tail_events;
use buildlock::host::{BuildHost, DirectoryHost};
use buildlock::store::{FileStore, FlagKey, PersistentStore};
use std::path::Path;

pub fn cmd_status(dir: Option<&Path>, args: StatusArgs) -> Result<()> {
    let ctx = WorkspaceContext::resolve(dir)?;
    ctx.ensure_initialized()?;
    let config = ctx.load_config()?;

    let store = FileStore::new(ctx.state_path());
    let desired = store.get_flag(FlagKey::DesiredLocked)?;
    let pending = store.get_flag(FlagKey::PendingRelock)?;

    println!("Workspace: {}", ctx.root.display());
    println!();
    println!("Persisted:");
    println!("  desired lock:   {}", yes_no(desired));
    println!("  pending relock: {}", yes_no(pending));

    let host = DirectoryHost::new(ctx.host_dir(&config));
    println!();
    println!("Host ({}):", host.dir().display());
    match (host.is_building(), host.lock_metadata()) {
        (Ok(building), Ok(lock)) => {
            println!("  building: {}", yes_no(building));
            match lock {
                Some(meta) => println!(
                    "  locked:   yes (by {}, {} ago)",
                    meta.owner,
                    meta.age_string()
                ),
                None => println!("  locked:   no"),
            }
        }
        (Err(e), _) | (_, Err(e)) => println!("  unavailable: {}", e),
    }

    if args.tail > 0 {
        let events = tail_events(&ctx, args.tail)?;
        if !events.is_empty() {
            println!();
            println!("Recent events:");
            for event in events {
                println!(
                    "  {}  {:<18} {}",
                    event.ts.format("%Y-%m-%d %H:%M:%S"),
                    event.action.to_string(),
                    event.details
                );
            }
        }
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
