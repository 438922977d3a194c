//! Implementation of the `buildlock init` command.
//!
//! Creates the workspace layout (see [`WorkspaceContext`]). This command is
//! idempotent: an existing config, state file, or event log is left alone.

use buildlock::config::Config;
use buildlock::context::WorkspaceContext;
use buildlock::error::{BuildLockError, Result};
use buildlock::events::{Event, EventAction, append_event};
use buildlock::fs::atomic_write_file;
use serde_json::json;
use std::fs;
use std::path::Path;

pub fn cmd_init(dir: Option<&Path>) -> Result<()> {
    let ctx = WorkspaceContext::resolve(dir)?;

    create_dir(&ctx.root)?;
    create_dir(&ctx.events_dir())?;

    let config_created = if ctx.config_path().exists() {
        false
    } else {
        let yaml = Config::default().to_yaml()?;
        atomic_write_file(ctx.config_path(), &yaml).map_err(|e| {
            BuildLockError::UserError(format!(
                "failed to write '{}': {}",
                ctx.config_path().display(),
                e
            ))
        })?;
        true
    };

    let config = ctx.load_config()?;
    let host_dir = ctx.host_dir(&config);
    create_dir(&host_dir)?;

    if config.record_events {
        let event = Event::new(EventAction::Init).with_details(json!({
            "workspace": ctx.root.display().to_string(),
            "host_dir": host_dir.display().to_string(),
            "config_created": config_created,
        }));
        append_event(&ctx, &event)?;
    }

    println!("Initialized buildlock workspace at {}", ctx.root.display());
    println!("  host:   {}", host_dir.display());
    println!("  config: {}", ctx.config_path().display());
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        BuildLockError::UserError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}
