//! CLI argument parsing for buildlock.
//!
//! Uses clap derive macros for declarative argument definitions. Each
//! invocation is one process lifetime of the coordinator: it reconciles the
//! persisted flags with the host, runs the command, and waits for any build it
//! has to relock after.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// buildlock: keep a build host from rebuilding until you say so.
///
/// State lives in a workspace directory (default `./.buildlock`): persisted
/// lock intent, an audit log, and the marker directory shared with the host.
#[derive(Parser, Debug)]
#[command(name = "buildlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace directory (overrides BUILDLOCK_DIR).
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). BUILDLOCK_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the workspace.
    ///
    /// Creates the workspace directory, a default config.yaml, the events
    /// directory, and the host marker directory. Safe to run repeatedly.
    Init,

    /// Reconcile persisted state with the host.
    ///
    /// Reapplies a wanted lock, or resumes relocking after a forced compile
    /// that was interrupted, waiting for a running build when needed.
    Start(WaitArgs),

    /// Toggle the rebuild lock.
    ///
    /// Prints the new state: `locked` or `unlocked`.
    Toggle,

    /// Rebuild now.
    ///
    /// When builds are locked, releases the lock for one rebuild and
    /// reapplies it once the build finishes.
    Force(WaitArgs),

    /// Show persisted flags, host status, and recent events.
    Status(StatusArgs),
}

/// Arguments for commands that may wait on a build.
#[derive(Parser, Debug, Default)]
pub struct WaitArgs {
    /// Exit without waiting. The pending lock is applied by the next `start`.
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show the last N events from the audit log (0 disables).
    #[arg(long, default_value_t = 5)]
    pub tail: usize,
}
