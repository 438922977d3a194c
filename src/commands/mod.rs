//! Command implementations for buildlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command except `init` and `status` opens a
//! [`Session`](session::Session), which owns the coordinator for this process.

mod init;
mod lock;
mod session;
mod status;


use crate::cli::Command;
use buildlock::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(dir: Option<&Path>, command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(dir),
        Command::Start(args) => lock::cmd_start(dir, args),
        Command::Toggle => lock::cmd_toggle(dir),
        Command::Force(args) => lock::cmd_force(dir, args),
        Command::Status(args) => status::cmd_status(dir, args),
    }
}
