//! Exit code constants for the buildlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing workspace, invalid config)
//! - 2: Invalid caller sequence (toggle/force while a wait is in flight)
//! - 3: Build host failure
//! - 4: Persistence failure
//! - 5: Gave up waiting for a build to finish

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing workspace, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// An operation was requested while the coordinator was waiting on a build.
pub const INVALID_SEQUENCE: i32 = 2;

/// The build host could not be reached or refused a request.
pub const HOST_FAILURE: i32 = 3;

/// The persisted flags could not be read or written.
pub const PERSISTENCE_FAILURE: i32 = 4;

/// The tick loop hit its configured limit while a build was still running.
pub const WAIT_TIMEOUT: i32 = 5;
