//! Error types for buildlock.
//!
//! Uses thiserror for derive macros. Each variant maps to a distinct exit code
//! so scripts driving the CLI can tell a rejected call from a broken host.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for buildlock operations.
#[derive(Error, Debug)]
pub enum BuildLockError {
    /// User provided invalid arguments or the workspace is unusable.
    #[error("{0}")]
    UserError(String),

    /// `toggle_lock`/`force_compile` was called while a wait is in flight,
    /// or before `initialize`.
    #[error("operation rejected: {0}")]
    InvalidCallerSequence(String),

    /// A build host call failed.
    #[error("build host unavailable: {0}")]
    HostUnavailable(String),

    /// Persisted flags could not be read or written.
    #[error("persistent store unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The tick loop ran out of ticks before the build finished.
    #[error("gave up waiting: {0}")]
    WaitTimeout(String),
}

impl BuildLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildLockError::UserError(_) => exit_codes::USER_ERROR,
            BuildLockError::InvalidCallerSequence(_) => exit_codes::INVALID_SEQUENCE,
            BuildLockError::HostUnavailable(_) => exit_codes::HOST_FAILURE,
            BuildLockError::PersistenceUnavailable(_) => exit_codes::PERSISTENCE_FAILURE,
            BuildLockError::WaitTimeout(_) => exit_codes::WAIT_TIMEOUT,
        }
    }
}

/// Result type alias for buildlock operations.
pub type Result<T> = std::result::Result<T, BuildLockError>;
