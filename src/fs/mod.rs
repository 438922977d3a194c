//! Filesystem utilities for buildlock.
//!
//! Persisted flags and host marker files must never be observed half-written,
//! so every write goes through [`atomic_write`].

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file, remove_if_exists};
