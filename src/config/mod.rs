//! Configuration model for buildlock.
//!
//! This module defines the Config struct that represents `<workspace>/config.yaml`.
//! Unknown fields are ignored and every field has a default, so an empty or
//! missing file is a valid configuration.

mod defaults;
mod model;
mod operations;


pub use model::Config;
