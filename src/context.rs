//! Workspace resolution for buildlock.
//!
//! A workspace is a directory holding everything one coordinator persists:
//!
//! ```text
//! .buildlock/
//! ├── config.yaml        # optional settings
//! ├── state.json         # DesiredLocked / PendingRelock
//! ├── events/
//! │   └── events.ndjson  # audit log
//! └── host/              # marker directory shared with the build host
//! ```
//!
//! The workspace is chosen by `--dir`, else `BUILDLOCK_DIR`, else
//! `./.buildlock`.

use crate::config::Config;
use crate::error::{BuildLockError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Default workspace directory name relative to the current directory.
pub const DEFAULT_WORKSPACE_DIR: &str = ".buildlock";

/// Environment variable overriding the workspace location.
pub const WORKSPACE_ENV: &str = "BUILDLOCK_DIR";

/// Resolved paths for a buildlock workspace. All paths are absolute when the
/// workspace was resolved from the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    /// The workspace directory.
    pub root: PathBuf,
}

impl WorkspaceContext {
    /// Resolve the workspace from an explicit directory, the environment, or
    /// the current working directory, in that order.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::at(dir));
        }

        if let Some(dir) = env::var_os(WORKSPACE_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(dir)));
        }

        let cwd = env::current_dir().map_err(|e| {
            BuildLockError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::at(cwd.join(DEFAULT_WORKSPACE_DIR)))
    }

    /// A workspace rooted at `root`.
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Whether the workspace directory exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Ensure the workspace exists, pointing at `buildlock init` if not.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.exists() {
            return Err(BuildLockError::UserError(format!(
                "buildlock workspace not initialized.\n\
                 Expected workspace at: {}\n\n\
                 Run `buildlock init` to create it.",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Path to `config.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    /// Path to the persisted flags.
    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.root.join("events")
    }

    /// Path to the events log.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }

    /// Host marker directory for this workspace's config.
    pub fn host_dir(&self, config: &Config) -> PathBuf {
        config.host_dir_in(&self.root)
    }

    /// Load the workspace config, falling back to defaults when absent.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(self.config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Restores `BUILDLOCK_DIR` when dropped.
    struct EnvGuard(Option<std::ffi::OsString>);

    impl EnvGuard {
        fn set(value: Option<&Path>) -> Self {
            let previous = env::var_os(WORKSPACE_ENV);
            // SAFETY: tests touching the environment are #[serial].
            unsafe {
                match value {
                    Some(v) => env::set_var(WORKSPACE_ENV, v),
                    None => env::remove_var(WORKSPACE_ENV),
                }
            }
            Self(previous)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see `EnvGuard::set`.
            unsafe {
                match &self.0 {
                    Some(v) => env::set_var(WORKSPACE_ENV, v),
                    None => env::remove_var(WORKSPACE_ENV),
                }
            }
        }
    }

    #[test]
    fn test_paths_inside_root() {
        let ctx = WorkspaceContext::at("/work/.buildlock");

        assert_eq!(ctx.config_path(), Path::new("/work/.buildlock/config.yaml"));
        assert_eq!(ctx.state_path(), Path::new("/work/.buildlock/state.json"));
        assert_eq!(
            ctx.events_file(),
            Path::new("/work/.buildlock/events/events.ndjson")
        );
        assert_eq!(
            ctx.host_dir(&Config::default()),
            Path::new("/work/.buildlock/host")
        );
    }

    #[test]
    #[serial]
    fn test_explicit_dir_wins_over_env() {
        let temp_dir = TempDir::new().unwrap();
        let _env = EnvGuard::set(Some(Path::new("/from/env")));

        let ctx = WorkspaceContext::resolve(Some(temp_dir.path())).unwrap();

        assert_eq!(ctx.root, temp_dir.path());
    }

    #[test]
    #[serial]
    fn test_env_used_without_explicit_dir() {
        let _env = EnvGuard::set(Some(Path::new("/from/env")));

        let ctx = WorkspaceContext::resolve(None).unwrap();

        assert_eq!(ctx.root, Path::new("/from/env"));
    }

    #[test]
    #[serial]
    fn test_defaults_to_current_directory() {
        let _env = EnvGuard::set(None);

        let ctx = WorkspaceContext::resolve(None).unwrap();

        assert_eq!(
            ctx.root,
            env::current_dir().unwrap().join(DEFAULT_WORKSPACE_DIR)
        );
    }

    #[test]
    fn test_ensure_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let missing = WorkspaceContext::at(temp_dir.path().join("nope"));
        let err = missing.ensure_initialized().unwrap_err();
        assert!(err.to_string().contains("buildlock init"));

        let present = WorkspaceContext::at(temp_dir.path());
        assert!(present.ensure_initialized().is_ok());
    }

    #[test]
    fn test_load_config_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = WorkspaceContext::at(temp_dir.path());

        assert_eq!(ctx.load_config().unwrap(), Config::default());
    }
}
