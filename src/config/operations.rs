//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{BuildLockError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BuildLockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config if the file exists, otherwise use defaults.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                BuildLockError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            BuildLockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `tick_interval_ms` must be positive
    /// - `max_wait_ticks`, when set, must be positive
    /// - `host_dir` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(BuildLockError::UserError(
                "config validation failed: tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.max_wait_ticks == Some(0) {
            return Err(BuildLockError::UserError(
                "config validation failed: max_wait_ticks must be greater than 0 (omit it to wait forever)"
                    .to_string(),
            ));
        }

        if self.host_dir.trim().is_empty() {
            return Err(BuildLockError::UserError(
                "config validation failed: host_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Tick interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Resolve `host_dir` against the workspace root.
    pub fn host_dir_in(&self, workspace: &Path) -> PathBuf {
        let host_dir = Path::new(&self.host_dir);
        if host_dir.is_absolute() {
            host_dir.to_path_buf()
        } else {
            workspace.join(host_dir)
        }
    }
}
