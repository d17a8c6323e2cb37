// Engine configuration

use chrono::Duration;
use eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Records per page in list views
    pub page_size: usize,
    /// Idle time before a typed search is dispatched
    pub debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl EngineConfig {
    /// `$XDG_CONFIG_HOME/rosterview/config.yaml` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rosterview").join("config.yaml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: EngineConfig =
            serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;

        info!(path = ?path, page_size = config.page_size, debounce_ms = config.debounce_ms, "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(eyre!("page_size must be at least 1"));
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::milliseconds(self.debounce_ms as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig::load(Some(&temp.path().join("config.yaml"))).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.debounce_delay(), Duration::milliseconds(1000));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "page_size: 25\n").unwrap();

        let config = EngineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "page_size: 0\n").unwrap();

        assert!(EngineConfig::load(Some(&path)).is_err());
    }
}
