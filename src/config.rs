//! Settings for the terminal shell. The core never reads these.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the save notification stays up.
    pub notice_ms: u64,
    pub probe: ProbeConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notice_ms: 3_000,
            probe: ProbeConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub debounce_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 5_000,
            debounce_ms: 350,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Config {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    /// `<config_dir>/rowdeck/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rowdeck").join("config.yaml"))
    }

    /// Loads an explicitly named file, which must exist, or the default
    /// location when present. Falls back to defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = Config::from_yaml("probe:\n  enabled: false\n").expect("valid yaml");
        assert!(!config.probe.enabled);
        assert_eq!(config.probe.timeout_ms, 5_000);
        assert_eq!(config.notice_ms, 3_000);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_yaml("\n").expect("empty"), Config::default());
    }

    #[test]
    fn full_file_parses() {
        let yaml = "notice_ms: 1500\nprobe: { enabled: true, timeout_ms: 800, debounce_ms: 0 }\nlog: { file: /tmp/rowdeck.log, filter: debug }\n";
        let config = Config::from_yaml(yaml).expect("valid yaml");
        assert_eq!(config.notice_duration(), Duration::from_millis(1500));
        assert_eq!(config.probe.debounce(), Duration::ZERO);
        assert_eq!(config.log.file, Some(PathBuf::from("/tmp/rowdeck.log")));
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn unreadable_explicit_path_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/rowdeck.yaml"))).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "notice_ms: [").expect("write");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
