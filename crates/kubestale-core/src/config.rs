//! Optional configuration file
//!
//! Stored by default in `~/.config/kubestale/config.yaml`:
//!
//! ```yaml
//! url: http://localhost:8001
//! blacklistFiles:
//!   - /etc/kubestale/platform.txt
//! blacklist:
//!   - '^monitoring:.*$'
//! exitCode: count
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analyzer::ExitCodeMode;
use crate::error::{CoreError, Result};

/// API server URL used when nothing else is configured (`kubectl proxy`)
pub const DEFAULT_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// API server base URL
    #[serde(default)]
    pub url: Option<String>,

    /// Rule files appended after the built-in rules
    #[serde(default)]
    pub blacklist_files: Vec<PathBuf>,

    /// Patterns appended after every rule file
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Exit code mapping
    #[serde(default)]
    pub exit_code: Option<ExitCodeMode>,
}

impl Config {
    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_yaml(&content).map_err(|e| CoreError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse configuration from YAML; an empty document yields defaults
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
            serde_yaml::Value::Null => Ok(Self::default()),
            value => serde_yaml::from_value(value),
        }
    }

    /// `<config dir>/kubestale/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubestale").join("config.yaml"))
    }
}
