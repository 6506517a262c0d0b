//! Runtime configuration for `LuauPad`
//!
//! Read-only: nothing here is ever written back to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::state::DEFAULT_NAME;

// Default value functions for serde
fn default_endpoint() -> String {
    "https://dark-exec-web.vercel.app/".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_export_extension() -> String {
    "lua".to_string()
}
fn default_name() -> String {
    DEFAULT_NAME.to_string()
}
fn default_copy_indicator_ms() -> u64 {
    2000
}
fn default_open_filters() -> Vec<String> {
    vec!["lua".to_string(), "txt".to_string()]
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote execution endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Extension appended to exported names, without the dot
    #[serde(default = "default_export_extension")]
    pub export_extension: String,
    /// Name of the initial document and of the replacement for a closed last document
    #[serde(default = "default_name")]
    pub default_name: String,
    #[serde(default = "default_copy_indicator_ms")]
    pub copy_indicator_ms: u64,
    #[serde(default = "default_open_filters")]
    pub open_filters: Vec<String>,
    /// Where exports land; the current directory when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            export_extension: default_export_extension(),
            default_name: default_name(),
            copy_indicator_ms: default_copy_indicator_ms(),
            open_filters: default_open_filters(),
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Standard config location, `<config_dir>/LuauPad/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("LuauPad").join("config.toml"))
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from an explicit file. A missing or malformed file is an error.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given, else the standard location if it exists, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn copy_indicator(&self) -> Duration {
        Duration::from_millis(self.copy_indicator_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_toml(
            r#"
endpoint = "http://127.0.0.1:9000/run"
copy_indicator_ms = 500
export_dir = "/tmp/out"
"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://127.0.0.1:9000/run");
        assert_eq!(config.copy_indicator(), Duration::from_millis(500));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.export_extension, "lua");
        assert_eq!(config.default_name, "New Script");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load_or_default(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
