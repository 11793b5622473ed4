//! Guard configuration.
//!
//! Mirrors the plugin's `config.yml`: allow-list, exclusions, deny message,
//! log verbosity and config version. JSON is accepted as well.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GuardError, Result};

/// Config structure version this crate understands. Older files still load
/// but trigger a warning.
pub const CURRENT_CONFIG_VERSION: i64 = 2;

/// Message shown to denied clients unless the config overrides it
pub const DEFAULT_DENY_MESSAGE: &str =
    "Access denied. Your IP address is not allowed to access this service.";

/// Log level that enables informational diagnostics
const VERBOSE_LOG_LEVEL: &str = "INFO";

/// What to do when the range table cannot be loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFailureMode {
    /// Keep the policy with an empty table; every non-excluded address is denied
    #[default]
    Deny,
    /// Disable the guard; every address is allowed
    Allow,
}

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn detect(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GuardConfig {
    /// Turn the guard off entirely
    pub disable: bool,
    pub allowed_countries: Vec<String>,
    pub excluded_ips: Vec<String>,
    #[serde(rename = "Kick-message", alias = "deny-message")]
    pub deny_message: String,
    pub log_level: String,
    pub config_version: i64,
    pub on_table_error: TableFailureMode,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            disable: false,
            allowed_countries: Vec::new(),
            excluded_ips: Vec::new(),
            deny_message: DEFAULT_DENY_MESSAGE.to_string(),
            log_level: VERBOSE_LOG_LEVEL.to_string(),
            config_version: 0,
            on_table_error: TableFailureMode::Deny,
        }
    }
}

impl GuardConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.yml`/`.yaml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::detect(path).ok_or_else(|| {
            GuardError::Config(format!(
                "cannot detect config format of {}",
                path.display()
            ))
        })?;
        let text = fs::read_to_string(path).map_err(|e| {
            GuardError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        match format {
            ConfigFormat::Yaml => Self::from_yaml_str(&text),
            ConfigFormat::Json => Self::from_json_str(&text),
        }
    }

    /// Whether informational diagnostics and per-deny logs are enabled.
    /// Only the exact value `INFO` counts.
    pub fn is_verbose(&self) -> bool {
        self.log_level == VERBOSE_LOG_LEVEL
    }

    /// Whether the file predates [`CURRENT_CONFIG_VERSION`]
    pub fn is_outdated(&self) -> bool {
        self.config_version < CURRENT_CONFIG_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
disable: false
allowed-countries:
  - US
  - CA
excluded-ips:
  - 8.8.8.8
Kick-message: "Go away"
log-level: WARN
config-version: 2
on-table-error: allow
"#;
        let cfg = GuardConfig::from_yaml_str(yaml).unwrap();
        assert!(!cfg.disable);
        assert_eq!(cfg.allowed_countries, vec!["US", "CA"]);
        assert_eq!(cfg.excluded_ips, vec!["8.8.8.8"]);
        assert_eq!(cfg.deny_message, "Go away");
        assert!(!cfg.is_verbose());
        assert!(!cfg.is_outdated());
        assert_eq!(cfg.on_table_error, TableFailureMode::Allow);
    }

    #[test]
    fn test_defaults() {
        let cfg = GuardConfig::from_yaml_str("allowed-countries: [DE]").unwrap();
        assert_eq!(cfg.deny_message, DEFAULT_DENY_MESSAGE);
        assert!(cfg.is_verbose());
        assert!(cfg.is_outdated());
        assert!(cfg.excluded_ips.is_empty());
        assert_eq!(cfg.on_table_error, TableFailureMode::Deny);

        let cfg = GuardConfig::from_yaml_str("").unwrap();
        assert!(cfg.allowed_countries.is_empty());
    }

    #[test]
    fn test_log_level_is_case_sensitive() {
        assert!(GuardConfig::from_yaml_str("log-level: INFO").unwrap().is_verbose());
        assert!(!GuardConfig::from_yaml_str("log-level: info").unwrap().is_verbose());
        assert!(!GuardConfig::from_yaml_str("log-level: Info").unwrap().is_verbose());
        assert!(!GuardConfig::from_yaml_str("log-level: DEBUG").unwrap().is_verbose());
    }

    #[test]
    fn test_negative_config_version_loads_as_outdated() {
        let yaml = "config-version: -1\nallowed-countries: [US]\n";
        let cfg = GuardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.config_version, -1);
        assert!(cfg.is_outdated());
        assert_eq!(cfg.allowed_countries, vec!["US"]);
    }

    #[test]
    fn test_deny_message_alias_and_unknown_keys() {
        let yaml = "deny-message: nope\nsome-future-key: 1\n";
        let cfg = GuardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.deny_message, "nope");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = GuardConfig::from_yaml_str("allowed-countries: 5").unwrap_err();
        assert!(matches!(err, GuardError::Yaml(_)));
    }

    #[test]
    fn test_json_config() {
        let json = r#"{"allowed-countries": ["gb"], "excluded-ips": ["1.1.1.1"], "disable": true}"#;
        let cfg = GuardConfig::from_json_str(json).unwrap();
        assert!(cfg.disable);
        assert_eq!(cfg.allowed_countries, vec!["gb"]);
        assert_eq!(cfg.excluded_ips, vec!["1.1.1.1"]);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::detect("config.yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::detect("config.YAML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::detect("config.json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::detect("config.toml"), None);
        assert_eq!(ConfigFormat::detect("config"), None);
    }

    #[test]
    fn test_from_file_unknown_format() {
        let err = GuardConfig::from_file("/etc/ipguard.conf").unwrap_err();
        assert!(matches!(err, GuardError::Config(_)));
    }
}
