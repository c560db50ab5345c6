use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::shares::ShareConfig;
use crate::errors::{Result, ShareLockError};

/// Project-level configuration, loaded from `.sharelock.toml`.
///
/// Every field has a sensible default so ShareLock works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the document store.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Shares handed out when `create` is not given `--shares`.
    #[serde(default = "default_total_shares")]
    pub default_total_shares: u8,

    /// Shares needed to unlock when `create` is not given `--threshold`.
    #[serde(default = "default_threshold")]
    pub default_threshold: u8,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_dir() -> String {
    ".sharelock".to_string()
}

fn default_total_shares() -> u8 {
    5
}

fn default_threshold() -> u8 {
    3
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            default_total_shares: default_total_shares(),
            default_threshold: default_threshold(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".sharelock.toml";

    /// Load settings from `<project_dir>/.sharelock.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ShareLockError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the document store.
    ///
    /// Example: `project_dir/.sharelock`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.store_dir)
    }

    /// Resolve a share configuration, letting explicit values override
    /// the configured defaults.
    pub fn share_config(&self, total: Option<u8>, threshold: Option<u8>) -> Result<ShareConfig> {
        ShareConfig::new(
            total.unwrap_or(self.default_total_shares),
            threshold.unwrap_or(self.default_threshold),
        )
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.store_dir, ".sharelock");
        assert_eq!(s.default_total_shares, 5);
        assert_eq!(s.default_threshold, 3);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_dir, ".sharelock");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
store_dir = "docs"
default_total_shares = 7
default_threshold = 4
"#;
        fs::write(tmp.path().join(".sharelock.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.store_dir, "docs");
        assert_eq!(settings.default_total_shares, 7);
        assert_eq!(settings.default_threshold, 4);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".sharelock.toml"), "default_threshold = 2\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_threshold, 2);
        // Rest should be defaults
        assert_eq!(settings.store_dir, ".sharelock");
        assert_eq!(settings.default_total_shares, 5);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".sharelock.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn store_path_respects_custom_dir() {
        let s = Settings {
            store_dir: "docs".to_string(),
            ..Settings::default()
        };
        let project = Path::new("/home/user/myproject");
        assert_eq!(s.store_path(project), PathBuf::from("/home/user/myproject/docs"));
    }

    #[test]
    fn share_config_prefers_explicit_values() {
        let s = Settings::default();
        let config = s.share_config(Some(4), None).unwrap();
        assert_eq!(config.total(), 4);
        assert_eq!(config.threshold(), 3);

        assert!(s.share_config(Some(2), None).is_err());
        assert!(s.share_config(Some(30), Some(2)).is_err());
    }
}
