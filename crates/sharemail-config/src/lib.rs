use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default cap on payload size; larger bodies are rejected before rendering.
pub const DEFAULT_MAX_TEXT_SIZE: usize = 1_048_576;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Recipient for notification emails.
    pub email_to: String,
    /// Domain used in the `From:` header.
    #[serde(default = "default_from_domain")]
    pub from_domain: String,
    /// Maximum accepted payload size in bytes.
    #[serde(default = "default_max_text_size")]
    pub max_text_size: usize,
}

fn default_from_domain() -> String {
    "localhost".to_string()
}

fn default_max_text_size() -> usize {
    DEFAULT_MAX_TEXT_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email_to: String::new(),
            from_domain: default_from_domain(),
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sharemail");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/sharemail/config.toml"));
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from_path(dir.path().join("missing.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "email_to = \"ops@example.org\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.email_to, "ops@example.org");
        assert_eq!(config.from_domain, "localhost");
        assert_eq!(config.max_text_size, DEFAULT_MAX_TEXT_SIZE);
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "email_to = [not toml").unwrap();

        let result = Config::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let original = Config {
            email_to: "inbox@example.org".to_string(),
            from_domain: "example.org".to_string(),
            max_text_size: 4096,
        };
        original.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.email_to, original.email_to);
        assert_eq!(loaded.from_domain, original.from_domain);
        assert_eq!(loaded.max_text_size, original.max_text_size);
    }
}
