//! Application configuration.
//!
//! Read once at startup from `config.toml` in the platform config directory.
//! A missing file means defaults; a broken file is reported and also falls
//! back to defaults so the editor always starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_STORE_URL: &str = "DOCEDIT_STORE_URL";
pub const ENV_BACKEND: &str = "DOCEDIT_BACKEND";

const DEFAULT_LOG_FILTER: &str = "docedit=info,eframe=info,egui=warn,reqwest=warn,hyper=warn";

/// Which document store the editor talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Remote store over HTTP
    #[default]
    Http,
    /// In-process store, nothing is kept after exit
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Backend::Http),
            "memory" => Ok(Backend::Memory),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_url: String,
    pub request_timeout_secs: u64,
    pub backend: Backend,
    pub log_filter: String,
    /// Content of files created from the file tree
    pub new_file_content: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            backend: Backend::Http,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            new_file_content: String::new(),
        }
    }
}

impl AppConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Self {
        let mut config = match config_file_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load a config file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_STORE_URL).filter(|v| !v.trim().is_empty()) {
            self.store_url = url.trim().to_string();
        }
        if let Some(value) = lookup(ENV_BACKEND) {
            match value.parse() {
                Ok(backend) => self.backend = backend,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_BACKEND, e),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "", "docedit")
}

pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Directory holding `docedit.log` and `crash.log`.
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}

pub fn log_file_path() -> Option<PathBuf> {
    log_dir().map(|dir| dir.join("docedit.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("store_url = \"http://store:9000\"").unwrap();
        assert_eq!(config.store_url, "http://store:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.backend, Backend::Http);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            ENV_STORE_URL => Some(" http://other:1234 ".to_string()),
            ENV_BACKEND => Some("Memory".to_string()),
            _ => None,
        });
        assert_eq!(config.store_url, "http://other:1234");
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_bad_backend_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == ENV_BACKEND).then(|| "ftp".to_string()));
        assert_eq!(config.backend, Backend::Http);
    }

    #[test]
    fn test_timeout_never_zero() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
