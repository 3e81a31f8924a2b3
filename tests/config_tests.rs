//! Configuration file tests
//!
//! Loading from disk, fallback on broken files and saving.

use docedit::app::config::{AppConfig, Backend};
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "store_url = \"http://docs.internal:8080\"\nbackend = \"memory\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.store_url, "http://docs.internal:8080");
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_filter, AppConfig::default().log_filter);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store_url = [not toml").unwrap();

        assert!(AppConfig::load_from_file(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            store_url: "http://127.0.0.1:3000".to_string(),
            backend: Backend::Memory,
            new_file_content: "# New note\n".to_string(),
            ..AppConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(AppConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides_apply_after_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store_url = \"http://from-file\"\n").unwrap();

        let mut config = AppConfig::load_or_default(&path);
        config.apply_env_overrides(|key| {
            (key == docedit::app::config::ENV_STORE_URL).then(|| "http://from-env".to_string())
        });
        assert_eq!(config.store_url, "http://from-env");
        assert_eq!(config.backend, Backend::Http);
    }
}
