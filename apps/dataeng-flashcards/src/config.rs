//! Configuration for the flashcards app.

use flashcard_core::{ProgressModel, RemoteSettings, SessionMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_NAME: &str = "dataeng-flashcards";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    fn parse(content: &str) -> Option<Self> {
        match toml::from_str(content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Ignoring invalid config: {}", e);
                None
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|d| d.config_dir().join("config.toml"))
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| Self::project_dirs().map(|d| d.data_dir().join("flashcards.db")))
            .unwrap_or_else(|| "flashcards.db".into())
    }

    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| "logs".into())
    }

    /// Remote settings when sync is enabled and a URL is configured.
    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        if !self.sync.enabled {
            return None;
        }
        let base_url = self.sync.base_url.clone().filter(|u| !u.trim().is_empty())?;
        Some(RemoteSettings {
            base_url,
            collection: self.sync.collection.clone(),
            auth_token: self.sync.auth_token.clone(),
            timeout: Duration::from_secs(self.sync.timeout_secs),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub mode: SessionMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default)]
    pub model: ProgressModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_collection() -> String { "questions".to_string() }
fn default_timeout_secs() -> u64 { 10 }

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            collection: default_collection(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.study.mode, SessionMode::PriorityFiltered);
        assert_eq!(config.progress.model, ProgressModel::Mastery);
        assert_eq!(config.sync.collection, "questions");
        assert_eq!(config.sync.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.remote_settings().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [study]
            mode = "random_draw"

            [progress]
            model = "tally"

            [sync]
            enabled = true
            base_url = "https://bank.example.com"
            timeout_secs = 3

            [storage]
            database_path = "/tmp/cards.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.study.mode, SessionMode::RandomDraw);
        assert_eq!(config.progress.model, ProgressModel::Tally);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/cards.db"));

        let remote = config.remote_settings().unwrap();
        assert_eq!(remote.base_url, "https://bank.example.com");
        assert_eq!(remote.collection, "questions");
        assert_eq!(remote.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_sync_needs_url() {
        let config = Config::parse("[sync]\nenabled = true\nbase_url = \"  \"\n").unwrap();
        assert!(config.remote_settings().is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Config::parse("[study]\nmode = \"sideways\"\n").is_none());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.sync.enabled = true;
        config.sync.base_url = Some("https://bank.example.com".into());
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert!(parsed.remote_settings().is_some());
    }
}
