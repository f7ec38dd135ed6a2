// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Bind address, with `DRAFTSCOPE_ADDR` taking precedence over the file.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = match std::env::var("DRAFTSCOPE_ADDR") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => format!("{}:{}", self.host, self.port),
        };
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

/// Calibration knobs for the detector. Scoring weights live in the pattern table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Minimum trimmed character count for a text to be analyzed.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    #[serde(default = "default_true")]
    pub strip_markup: bool,
    /// Absolute word-count change (percent) that marks a final as significantly modified.
    #[serde(default = "default_change_percent")]
    pub significant_change_percent: f64,
    /// AI-likelihood increase from draft to final that marks significant modification.
    #[serde(default = "default_ai_delta")]
    pub significant_ai_delta: i32,
    #[serde(default = "default_sentence_ai")]
    pub sentence_ai_threshold: u8,
    #[serde(default = "default_sentence_human")]
    pub sentence_human_threshold: u8,
    #[serde(default = "default_sentence_min_words")]
    pub sentence_min_words: usize,
    #[serde(default = "default_max_batch")]
    pub max_batch_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            strip_markup: true,
            significant_change_percent: default_change_percent(),
            significant_ai_delta: default_ai_delta(),
            sentence_ai_threshold: default_sentence_ai(),
            sentence_human_threshold: default_sentence_human(),
            sentence_min_words: default_sentence_min_words(),
            max_batch_size: default_max_batch(),
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8787 }
fn default_true() -> bool { true }
fn default_min_text_chars() -> usize { 10 }
fn default_change_percent() -> f64 { 15.0 }
fn default_ai_delta() -> i32 { 10 }
fn default_sentence_ai() -> u8 { 60 }
fn default_sentence_human() -> u8 { 40 }
fn default_sentence_min_words() -> usize { 5 }
fn default_max_batch() -> usize { 50 }

const MAX_BACKUPS: usize = 10;

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// `DRAFTSCOPE_CONFIG_DIR`, else the platform config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        match std::env::var("DRAFTSCOPE_CONFIG_DIR") {
            Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|p| p.join("draftscope")),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn exists(&self) -> bool {
        self.config_file.exists()
    }

    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })
    }

    /// Load configuration; a missing file yields defaults
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration, backing up the previous file first
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(|source| ConfigError::Io {
            path: backup_dir.clone(),
            source,
        })?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(|source| ConfigError::Io {
            path: backup_file.clone(),
            source,
        })?;

        self.cleanup_old_backups(&backup_dir, MAX_BACKUPS);
        Ok(())
    }

    /// Best-effort removal of all but the newest `keep` backups
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) {
        let mut entries: Vec<_> = match fs::read_dir(backup_dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .collect(),
            Err(e) => {
                warn!(error = %e, "config.backup_cleanup_failed");
                return;
            }
        };

        if entries.len() <= keep {
            return;
        }

        // Oldest first; the timestamped names sort chronologically
        entries.sort_by_key(|e| e.file_name());

        let remove_count = entries.len() - keep;
        for entry in entries.iter().take(remove_count) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("draftscope-config-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection.min_text_chars, 10);
        assert_eq!(config.detection.sentence_ai_threshold, 60);
        assert!(config.detection.strip_markup);
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"detection":{"minTextChars":25}}"#).unwrap();
        assert_eq!(parsed.detection.min_text_chars, 25);
        assert_eq!(parsed.detection.max_batch_size, 50);
        assert_eq!(parsed.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let store = ConfigStore::new(scratch_dir());
        let config = store.load().unwrap();
        assert_eq!(config.detection, DetectionConfig::default());
    }

    #[test]
    fn test_save_roundtrip_creates_backup() {
        let dir = scratch_dir();
        let store = ConfigStore::new(dir.clone());

        let mut config = AppConfig::default();
        store.save(&config).unwrap();
        config.detection.significant_ai_delta = 20;
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.detection.significant_ai_delta, 20);

        let backups = fs::read_dir(dir.join("backups")).unwrap().count();
        assert_eq!(backups, 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = scratch_dir();
        let store = ConfigStore::new(dir.clone());
        store.ensure_dir().unwrap();
        fs::write(store.config_file(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
