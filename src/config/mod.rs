pub mod preferences;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BASE_URL_ENV: &str = "CORTEX_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_push_path")]
    pub push_path: String,
    #[serde(default = "default_push_enabled")]
    pub push_enabled: bool,
    /// Outbound requests never time out unless this is set.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_push_path() -> String {
    "api/events".to_string()
}

fn default_push_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            push_path: default_push_path(),
            push_enabled: default_push_enabled(),
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    /// Where the terminal front end writes the rendered page after each update.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

fn default_model() -> String {
    "qwen2.5:72b".to_string()
}

fn default_notification_ttl_ms() -> u64 {
    3000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            notification_ttl_ms: default_notification_ttl_ms(),
            snapshot_path: None,
        }
    }
}

impl UiConfig {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cortex-client")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path` (or the platform config dir), then apply `.env` overrides.
    /// Falls back to defaults if the file is missing or can't be parsed.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(Self::config_path);
        let mut config = path
            .as_deref()
            .and_then(Self::read_file)
            .unwrap_or_default();

        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.server.base_url = url;
        }
        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config");
                None
            }
        }
    }
}
