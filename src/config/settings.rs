//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the client runtime.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration settings for the client runtime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend API configuration
    pub api: ApiSettings,
    /// Session token configuration
    pub session: SessionSettings,
    /// Notification queue configuration
    pub notifications: NotificationSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Origin the API is served from
    pub base_url: String,
    /// Path prefix prepended to every endpoint
    pub base_path: String,
    /// Default request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Storage key holding the token record
    pub token_key: String,
    /// TTL used when the caller does not supply one, in seconds
    pub default_ttl_secs: u64,
    /// Authentication entry point used by the session-expired action
    pub auth_redirect: String,
    /// Directory for the longer-lived store; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
}

/// Notification queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Auto-dismiss delay in milliseconds
    pub duration_ms: u64,
    /// Exit transition length in milliseconds
    pub close_animation_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            base_path: "/api".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_key: "veteran_ai_token".to_string(),
            default_ttl_secs: 3600,
            auth_redirect: "/frontend_auth.html".to_string(),
            storage_dir: None,
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            close_animation_ms: 300,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl ApiSettings {
    /// Default request timeout budget
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl NotificationSettings {
    /// Auto-dismiss delay
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Delay between entering the closing state and purging
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_animation_ms)
    }
}

impl SessionSettings {
    /// Resolve the directory of the longer-lived store
    pub fn resolve_storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("veteran-client")
        })
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(base_url) = std::env::var("VETERAN_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(base_path) = std::env::var("VETERAN_API_BASE_PATH") {
            self.api.base_path = base_path;
        }

        if let Ok(timeout) = std::env::var("VETERAN_API_TIMEOUT_MS") {
            self.api.timeout_ms = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        if let Ok(ttl) = std::env::var("VETERAN_TOKEN_TTL") {
            self.session.default_ttl_secs = ttl
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid TTL: {}", e)))?;
        }

        if let Ok(dir) = std::env::var("VETERAN_STORAGE_DIR") {
            self.session.storage_dir = Some(PathBuf::from(dir));
        }

        if let Ok(level) = std::env::var("VETERAN_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Check the settings for values the runtime cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| crate::Error::config(format!("Invalid base URL: {}", e)))?;

        if !self.api.base_path.is_empty() && !self.api.base_path.starts_with('/') {
            return Err(crate::Error::config("Base path must start with '/'"));
        }

        if self.api.timeout_ms == 0 {
            return Err(crate::Error::config("Request timeout must be positive"));
        }

        if self.session.default_ttl_secs == 0 {
            return Err(crate::Error::config("Default token TTL must be positive"));
        }

        if self.session.token_key.trim().is_empty() {
            return Err(crate::Error::config("Token key must not be empty"));
        }

        if self.notifications.duration_ms == 0 {
            return Err(crate::Error::config(
                "Notification duration must be positive",
            ));
        }

        Ok(())
    }
}
