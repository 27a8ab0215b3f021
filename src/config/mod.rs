//! Configuration for the storefront client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/storefront/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;

#[cfg(test)]
mod tests;

pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_NOTIFICATION_MS: u64 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the authentication backend
    pub api_url: String,

    /// JSON file backing the session's key/value storage
    pub storage_path: PathBuf,

    /// Product list replacing the bundled one
    pub catalog_path: Option<PathBuf>,

    /// How long a notification stays visible (0 = until dismissed)
    pub notification_ms: u64,

    /// Per-request timeout for auth calls
    pub request_timeout_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: default_storage_path(),
            catalog_path: None,
            notification_ms: DEFAULT_NOTIFICATION_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

/// `<data_dir>/storefront/local_storage.json`, or the working directory without one
fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront")
        .join("local_storage.json")
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub storage_path: Option<String>,
    pub catalog_path: Option<String>,
    pub notification_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/storefront/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("storefront").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that cannot be read or parsed is reported on stderr and
    /// replaced by defaults, so a typo never locks the user out.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Config error in {}: {}", path.display(), e);
                    eprintln!("Using built-in defaults. Run `storefront config --reset` to regenerate.");
                    FileConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("Cannot read config {}: {}", path.display(), e);
                FileConfig::default()
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::layered(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge the three layers; `env` looks up an environment variable
    pub(crate) fn layered(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = env("STOREFRONT_API_URL")
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        let storage_path = env("STOREFRONT_STORAGE")
            .or(file.storage_path)
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let catalog_path = env("STOREFRONT_CATALOG")
            .or(file.catalog_path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        // Unparseable numbers fall through to the next layer
        let notification_ms = env("STOREFRONT_NOTIFICATION_MS")
            .and_then(|v| v.trim().parse().ok())
            .or(file.notification_ms)
            .unwrap_or(defaults.notification_ms);

        let request_timeout_secs = file
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.request_timeout_secs);

        Self {
            api_url,
            storage_path,
            catalog_path,
            notification_ms,
            request_timeout_secs,
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
