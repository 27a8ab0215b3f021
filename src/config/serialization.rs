//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use std::path::Path;

/// A value as a TOML string literal, escaped by the toml crate
fn toml_str(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn toml_path(path: &Path) -> String {
    toml_str(&path.display().to_string())
}

impl Config {
    /// Render the full config as a commented TOML document
    pub fn to_toml(&self) -> String {
        let catalog = match &self.catalog_path {
            Some(path) => format!("catalog_path = {}", toml_path(path)),
            None => "# catalog_path = \"/path/to/products.json\"".to_string(),
        };

        format!(
            r#"# storefront configuration

# Authentication backend (POST /api/login, /api/register)
api_url = {api_url}

# Where the session token and user record are kept
storage_path = {storage_path}

# JSON array of products replacing the bundled catalog
{catalog}

# Notification lifetime in milliseconds (0 = until dismissed)
notification_ms = {notification_ms}

# Timeout for auth requests
request_timeout_secs = {timeout}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            api_url = toml_str(&self.api_url),
            storage_path = toml_path(&self.storage_path),
            catalog = catalog,
            notification_ms = self.notification_ms,
            timeout = self.request_timeout_secs,
            log_level = toml_str(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = toml_str(&self.logging.file_prefix),
        )
    }
}
