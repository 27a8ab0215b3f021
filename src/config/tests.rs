//! Configuration tests
//!
//! Round-trips guard the template: every field `to_toml` writes must come
//! back through `FileConfig` unchanged.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn parse(toml_str: &str) -> FileConfig {
    match toml::from_str(toml_str) {
        Ok(file) => file,
        Err(e) => panic!("Config should parse.\nTOML:\n{}\nError: {}", toml_str, e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let reloaded = Config::layered(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.api_url, config.api_url);
    assert_eq!(reloaded.storage_path, config.storage_path);
    assert_eq!(reloaded.catalog_path, None);
    assert_eq!(reloaded.notification_ms, config.notification_ms);
    assert_eq!(reloaded.request_timeout_secs, config.request_timeout_secs);
    assert_eq!(reloaded.logging.level, config.logging.level);
    assert_eq!(reloaded.logging.file_rotation, config.logging.file_rotation);
}

#[test]
fn test_config_roundtrip_escapes_strings() {
    let mut config = Config::default();
    config.api_url = "http://toko.example.com/\"quoted\"".to_string();
    config.storage_path = PathBuf::from("/tmp/odd\u{1b}name\\session.json");
    config.logging.level = "storefront=debug,\"x\"".to_string();
    config.logging.file_prefix = "toko\ttab".to_string();

    let reloaded = Config::layered(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.api_url, config.api_url);
    assert_eq!(reloaded.storage_path, config.storage_path);
    assert_eq!(reloaded.logging.level, config.logging.level);
    assert_eq!(reloaded.logging.file_prefix, config.logging.file_prefix);
}

#[test]
fn test_config_roundtrip_custom_values() {
    let mut config = Config::default();
    config.api_url = "https://toko.example.com".to_string();
    config.storage_path = PathBuf::from("/tmp/store front/session.json");
    config.catalog_path = Some(PathBuf::from("/srv/catalog.json"));
    config.notification_ms = 0;
    config.request_timeout_secs = 30;
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "toko".to_string();

    let reloaded = Config::layered(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.api_url, config.api_url);
    assert_eq!(reloaded.storage_path, config.storage_path);
    assert_eq!(reloaded.catalog_path, config.catalog_path);
    assert_eq!(reloaded.notification_ms, 0);
    assert_eq!(reloaded.request_timeout_secs, 30);
    assert!(reloaded.logging.file_enabled);
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Hourly);
    assert_eq!(reloaded.logging.file_prefix, "toko");
}

// ─────────────────────────────────────────────────────────────────────────────
// Layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
api_url = "http://file:1"
notification_ms = 500
"#,
    );
    let env = env_from(&[
        ("STOREFRONT_API_URL", "http://env:2"),
        ("STOREFRONT_NOTIFICATION_MS", "1500"),
        ("STOREFRONT_CATALOG", "/env/catalog.json"),
    ]);

    let config = Config::layered(file, env);
    assert_eq!(config.api_url, "http://env:2");
    assert_eq!(config.notification_ms, 1500);
    assert_eq!(config.catalog_path, Some(PathBuf::from("/env/catalog.json")));
}

#[test]
fn test_invalid_env_number_falls_through() {
    let file = parse("notification_ms = 500\n");
    let config = Config::layered(file, env_from(&[("STOREFRONT_NOTIFICATION_MS", "soon")]));
    assert_eq!(config.notification_ms, 500);

    let config = Config::layered(
        FileConfig::default(),
        env_from(&[("STOREFRONT_NOTIFICATION_MS", "-1")]),
    );
    assert_eq!(config.notification_ms, DEFAULT_NOTIFICATION_MS);
}

#[test]
fn test_defaults_when_nothing_set() {
    let config = Config::layered(FileConfig::default(), no_env);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.notification_duration(), Duration::from_millis(3000));
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert!(config.storage_path.ends_with("storefront/local_storage.json"));
    assert!(!config.logging.file_enabled);
}

#[test]
fn test_zero_timeout_is_rejected() {
    let config = Config::layered(parse("request_timeout_secs = 0\n"), no_env);
    assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse("never"), LogRotation::Never);
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
}

#[test]
fn test_partial_logging_section() {
    let config = Config::layered(parse("[logging]\nlevel = \"debug\"\n"), no_env);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file_prefix, "storefront");
}
