// Config loading and validation tests

use svclens::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[metadata]
base_url = "https://tower.lan"
api_key = "secret-key"
verify_tls = false

[refresh]
interval_secs = 30
upstream_timeout_secs = 10
stats_log_interval_secs = 300

[publishing]
broadcast_capacity = 16
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.metadata.base_url, "https://tower.lan");
    assert_eq!(config.metadata.api_key, "secret-key");
    assert!(!config.metadata.verify_tls);
    assert_eq!(config.refresh.interval_secs, 30);
    assert_eq!(config.refresh.upstream_timeout_secs, 10);
    assert_eq!(config.publishing.broadcast_capacity, 16);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let minimal = r#"
[server]
port = 8081
host = "0.0.0.0"

[metadata]
base_url = "http://tower.lan"
api_key = "secret-key"
"#;
    let config = AppConfig::load_from_str(minimal).expect("minimal config");
    assert!(!config.metadata.verify_tls);
    assert_eq!(config.refresh.interval_secs, 30);
    assert_eq!(config.refresh.upstream_timeout_secs, 10);
    assert_eq!(config.refresh.stats_log_interval_secs, 300);
    assert_eq!(config.publishing.broadcast_capacity, 16);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_base_url() {
    let bad = VALID_CONFIG.replace("base_url = \"https://tower.lan\"", "base_url = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("metadata.base_url"));
}

#[test]
fn test_config_validation_rejects_non_http_base_url() {
    let bad = VALID_CONFIG.replace(
        "base_url = \"https://tower.lan\"",
        "base_url = \"tower.lan\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("metadata.base_url"));
}

#[test]
fn test_config_validation_rejects_empty_api_key() {
    let bad = VALID_CONFIG.replace("api_key = \"secret-key\"", "api_key = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("metadata.api_key"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_secs = 30", "interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("refresh.interval_secs"));
}

#[test]
fn test_config_validation_rejects_upstream_timeout_zero() {
    let bad = VALID_CONFIG.replace("upstream_timeout_secs = 10", "upstream_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("upstream_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 300",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 16", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.metadata.base_url, "https://tower.lan");
}

#[test]
fn test_host_address_extracts_host_from_base_url() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert_eq!(config.metadata.host_address().as_deref(), Some("tower.lan"));

    let with_port = VALID_CONFIG.replace(
        "base_url = \"https://tower.lan\"",
        "base_url = \"http://192.168.1.10:8443\"",
    );
    let config = AppConfig::load_from_str(&with_port).expect("valid");
    assert_eq!(
        config.metadata.host_address().as_deref(),
        Some("192.168.1.10")
    );
}
