//! Loading configuration from YAML files and environment overrides

use std::collections::HashMap;
use std::io::Write;

use agora::config::{AppConfig, StorageBackend};
use tempfile::NamedTempFile;

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_yaml_file() {
    let file = yaml_file(
        r#"
server:
  bind: "0.0.0.0:8080"
storage:
  backend: postgres
  database_url: "postgres://agora:secret@db/agora"
auth:
  token_ttl_hours: 48
pagination:
  default_limit: 10
  max_limit: 50
logging:
  filter: "agora=debug"
"#,
    );

    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.storage.backend, StorageBackend::Postgres);
    assert_eq!(
        config.storage.database_url.as_deref(),
        Some("postgres://agora:secret@db/agora")
    );
    assert_eq!(config.auth.token_ttl_hours, 48);
    assert_eq!(config.pagination.default_limit, 10);
    assert_eq!(config.pagination.max_limit, 50);
    assert_eq!(config.logging.filter, "agora=debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_overrides_file() {
    let file = yaml_file("server:\n  bind: \"127.0.0.1:4000\"\nlogging:\n  filter: \"info\"\n");
    let env: HashMap<&str, &str> = HashMap::from([
        ("AGORA_BIND", "0.0.0.0:5000"),
        ("AGORA_LOG", "agora=trace"),
    ]);

    let mut config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    config
        .apply_env(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:5000");
    assert_eq!(config.logging.filter, "agora=trace");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = yaml_file("{}\n");
    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:3000");
    assert_eq!(config.auth.token_ttl_hours, 24);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = AppConfig::from_yaml_file("/definitely/not/here.yaml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let file = yaml_file("server: [unclosed\n");
    assert!(AppConfig::from_yaml_file(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_invalid_limits_rejected() {
    let file = yaml_file("pagination:\n  default_limit: 200\n  max_limit: 100\n");
    let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_backend_rejected() {
    let file = yaml_file("storage:\n  backend: cassandra\n");
    assert!(AppConfig::from_yaml_file(file.path().to_str().unwrap()).is_err());
}
