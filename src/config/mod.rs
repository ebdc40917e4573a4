//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file (path in `AGORA_CONFIG`)
//! and is then overridden by environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `AGORA_BIND` | `server.bind` |
//! | `AGORA_DATABASE_URL` | `storage.database_url` (also selects `postgres`) |
//! | `AGORA_TOKEN_TTL_HOURS` | `auth.token_ttl_hours` |
//! | `AGORA_LOG` | `logging.filter` |

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "AGORA_CONFIG";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of a login session
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { token_ttl_hours: 24 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "agora=info,tower_http=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse YAML config")?;
        Ok(config)
    }

    /// Load the file named by `AGORA_CONFIG` (if any), apply environment
    /// overrides and validate
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `AGORA_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup("AGORA_BIND") {
            self.server.bind = bind;
        }

        if let Some(url) = lookup("AGORA_DATABASE_URL") {
            self.storage.database_url = Some(url);
            self.storage.backend = StorageBackend::Postgres;
        }

        if let Some(ttl) = lookup("AGORA_TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = ttl
                .parse()
                .with_context(|| format!("AGORA_TOKEN_TTL_HOURS is not an integer: {}", ttl))?;
        }

        if let Some(filter) = lookup("AGORA_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_ttl_hours <= 0 {
            bail!("auth.token_ttl_hours must be positive");
        }
        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            bail!("pagination limits must be at least 1");
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            bail!("pagination.default_limit may not exceed pagination.max_limit");
        }
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none() {
            bail!("storage.database_url is required for the postgres backend");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
server:
  bind: "0.0.0.0:8080"
pagination:
  default_limit: 10
"#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AGORA_BIND", "0.0.0.0:9000"),
            ("AGORA_DATABASE_URL", "postgres://localhost/agora"),
            ("AGORA_TOKEN_TTL_HOURS", "2"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.auth.token_ttl_hours, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_ttl_override() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| (key == "AGORA_TOKEN_TTL_HOURS").then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_postgres_without_url() {
        let config = AppConfig::from_yaml_str("storage:\n  backend: postgres\n").unwrap();
        assert!(config.validate().is_err());
    }
}
