// src/config.rs - Configuration: defaults, optional TOML file, .env and environment overrides
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: u64,
    pub client_timeout: u64,
    pub client_shutdown: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub max_request_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            keep_alive: 30,
            client_timeout: 30,
            client_shutdown: 5,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:asset_inventory.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            idle_timeout: 600,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_request_size: 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = match env::var("CONFIG_FILE") {
        Ok(config_file) => {
            let config_str = fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {}", config_file))?;
            Config::from_toml_str(&config_str)
                .with_context(|| format!("Failed to parse config file: {}", config_file))?
        }
        Err(_) => Config::default(),
    };

    override_with_env(&mut config, |key| env::var(key).ok());

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

/// Applies overrides from `lookup`. Values that do not parse are ignored.
pub fn override_with_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("BIND_ADDRESS") {
        config.server.host = host;
    }
    if let Some(port) = lookup("ASSET_PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.server.port = port;
    }
    if let Some(workers) = lookup("ASSET_WORKERS").and_then(|v| v.parse::<usize>().ok()) {
        config.server.workers = Some(workers);
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(max_conn) = lookup("DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse::<u32>().ok()) {
        config.database.max_connections = max_conn;
    }
    if let Some(min_conn) = lookup("DATABASE_MIN_CONNECTIONS").and_then(|v| v.parse::<u32>().ok()) {
        config.database.min_connections = min_conn;
    }
    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(level) = lookup("RUST_LOG") {
        config.logging.level = level;
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server port must not be 0"));
        }

        if self.database.url.trim().is_empty() {
            return Err(anyhow::anyhow!("database url must not be empty"));
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(anyhow::anyhow!(
                "max_connections ({}) must be >= min_connections ({})",
                self.database.max_connections,
                self.database.min_connections
            ));
        }

        Ok(())
    }

    pub fn print_startup_info(&self) {
        log::info!("📦 Asset inventory starting up...");
        log::info!("🌐 Server: {}:{}", self.server.host, self.server.port);
        log::info!("💾 Database: {}",
            if self.database.url.starts_with("sqlite") { "SQLite" } else { "Unknown" });
        log::info!("📊 Logging: {} level", self.logging.level);
        log::info!("🔓 CORS origins: {}", self.security.allowed_origins.join(", "));
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.database.url.starts_with("sqlite:"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.database.max_connections = 1;
        config.database.min_connections = 5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"
            "#
        )?;

        let content = fs::read_to_string(file.path())?;
        let config = Config::from_toml_str(&content)?;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.keep_alive, 30);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
        Ok(())
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        override_with_env(
            &mut config,
            lookup_from(&[
                ("ASSET_PORT", "9090"),
                ("ASSET_WORKERS", "4"),
                ("DATABASE_URL", "sqlite:/var/lib/assets.db"),
                ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
                ("RUST_LOG", "debug"),
            ]),
        );

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.workers, Some(4));
        assert_eq!(config.database.url, "sqlite:/var/lib/assets.db");
        assert_eq!(
            config.security.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unparsable_env_values_are_ignored() {
        let mut config = Config::default();
        override_with_env(
            &mut config,
            lookup_from(&[("ASSET_PORT", "eighty"), ("DATABASE_MAX_CONNECTIONS", "-1")]),
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
    }
}
