//! Configuration management
//!
//! This module handles loading configuration from TOML files. Everything has
//! a sensible default, so the client also runs with no config file at all.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Authentication server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the portal lives
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL of the authentication server, scheme included
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://10.1.1.1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from an explicit path, the usual search locations,
    /// or defaults if nothing is found
    pub fn load(path_override: Option<&str>) -> Result<Self> {
        let config_paths: Vec<PathBuf> = match path_override {
            Some(p) => vec![PathBuf::from(p)],
            None => vec![
                PathBuf::from("config.toml"),
                PathBuf::from("/etc/campusnet/config.toml"),
                dirs::home_dir()
                    .map(|h| h.join(".config/campusnet/config.toml"))
                    .unwrap_or_default(),
            ],
        };

        for path in &config_paths {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;

                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;

                return Ok(config);
            }
        }

        if let Some(p) = path_override {
            anyhow::bail!("Config file not found: {}", p);
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.http.timeout, 10);
        assert_eq!(cfg.http.connect_timeout, 5);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.server.base_url.starts_with("http://"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://172.16.0.2"

            [http]
            timeout = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.base_url, "http://172.16.0.2");
        assert_eq!(cfg.http.timeout, 3);
        assert_eq!(cfg.http.connect_timeout, 5);
    }
}
