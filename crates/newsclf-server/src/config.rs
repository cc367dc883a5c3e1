//! Server configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model artifact loaded at startup
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Append-only request log
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Largest accepted `/predict` body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(&cli.config).exists() {
            let content = std::fs::read_to_string(&cli.config)
                .with_context(|| format!("failed to read {}", cli.config.display()))?;
            Self::from_yaml_str(&content)
                .with_context(|| format!("invalid configuration in {}", cli.config.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        Ok(config)
    }

    /// Parse a YAML document; absent keys take their defaults
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply CLI flags (and their environment variables) on top of the file
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model_path = model.clone();
        }

        if let Some(log_file) = &cli.log_file {
            self.log_path = log_file.clone();
        }

        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            self.port = port;
        }
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.listen, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            model_path: default_model_path(),
            log_path: default_log_path(),
            max_body_bytes: default_max_body_bytes(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Install the Prometheus exporter and serve `/metrics`
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("data/news_classifier.json")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("data/logs.out")
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
        assert_eq!(config.model_path, PathBuf::from("data/news_classifier.json"));
        assert_eq!(config.log_path, PathBuf::from("data/logs.out"));
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml_str(
            r#"
port: 9100
log_path: /var/log/newsclf/logs.out
metrics:
  enabled: false
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.listen, "127.0.0.1");
        assert_eq!(config.log_path, PathBuf::from("/var/log/newsclf/logs.out"));
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ServerConfig::from_yaml_str("port: not-a-number").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "newsclf-server",
            "--config",
            "/nonexistent/newsclf.yaml",
            "--model",
            "/models/news.json",
            "--port",
            "9000",
        ]);

        let config = ServerConfig::load(&cli).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/news.json"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_path, PathBuf::from("data/logs.out"));
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = ServerConfig {
            listen: "not an address".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
