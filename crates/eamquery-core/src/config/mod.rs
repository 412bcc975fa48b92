//! Configuration types for the EAM query gateway.
//!
//! Configuration is loaded from a single YAML file (`eamquery.yaml` by default).
//! Every section and field has a default, so an empty file is a valid
//! configuration that talks to the hosted EAM endpoint.
//!
//! # Sections
//!
//! - **server**: listen address of the HTTP gateway
//! - **upstream**: EAM web service endpoint, SOAP header values and timeouts
//! - **output**: streaming chunk size and sample row limit
//! - **logging**: default `tracing` filter when `RUST_LOG` is not set

pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use upstream::UpstreamConfig;

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream EAM web service.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Output rendering settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// The `host:port` pair to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rendered bytes are handed to the HTTP body once this many accumulate.
    #[serde(default = "default_chunk_bytes")]
    pub chunk_bytes: usize,

    /// Row limit applied when the form asks for a sample.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: default_chunk_bytes(),
            sample_rows: default_sample_rows(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    42069
}

fn default_chunk_bytes() -> usize {
    8 * 1024
}

fn default_sample_rows() -> u32 {
    50
}

fn default_filter() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document as a struct; treat it as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }

    /// Reject values that would make the gateway unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.chunk_bytes == 0 {
            return Err(ConfigError::Config(
                "output.chunk_bytes must be greater than zero".to_string(),
            ));
        }
        if self.output.sample_rows == 0 {
            return Err(ConfigError::Config(
                "output.sample_rows must be greater than zero".to_string(),
            ));
        }
        self.upstream.validate()
    }
}
