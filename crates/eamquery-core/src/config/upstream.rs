//! Upstream EAM web service configuration.
//!
//! The endpoint URL can be given directly (`url`) or through an environment
//! variable (`url_env`), which takes precedence when set.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the upstream SOAP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Environment variable name containing the endpoint URL.
    /// Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_env: Option<String>,

    /// Endpoint URL of the EWS connector.
    #[serde(default = "default_url")]
    pub url: String,

    /// Value of the `Organization` SOAP header.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Value of the `SessionScenario` SOAP header.
    #[serde(default = "default_session_scenario")]
    pub session_scenario: String,

    /// Timeout in seconds for establishing the TCP/TLS connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Timeout in seconds for the upstream to start answering.
    #[serde(default = "default_response_timeout")]
    pub response_timeout_seconds: u64,

    /// Maximum idle time in seconds between two reads of the response body.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url_env: None,
            url: default_url(),
            organization: default_organization(),
            session_scenario: default_session_scenario(),
            connect_timeout_seconds: default_connect_timeout(),
            response_timeout_seconds: default_response_timeout(),
            read_timeout_seconds: default_read_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Resolve the endpoint URL, checking `url_env` first.
    pub fn endpoint(&self) -> String {
        if let Some(env_var) = &self.url_env
            && let Ok(url) = std::env::var(env_var)
        {
            return url;
        }
        self.url.clone()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("connect_timeout_seconds", self.connect_timeout_seconds),
            ("response_timeout_seconds", self.response_timeout_seconds),
            ("read_timeout_seconds", self.read_timeout_seconds),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::Config(format!(
                    "upstream.{name} must be greater than zero"
                )));
            }
        }
        if self.url.trim().is_empty() && self.url_env.is_none() {
            return Err(ConfigError::Config("upstream.url is empty".to_string()));
        }
        Ok(())
    }
}

fn default_url() -> String {
    "https://us1.eam.hxgnsmartcloud.com/axis/services/EWSConnector".to_string()
}

fn default_organization() -> String {
    "GSO".to_string()
}

fn default_session_scenario() -> String {
    "terminate".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_response_timeout() -> u64 {
    60
}

fn default_read_timeout() -> u64 {
    120
}
