//! Subcommand implementations.

pub mod envelope;
pub mod serve;
pub mod transcode;

use anyhow::Context;
use eamquery_core::GatewayConfig;
use std::path::Path;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "eamquery.yaml";

/// Load the configuration file.
///
/// An explicit path must exist. Without one, `./eamquery.yaml` is used when
/// present and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    match path {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                GatewayConfig::from_file(default)
                    .with_context(|| format!("failed to load config from {DEFAULT_CONFIG_FILE}"))
            } else {
                Ok(GatewayConfig::default())
            }
        }
    }
}
