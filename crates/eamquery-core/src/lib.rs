//! # eamquery-core
//!
//! Shared building blocks for the EAM query gateway:
//!
//! - [`config`]: the YAML configuration file (`eamquery.yaml`)
//! - [`request`]: validation of the submitted query form into a [`QueryRequest`]
//! - [`envelope`]: the SOAP envelope sent to the upstream EAM web service

pub mod config;
pub mod envelope;
pub mod request;

pub use config::{
    ConfigError, GatewayConfig, LoggingConfig, OutputConfig, ServerConfig, UpstreamConfig,
};
pub use envelope::{EnvelopeBuilder, build_envelope};
pub use request::{QueryRequest, ValidationError};
