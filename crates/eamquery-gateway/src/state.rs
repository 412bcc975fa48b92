//! Gateway application state.

use crate::error::GatewayError;
use crate::upstream::UpstreamClient;
use eamquery_core::{EnvelopeBuilder, GatewayConfig, OutputConfig};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    upstream: UpstreamClient,
    envelope: EnvelopeBuilder,
    output: OutputConfig,
}

impl AppState {
    /// Create the state from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let envelope = EnvelopeBuilder::new()
            .organization(config.upstream.organization.clone())
            .session_scenario(config.upstream.session_scenario.clone())
            .sample_rows(config.output.sample_rows);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                upstream,
                envelope,
                output: config.output.clone(),
            }),
        })
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.inner.upstream
    }

    pub fn envelope(&self) -> &EnvelopeBuilder {
        &self.inner.envelope
    }

    pub fn output(&self) -> &OutputConfig {
        &self.inner.output
    }
}
