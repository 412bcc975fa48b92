//! Client for the upstream EWS connector.

use crate::error::GatewayError;
use bytes::Bytes;
use eamquery_core::UpstreamConfig;
use futures::{Stream, TryStreamExt};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::io;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio_util::io::StreamReader;

type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// The upstream response body as a buffered async reader.
///
/// Dropping it releases the underlying connection.
pub type UpstreamBody = StreamReader<ByteStream, Bytes>;

/// Status and body of an upstream answer.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: UpstreamBody,
}

/// Posts SOAP envelopes to the configured endpoint.
///
/// One instance is shared by all requests; it holds no per-request state.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: String,
    response_timeout: Duration,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| GatewayError::StartupFailed(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            response_timeout: config.response_timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post an envelope and return the response body as a stream.
    ///
    /// Transport failures and timeouts map to
    /// [`GatewayError::UpstreamUnreachable`]; nothing is retried. A non-2xx
    /// status is not an error here: SOAP faults arrive as HTTP 500 with a
    /// `faultstring` body that the transcoder reports.
    pub async fn send(&self, envelope: String) -> Result<UpstreamResponse, GatewayError> {
        let started = Instant::now();
        let request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(envelope)
            .send();

        let response = tokio::time::timeout(self.response_timeout, request)
            .await
            .map_err(|_| {
                GatewayError::UpstreamUnreachable(format!(
                    "no response from {} within {}s",
                    self.endpoint,
                    self.response_timeout.as_secs()
                ))
            })?
            .map_err(|e| GatewayError::UpstreamUnreachable(e.to_string()))?;

        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status.is_success() {
            tracing::info!(status = status.as_u16(), elapsed_ms, "Upstream responded");
        } else {
            tracing::warn!(
                status = status.as_u16(),
                elapsed_ms,
                "Upstream responded with error status, decoding body for a fault"
            );
        }

        let stream: ByteStream = Box::pin(response.bytes_stream().map_err(io::Error::other));
        Ok(UpstreamResponse {
            status,
            body: StreamReader::new(stream),
        })
    }
}
