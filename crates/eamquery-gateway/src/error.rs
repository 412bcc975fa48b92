//! Error types for the gateway crate.

use crate::templates;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use eamquery_core::ValidationError;
use eamquery_transcode::TranscodeError;
use thiserror::Error;

/// Errors that can occur while serving a query.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required form fields were missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body could not be decoded as a form.
    #[error("invalid form submission: {}", .0.body_text())]
    InvalidForm(#[from] FormRejection),

    /// The upstream endpoint could not be reached or did not answer in time.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The upstream answer is not well-formed XML.
    #[error("malformed XML in upstream response: {0}")]
    MalformedXml(String),

    /// The upstream metadata section is unusable.
    #[error("malformed metadata in upstream response: {0}")]
    MalformedMetadata(String),

    /// The upstream application reported an error.
    #[error("{0}")]
    ApplicationFault(String),

    /// Failed to start the server.
    #[error("failed to start gateway: {0}")]
    StartupFailed(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) | GatewayError::ApplicationFault(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::InvalidForm(rejection) => rejection.status(),
            GatewayError::UpstreamUnreachable(_)
            | GatewayError::MalformedXml(_)
            | GatewayError::MalformedMetadata(_) => StatusCode::BAD_GATEWAY,
            GatewayError::StartupFailed(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TranscodeError> for GatewayError {
    fn from(err: TranscodeError) -> Self {
        match err {
            TranscodeError::MalformedXml(quick_xml::Error::Io(e)) => {
                GatewayError::UpstreamUnreachable(format!("failed reading response body: {e}"))
            }
            TranscodeError::MalformedXml(e) => GatewayError::MalformedXml(e.to_string()),
            TranscodeError::MalformedMetadata(m) => GatewayError::MalformedMetadata(m),
            TranscodeError::ApplicationFault(m) => GatewayError::ApplicationFault(m),
            other => GatewayError::Internal(other.into()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Query failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Query rejected");
        }

        (status, Html(templates::error_fragment(&self.to_string()))).into_response()
    }
}
