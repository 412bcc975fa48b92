//! Request handlers for the gateway.

use crate::error::GatewayError;
use crate::response;
use crate::state::AppState;
use crate::templates;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::HeaderMap;
use axum::response::{Html, Response};
use axum::{Form, Json};
use eamquery_core::QueryRequest;
use eamquery_transcode::{OutputFormat, Transcoder};
use serde_json::json;
use std::collections::HashMap;

/// Request header selecting the output representation.
pub const PROCESS_TYPE_HEADER: &str = "x-process-type";

/// Handler for the query form page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(templates::index_page(state.output().sample_rows))
}

/// Health check.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": "eamquery-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handler for `POST /run`. Output format comes from `X-Process-Type`,
/// defaulting to HTML.
pub async fn run_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, GatewayError> {
    let Form(form) = form?;
    let format = process_type(&headers).unwrap_or_default();
    execute(state, format, form).await
}

/// Handler for `POST /csv`: like [`run_query`] but defaults to CSV.
pub async fn run_query_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, GatewayError> {
    let Form(form) = form?;
    let format = process_type(&headers).unwrap_or(OutputFormat::Csv);
    execute(state, format, form).await
}

fn process_type(headers: &HeaderMap) -> Option<OutputFormat> {
    headers
        .get(PROCESS_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| OutputFormat::from_process_type(Some(v)))
}

async fn execute(
    state: AppState,
    format: OutputFormat,
    form: HashMap<String, String>,
) -> Result<Response, GatewayError> {
    let request = QueryRequest::from_form(&form)?;
    tracing::info!(
        username = request.username(),
        tenant = request.tenant(),
        sample = request.sample(),
        %format,
        "Running query"
    );

    let envelope = state.envelope().build(&request);
    let upstream = state.upstream().send(envelope).await?;

    response::stream_table(
        Transcoder::new(upstream.body),
        upstream.status,
        format,
        state.output().chunk_bytes,
    )
    .await
}
