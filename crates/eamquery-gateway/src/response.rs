//! Streaming response writer.
//!
//! HTTP fixes the status code with the first body byte, so a response cannot
//! both stream eagerly and report every failure through its status. The
//! writer resolves this with a deferred commit:
//!
//! 1. Rendered output is held back until the first data row starts. Until
//!    then only the column headers are buffered, so memory stays bounded by
//!    the column count.
//! 2. A fault or decode error before that point becomes a proper error
//!    response ([`GatewayError`]) and no table body is ever sent.
//! 3. From the first row on, the status is 200 and rows are streamed in chunks
//!    of `chunk_bytes`. A later failure cannot change the status any more:
//!    HTML output gets the inline error fragment appended and ends; CSV output
//!    is aborted so the client sees a truncated transfer rather than a file
//!    that looks complete.
//!
//! A non-2xx upstream status is tolerated while the body may still carry a
//! `faultstring`. If the body ends without one, the answer is treated as an
//! upstream failure rather than an empty result.

use crate::error::GatewayError;
use crate::templates;
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use eamquery_transcode::{
    FormatSink, OutputFormat, TableEvent, TableSink, TranscodeError, TranscodeStats, Transcoder,
};
use futures::Stream;
use std::io;
use std::time::Instant;
use tokio::io::AsyncBufRead;

/// Transcode `transcoder` into an HTTP response in `format`.
///
/// `upstream_status` is the HTTP status the body arrived with.
pub async fn stream_table<R>(
    mut transcoder: Transcoder<R>,
    upstream_status: StatusCode,
    format: OutputFormat,
    chunk_bytes: usize,
) -> Result<Response, GatewayError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let started = Instant::now();
    let mut sink = format.sink(Vec::with_capacity(chunk_bytes));
    let mut stats = TranscodeStats::default();

    loop {
        match transcoder.next_event().await? {
            None => {
                if !upstream_status.is_success() {
                    return Err(unexplained_status(upstream_status));
                }
                sink.finish().map_err(TranscodeError::from)?;
                tracing::info!(
                    %format,
                    columns = stats.columns,
                    rows = stats.rows,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query result rendered"
                );
                return Ok(success(format, Body::from(sink.into_inner())));
            }
            Some(TableEvent::Fault(message)) => {
                return Err(GatewayError::ApplicationFault(message));
            }
            Some(event) => {
                stats.record(&event);
                sink.on_event(&event).map_err(TranscodeError::from)?;
                if event == TableEvent::RowStart {
                    break;
                }
            }
        }
    }

    tracing::debug!(%format, columns = stats.columns, "First row reached, streaming response");
    let rows = stream_rows(transcoder, upstream_status, sink, stats, chunk_bytes, started);
    Ok(success(format, Body::from_stream(rows)))
}

fn unexplained_status(upstream_status: StatusCode) -> GatewayError {
    GatewayError::UpstreamUnreachable(format!(
        "endpoint answered HTTP {upstream_status} without a fault message"
    ))
}

fn success(format: OutputFormat, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.content_type()),
    );
    if let Some(disposition) = format.content_disposition() {
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(disposition),
        );
    }
    response
}

/// Body stream for a committed response.
fn stream_rows<R>(
    mut transcoder: Transcoder<R>,
    upstream_status: StatusCode,
    mut sink: FormatSink<Vec<u8>>,
    mut stats: TranscodeStats,
    chunk_bytes: usize,
    started: Instant,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async_stream::stream! {
        let format = sink.format();
        loop {
            let failure = match transcoder.next_event().await {
                Ok(Some(TableEvent::Fault(message))) => {
                    if let Err(e) = sink.on_event(&TableEvent::Fault(message.clone())) {
                        yield Err(e);
                        break;
                    }
                    message
                }
                Ok(Some(event)) => {
                    stats.record(&event);
                    if let Err(e) = sink.on_event(&event) {
                        yield Err(e);
                        break;
                    }
                    if sink.get_mut().len() >= chunk_bytes {
                        let chunk = std::mem::replace(sink.get_mut(), Vec::with_capacity(chunk_bytes));
                        yield Ok(Bytes::from(chunk));
                    }
                    continue;
                }
                Ok(None) if !upstream_status.is_success() => {
                    unexplained_status(upstream_status).to_string()
                }
                Ok(None) => {
                    if let Err(e) = sink.finish() {
                        yield Err(e);
                        break;
                    }
                    let tail = std::mem::take(sink.get_mut());
                    if !tail.is_empty() {
                        yield Ok(Bytes::from(tail));
                    }
                    tracing::info!(
                        %format,
                        columns = stats.columns,
                        rows = stats.rows,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Query result streamed"
                    );
                    break;
                }
                Err(e) => GatewayError::from(e).to_string(),
            };

            tracing::warn!(
                %format,
                rows = stats.rows,
                error = %failure,
                "Query failed after the response was committed"
            );
            let mut tail = std::mem::take(sink.get_mut());
            if format == OutputFormat::Html {
                tail.extend_from_slice(templates::error_fragment(&failure).as_bytes());
                yield Ok(Bytes::from(tail));
            } else {
                if !tail.is_empty() {
                    yield Ok(Bytes::from(tail));
                }
                yield Err(io::Error::other(failure));
            }
            break;
        }
    }
}
