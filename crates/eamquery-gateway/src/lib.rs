//! # eamquery-gateway
//!
//! HTTP front end of the EAM query gateway.
//!
//! A form submitted to `POST /run` is validated, turned into a SOAP envelope
//! and posted to the upstream EWS connector. The XML answer is transcoded while
//! it arrives and streamed back as an HTML table, CSV or spreadsheet CSV,
//! chosen by the `X-Process-Type` request header.
//!
//! ## Error responses
//!
//! Failures are rendered as a styled inline `<span>` so the page that issued
//! the request can show them in place of the result table:
//!
//! | error | status |
//! |---|---|
//! | missing form fields | 400 |
//! | body is not a urlencoded form | 415 or 400 |
//! | upstream `faultstring` before any row | 400 |
//! | upstream unreachable or timed out | 502 |
//! | upstream error status with no `faultstring` | 502 |
//! | malformed upstream XML or metadata | 502 |
//!
//! Once the first data row has been sent the status code is fixed; see
//! [`response`] for how later failures are reported.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;
pub mod upstream;

pub use error::GatewayError;
pub use server::GatewayServer;
pub use state::AppState;
