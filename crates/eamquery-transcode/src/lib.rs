//! # eamquery-transcode
//!
//! Single-pass, constant-memory conversion of an EAM `GetDatabaseData`
//! response into tabular output.
//!
//! The pipeline has three stages, each testable on its own:
//!
//! 1. [`xml::XmlTokens`] turns a byte stream into [`XmlEvent`]s.
//! 2. [`projection::Projection`] maps XML events onto [`TableEvent`]s. It knows
//!    the upstream protocol (`Metadata/Column@label`, `Data/R/C`, `faultstring`)
//!    and nothing about output formats.
//! 3. A [`TableSink`] renders table events as bytes. Sinks know the output
//!    format and nothing about XML or HTTP.
//!
//! [`transcode`] wires the three together for callers that only need the
//! finished output.

pub mod error;
pub mod event;
pub mod format;
pub mod projection;
pub mod sink;
pub mod xml;

pub use error::TranscodeError;
pub use event::{TableEvent, XmlEvent};
pub use format::{FormatSink, OutputFormat};
pub use projection::{Projection, TranscodeStats, Transcoder, transcode};
pub use sink::{CsvSink, Dialect, HtmlSink, TableSink};
pub use xml::XmlTokens;
