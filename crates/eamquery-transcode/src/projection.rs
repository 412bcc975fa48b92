//! Projection of the upstream XML protocol onto table events.
//!
//! # Upstream protocol contract
//!
//! The `GetDatabaseData` response is expected to contain:
//!
//! - `Metadata` with one `Column` element per result column, the column name in
//!   its `label` attribute
//! - `Data` with one `R` element per row, each holding one `C` element per cell
//!   whose text is the cell value
//! - optionally a `faultstring` element, anywhere, whose text is an error
//!   message from the EAM application
//!
//! A `C` element never contains child elements. The projection reads exactly
//! one token after `<C>` and treats anything other than text as an empty cell,
//! so a nested element inside `C` would be silently dropped.

use crate::error::TranscodeError;
use crate::event::{TableEvent, XmlEvent};
use crate::sink::TableSink;
use crate::xml::XmlTokens;
use std::time::Instant;
use tokio::io::AsyncBufRead;

const FAULT_WITHOUT_MESSAGE: &str = "upstream reported a fault";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    None,
    Cell,
    Fault,
}

/// Synchronous XmlEvent → TableEvent state machine.
///
/// Holds no tokens beyond the single lookahead needed after `C` and
/// `faultstring`.
#[derive(Debug)]
pub struct Projection {
    lookahead: Lookahead,
    rows_started: bool,
    faulted: bool,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection {
    pub fn new() -> Self {
        Self {
            lookahead: Lookahead::None,
            rows_started: false,
            faulted: false,
        }
    }

    /// Feed one XML token; returns the table event it completes, if any.
    pub fn feed(&mut self, event: XmlEvent) -> Result<Option<TableEvent>, TranscodeError> {
        if self.faulted {
            return Err(TranscodeError::Terminated);
        }

        match std::mem::replace(&mut self.lookahead, Lookahead::None) {
            Lookahead::Cell => {
                let value = match event {
                    XmlEvent::CharacterData(text) => text,
                    _ => String::new(),
                };
                return Ok(Some(TableEvent::Cell(value)));
            }
            Lookahead::Fault => {
                let message = match event {
                    XmlEvent::CharacterData(text) if !text.trim().is_empty() => text,
                    _ => FAULT_WITHOUT_MESSAGE.to_string(),
                };
                self.faulted = true;
                return Ok(Some(TableEvent::Fault(message)));
            }
            Lookahead::None => {}
        }

        match event {
            XmlEvent::ElementStart { name, attributes } => match name.as_str() {
                "Column" => {
                    if self.rows_started {
                        return Err(TranscodeError::MalformedMetadata(
                            "Column element after the first data row".to_string(),
                        ));
                    }
                    let label = attributes
                        .into_iter()
                        .find(|(key, _)| key == "label")
                        .map(|(_, value)| value)
                        .ok_or_else(|| {
                            TranscodeError::MalformedMetadata(
                                "Column element without a label attribute".to_string(),
                            )
                        })?;
                    Ok(Some(TableEvent::ColumnHeader(label)))
                }
                "C" => {
                    self.lookahead = Lookahead::Cell;
                    Ok(None)
                }
                "R" => {
                    self.rows_started = true;
                    Ok(Some(TableEvent::RowStart))
                }
                "faultstring" => {
                    self.lookahead = Lookahead::Fault;
                    Ok(None)
                }
                _ => Ok(None),
            },
            XmlEvent::ElementEnd { name } if name == "R" => Ok(Some(TableEvent::RowEnd)),
            _ => Ok(None),
        }
    }

    /// Signal end of input; resolves a dangling lookahead.
    ///
    /// A document ending right after `<faultstring>` still reports the fault.
    pub fn finish(&mut self) -> Option<TableEvent> {
        match std::mem::replace(&mut self.lookahead, Lookahead::None) {
            Lookahead::Fault => {
                self.faulted = true;
                Some(TableEvent::Fault(FAULT_WITHOUT_MESSAGE.to_string()))
            }
            Lookahead::Cell => Some(TableEvent::Cell(String::new())),
            Lookahead::None => None,
        }
    }

    /// Whether a fault has been emitted.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }
}

/// Pull-based transcoder over an XML byte stream.
pub struct Transcoder<R> {
    tokens: XmlTokens<R>,
    projection: Projection,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> Transcoder<R> {
    pub fn new(inner: R) -> Self {
        Self {
            tokens: XmlTokens::new(inner),
            projection: Projection::new(),
            done: false,
        }
    }

    /// Pull the next table event. `None` marks a successful end of document.
    ///
    /// A [`TableEvent::Fault`] is returned as an event; afterwards the
    /// transcoder reports end of stream without reading further input.
    pub async fn next_event(&mut self) -> Result<Option<TableEvent>, TranscodeError> {
        if self.done || self.projection.is_faulted() {
            return Ok(None);
        }
        loop {
            match self.tokens.next().await? {
                Some(event) => {
                    if let Some(table_event) = self.projection.feed(event)? {
                        return Ok(Some(table_event));
                    }
                }
                None => {
                    self.done = true;
                    return Ok(self.projection.finish());
                }
            }
        }
    }
}

/// Counters reported after a transcode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    pub columns: usize,
    pub rows: usize,
}

impl TranscodeStats {
    /// Account for one event.
    pub fn record(&mut self, event: &TableEvent) {
        match event {
            TableEvent::ColumnHeader(_) => self.columns += 1,
            TableEvent::RowStart => self.rows += 1,
            _ => {}
        }
    }
}

/// Transcode a whole XML stream into `sink`.
///
/// On success the sink is finished and the stats are returned. A fault is
/// delivered to the sink first and then returned as
/// [`TranscodeError::ApplicationFault`]; output already written stays written.
pub async fn transcode<R, S>(inner: R, sink: &mut S) -> Result<TranscodeStats, TranscodeError>
where
    R: AsyncBufRead + Unpin,
    S: TableSink + ?Sized,
{
    let started = Instant::now();
    let mut transcoder = Transcoder::new(inner);
    let mut stats = TranscodeStats::default();

    while let Some(event) = transcoder.next_event().await? {
        stats.record(&event);
        sink.on_event(&event)?;
        if let TableEvent::Fault(message) = event {
            tracing::debug!(rows = stats.rows, "Upstream fault ended transcode");
            return Err(TranscodeError::ApplicationFault(message));
        }
    }
    sink.finish()?;

    tracing::debug!(
        columns = stats.columns,
        rows = stats.rows,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Transcode finished"
    );
    Ok(stats)
}
