//! Output sinks rendering table events.
//!
//! A sink owns the formatting state for the row being written and nothing
//! else. Once it has seen [`TableEvent::Fault`] it writes nothing more; what the
//! caller does with the fault (status codes, inline markers) is not the sink's
//! concern.

mod csv;
mod html;

pub use self::csv::{CsvSink, Dialect};
pub use self::html::{HtmlSink, html_escape};

use crate::event::TableEvent;
use std::io;

/// Consumer of a table event sequence.
pub trait TableSink {
    /// Render one event.
    fn on_event(&mut self, event: &TableEvent) -> io::Result<()>;

    /// Write whatever closes the document. Not called after a fault.
    fn finish(&mut self) -> io::Result<()>;
}
