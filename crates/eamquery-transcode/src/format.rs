//! Selection of the output representation.

use crate::event::TableEvent;
use crate::sink::{CsvSink, Dialect, HtmlSink, TableSink};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// The closed set of output representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// HTML table fragment for in-page display.
    #[default]
    Html,
    /// CSV download.
    Csv,
    /// CSV download flagged for spreadsheet applications.
    Xlsx,
}

impl OutputFormat {
    /// Resolve the value of the `X-Process-Type` request header.
    ///
    /// `csv` and `xlsx` (case-insensitive) select the download formats; a
    /// missing or unrecognised value falls back to HTML.
    pub fn from_process_type(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Html => "text/html; charset=utf-8",
            OutputFormat::Csv => "text/csv; charset=utf-8",
            OutputFormat::Xlsx => "application/vnd.ms-excel; charset=utf-8",
        }
    }

    /// `Content-Disposition` value, for formats served as attachments.
    pub fn content_disposition(self) -> Option<&'static str> {
        match self {
            OutputFormat::Html => None,
            OutputFormat::Csv | OutputFormat::Xlsx => Some("attachment; filename=data.csv"),
        }
    }

    /// Create the sink rendering this format into `out`.
    pub fn sink<W: Write>(self, out: W) -> FormatSink<W> {
        match self {
            OutputFormat::Html => FormatSink::Html(HtmlSink::new(out)),
            OutputFormat::Csv => FormatSink::Csv(CsvSink::new(out, Dialect::Csv)),
            OutputFormat::Xlsx => FormatSink::Xlsx(CsvSink::new(out, Dialect::Spreadsheet)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" => Ok(OutputFormat::Xlsx),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// A sink for one of the [`OutputFormat`]s, chosen once per response.
pub enum FormatSink<W> {
    Html(HtmlSink<W>),
    Csv(CsvSink<W>),
    Xlsx(CsvSink<W>),
}

impl<W: Write> FormatSink<W> {
    pub fn format(&self) -> OutputFormat {
        match self {
            FormatSink::Html(_) => OutputFormat::Html,
            FormatSink::Csv(_) => OutputFormat::Csv,
            FormatSink::Xlsx(_) => OutputFormat::Xlsx,
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        match self {
            FormatSink::Html(sink) => sink.get_mut(),
            FormatSink::Csv(sink) | FormatSink::Xlsx(sink) => sink.get_mut(),
        }
    }

    pub fn into_inner(self) -> W {
        match self {
            FormatSink::Html(sink) => sink.into_inner(),
            FormatSink::Csv(sink) | FormatSink::Xlsx(sink) => sink.into_inner(),
        }
    }
}

impl<W: Write> TableSink for FormatSink<W> {
    fn on_event(&mut self, event: &TableEvent) -> io::Result<()> {
        match self {
            FormatSink::Html(sink) => sink.on_event(event),
            FormatSink::Csv(sink) | FormatSink::Xlsx(sink) => sink.on_event(event),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        match self {
            FormatSink::Html(sink) => sink.finish(),
            FormatSink::Csv(sink) | FormatSink::Xlsx(sink) => sink.finish(),
        }
    }
}
