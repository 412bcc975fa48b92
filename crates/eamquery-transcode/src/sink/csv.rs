use super::TableSink;
use crate::event::TableEvent;
use std::io::{self, Write};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Line conventions of a delimited output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain CSV with `\n` line breaks.
    Csv,
    /// CSV for spreadsheet applications: UTF-8 byte order mark and `\r\n`.
    Spreadsheet,
}

impl Dialect {
    fn line_break(self) -> &'static [u8] {
        match self {
            Dialect::Csv => b"\n",
            Dialect::Spreadsheet => b"\r\n",
        }
    }
}

/// Renders comma separated lines.
///
/// The header labels form the first line, each row the next. Line breaks
/// separate lines; the last line has no terminator. Fields containing a
/// comma, quote or line break are quoted.
pub struct CsvSink<W> {
    out: W,
    dialect: Dialect,
    started: bool,
    first_field: bool,
    faulted: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W, dialect: Dialect) -> Self {
        Self {
            out,
            dialect,
            started: false,
            first_field: true,
            faulted: false,
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn begin(&mut self) -> io::Result<()> {
        if !self.started {
            if self.dialect == Dialect::Spreadsheet {
                self.out.write_all(UTF8_BOM)?;
            }
            self.started = true;
        }
        Ok(())
    }

    fn write_field(&mut self, value: &str) -> io::Result<()> {
        self.begin()?;
        if !self.first_field {
            self.out.write_all(b",")?;
        }
        self.first_field = false;

        if value.contains([',', '"', '\r', '\n']) {
            write!(self.out, "\"{}\"", value.replace('"', "\"\""))
        } else {
            self.out.write_all(value.as_bytes())
        }
    }
}

impl<W: Write> TableSink for CsvSink<W> {
    fn on_event(&mut self, event: &TableEvent) -> io::Result<()> {
        if self.faulted {
            return Ok(());
        }
        match event {
            TableEvent::ColumnHeader(value) | TableEvent::Cell(value) => self.write_field(value),
            TableEvent::RowStart => {
                if self.started {
                    self.out.write_all(self.dialect.line_break())?;
                } else {
                    self.begin()?;
                }
                self.first_field = true;
                Ok(())
            }
            TableEvent::RowEnd => Ok(()),
            TableEvent::Fault(_) => {
                self.faulted = true;
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.faulted {
            return Ok(());
        }
        self.begin()?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(value: &str) -> TableEvent {
        TableEvent::Cell(value.to_string())
    }

    fn header(value: &str) -> TableEvent {
        TableEvent::ColumnHeader(value.to_string())
    }

    fn render(dialect: Dialect, events: &[TableEvent]) -> Vec<u8> {
        let mut sink = CsvSink::new(Vec::new(), dialect);
        for event in events {
            sink.on_event(event).unwrap();
        }
        sink.finish().unwrap();
        sink.into_inner()
    }

    #[test]
    fn test_no_trailing_newline() {
        let out = render(
            Dialect::Csv,
            &[
                header("ID"),
                header("Name"),
                TableEvent::RowStart,
                cell("1"),
                cell("Alice"),
                TableEvent::RowEnd,
                TableEvent::RowStart,
                cell("2"),
                cell("Bob"),
                TableEvent::RowEnd,
            ],
        );
        assert_eq!(String::from_utf8(out).unwrap(), "ID,Name\n1,Alice\n2,Bob");
    }

    #[test]
    fn test_rows_without_headers_start_on_first_line() {
        let out = render(
            Dialect::Csv,
            &[
                TableEvent::RowStart,
                cell("1"),
                TableEvent::RowEnd,
                TableEvent::RowStart,
                TableEvent::RowEnd,
                TableEvent::RowStart,
                cell("3"),
                TableEvent::RowEnd,
            ],
        );
        assert_eq!(String::from_utf8(out).unwrap(), "1\n\n3");
    }

    #[test]
    fn test_quoting() {
        let out = render(
            Dialect::Csv,
            &[TableEvent::RowStart, cell("a,b"), cell("say \"hi\""), cell("plain")],
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"a,b\",\"say \"\"hi\"\"\",plain"
        );
    }

    #[test]
    fn test_spreadsheet_dialect() {
        let out = render(
            Dialect::Spreadsheet,
            &[header("ID"), TableEvent::RowStart, cell("1"), TableEvent::RowEnd],
        );
        assert_eq!(out, b"\xEF\xBB\xBFID\r\n1".to_vec());
    }

    #[test]
    fn test_spreadsheet_empty_result_has_bom() {
        assert_eq!(render(Dialect::Spreadsheet, &[]), UTF8_BOM.to_vec());
        assert!(render(Dialect::Csv, &[]).is_empty());
    }

    #[test]
    fn test_fault_aborts_without_terminator() {
        let out = render(
            Dialect::Csv,
            &[
                header("ID"),
                TableEvent::RowStart,
                cell("1"),
                TableEvent::Fault("lost session".to_string()),
                TableEvent::RowEnd,
                TableEvent::RowStart,
                cell("2"),
            ],
        );
        assert_eq!(String::from_utf8(out).unwrap(), "ID\n1");
    }
}
