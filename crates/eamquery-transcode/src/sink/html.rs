use super::TableSink;
use crate::event::TableEvent;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    NotStarted,
    Header,
    Body,
}

/// Renders a `<table class="data-table">` fragment.
///
/// Header cells accumulate in the `<thead>` row until the first data row,
/// which closes the header and opens `<tbody>`. Labels and cell values are
/// HTML-escaped.
pub struct HtmlSink<W> {
    out: W,
    section: Section,
    faulted: bool,
}

impl<W: Write> HtmlSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            section: Section::NotStarted,
            faulted: false,
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn open_table(&mut self) -> io::Result<()> {
        if self.section == Section::NotStarted {
            self.out.write_all(b"<table class=\"data-table\"><thead><tr>")?;
            self.section = Section::Header;
        }
        Ok(())
    }

    fn open_body(&mut self) -> io::Result<()> {
        self.open_table()?;
        if self.section == Section::Header {
            self.out.write_all(b"</tr></thead><tbody>")?;
            self.section = Section::Body;
        }
        Ok(())
    }
}

impl<W: Write> TableSink for HtmlSink<W> {
    fn on_event(&mut self, event: &TableEvent) -> io::Result<()> {
        if self.faulted {
            return Ok(());
        }
        match event {
            TableEvent::ColumnHeader(label) => {
                self.open_table()?;
                write!(self.out, "<th><span>{}</span></th>", html_escape(label))
            }
            TableEvent::RowStart => {
                self.open_body()?;
                self.out.write_all(b"<tr>")
            }
            TableEvent::Cell(text) => write!(self.out, "<td>{}</td>", html_escape(text)),
            TableEvent::RowEnd => self.out.write_all(b"</tr>"),
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
        self.open_body()?;
        self.out.write_all(b"</tbody></table>")?;
        self.out.flush()
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(events: &[TableEvent], finish: bool) -> String {
        let mut sink = HtmlSink::new(Vec::new());
        for event in events {
            sink.on_event(event).unwrap();
        }
        if finish {
            sink.finish().unwrap();
        }
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_result_is_empty_table() {
        assert_eq!(
            render(&[], true),
            "<table class=\"data-table\"><thead><tr></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_headers_without_rows() {
        let html = render(&[TableEvent::ColumnHeader("ID".to_string())], true);
        assert_eq!(
            html,
            "<table class=\"data-table\"><thead><tr><th><span>ID</span></th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_values_are_escaped() {
        let html = render(
            &[
                TableEvent::ColumnHeader("<b>".to_string()),
                TableEvent::RowStart,
                TableEvent::Cell("Tom & \"Jerry\"".to_string()),
                TableEvent::RowEnd,
            ],
            true,
        );
        assert!(html.contains("<th><span>&lt;b&gt;</span></th>"));
        assert!(html.contains("<td>Tom &amp; &quot;Jerry&quot;</td>"));
    }

    #[test]
    fn test_fault_stops_output() {
        let html = render(
            &[
                TableEvent::ColumnHeader("ID".to_string()),
                TableEvent::Fault("boom".to_string()),
                TableEvent::RowStart,
            ],
            true,
        );
        assert_eq!(html, "<table class=\"data-table\"><thead><tr><th><span>ID</span></th>");
        assert!(!html.contains("tbody"));
    }

    #[test]
    fn test_multiple_rows_single_tbody() {
        let html = render(
            &[
                TableEvent::RowStart,
                TableEvent::Cell("1".to_string()),
                TableEvent::RowEnd,
                TableEvent::RowStart,
                TableEvent::Cell("2".to_string()),
                TableEvent::RowEnd,
            ],
            true,
        );
        assert_eq!(html.matches("<tbody>").count(), 1);
        assert!(html.ends_with("<tr><td>1</td></tr><tr><td>2</td></tr></tbody></table>"));
    }
}
