//! Forward-only XML token stream over an async byte source.

use crate::error::TranscodeError;
use crate::event::XmlEvent;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::VecDeque;
use tokio::io::AsyncBufRead;

/// Lazily decodes [`XmlEvent`]s from a byte stream.
///
/// Adjacent text and CDATA runs are merged into a single
/// [`XmlEvent::CharacterData`], so entity references never split a value.
/// Comments, processing instructions, declarations and doctypes are skipped.
pub struct XmlTokens<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    queued: VecDeque<XmlEvent>,
    eof: bool,
}

impl<R: AsyncBufRead + Unpin> XmlTokens<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: Reader::from_reader(inner),
            buf: Vec::with_capacity(1024),
            queued: VecDeque::with_capacity(2),
            eof: false,
        }
    }

    /// Pull the next event, or `None` once the document is exhausted.
    pub async fn next(&mut self) -> Result<Option<XmlEvent>, TranscodeError> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(Some(event));
        }

        let mut text: Option<String> = None;
        loop {
            if self.eof {
                return Ok(text.map(XmlEvent::CharacterData));
            }

            self.buf.clear();
            match self.reader.read_event_into_async(&mut self.buf).await? {
                Event::Start(e) => self.queued.push_back(element_start(&e)?),
                Event::Empty(e) => {
                    self.queued.push_back(element_start(&e)?);
                    self.queued.push_back(XmlEvent::ElementEnd {
                        name: decode_name(e.local_name().as_ref()),
                    });
                }
                Event::End(e) => self.queued.push_back(XmlEvent::ElementEnd {
                    name: decode_name(e.local_name().as_ref()),
                }),
                Event::Text(e) => {
                    text.get_or_insert_with(String::new)
                        .push_str(&e.unescape()?);
                    continue;
                }
                Event::CData(e) => {
                    text.get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                    continue;
                }
                Event::Eof => {
                    self.eof = true;
                    continue;
                }
                _ => continue,
            }

            return Ok(match text {
                Some(text) => Some(XmlEvent::CharacterData(text)),
                None => self.queued.pop_front(),
            });
        }
    }
}

fn element_start(e: &BytesStart<'_>) -> Result<XmlEvent, TranscodeError> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        attributes.push((
            decode_name(attr.key.local_name().as_ref()),
            attr.unescape_value()?.into_owned(),
        ));
    }
    Ok(XmlEvent::ElementStart {
        name: decode_name(e.local_name().as_ref()),
        attributes,
    })
}

fn decode_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn collect(xml: &str) -> Result<Vec<XmlEvent>, TranscodeError> {
        let mut tokens = XmlTokens::new(xml.as_bytes());
        let mut events = Vec::new();
        while let Some(event) = tokens.next().await? {
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn test_local_names_and_attributes() {
        let events = collect(r#"<soap:Body><ns:Column label="ID" ns:width="3"/></soap:Body>"#)
            .await
            .unwrap();
        assert_eq!(
            events,
            vec![
                XmlEvent::start("Body"),
                XmlEvent::start_with("Column", &[("label", "ID"), ("width", "3")]),
                XmlEvent::end("Column"),
                XmlEvent::end("Body"),
            ]
        );
    }

    #[tokio::test]
    async fn test_text_entities_and_cdata_coalesce() {
        let events = collect("<C>a &lt; b<![CDATA[ & c]]></C>").await.unwrap();
        assert_eq!(
            events,
            vec![
                XmlEvent::start("C"),
                XmlEvent::text("a < b & c"),
                XmlEvent::end("C"),
            ]
        );
    }

    #[tokio::test]
    async fn test_declaration_and_comments_skipped() {
        let events = collect("<?xml version=\"1.0\"?><!-- note --><R></R>")
            .await
            .unwrap();
        assert_eq!(events, vec![XmlEvent::start("R"), XmlEvent::end("R")]);
    }

    #[tokio::test]
    async fn test_trailing_text_flushed_at_eof() {
        let events = collect("<a/>tail").await.unwrap();
        assert_eq!(
            events,
            vec![XmlEvent::start("a"), XmlEvent::end("a"), XmlEvent::text("tail")]
        );
    }

    #[tokio::test]
    async fn test_mismatched_end_tag_is_malformed() {
        let err = collect("<R><C>1</R>").await.unwrap_err();
        assert!(matches!(err, TranscodeError::MalformedXml(_)));
    }
}
