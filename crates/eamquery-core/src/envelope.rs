//! SOAP envelope for the `MP0170_GetDatabaseData_001` operation.
//!
//! The envelope carries the caller's credentials as a WS-Security
//! `UsernameToken` (`username@tenant` / `password`) and the SQL statement in
//! `SelectStatement`. Credentials and header values are fully XML-escaped.
//! Only `<` in the query text is escaped. That keeps SQL comparison operators
//! from opening tags, but it is not full XML escaping: a query containing `&`
//! or `]]>` is forwarded as written.

use crate::request::QueryRequest;

/// Builds SOAP envelopes for the EWS connector.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    organization: String,
    session_scenario: String,
    sample_rows: u32,
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self {
            organization: "GSO".to_string(),
            session_scenario: "terminate".to_string(),
            sample_rows: 50,
        }
    }
}

impl EnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `Organization` header value.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Set the `SessionScenario` header value.
    pub fn session_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.session_scenario = scenario.into();
        self
    }

    /// Set the row limit used for sample queries.
    pub fn sample_rows(mut self, rows: u32) -> Self {
        self.sample_rows = rows;
        self
    }

    /// The SQL statement as it is embedded in the envelope.
    pub fn statement(&self, request: &QueryRequest) -> String {
        let query = request.query().replace('<', "&lt;");
        if request.sample() {
            format!(
                "SELECT * FROM ({query}) WHERE ROWNUM &lt;= {}",
                self.sample_rows
            )
        } else {
            query
        }
    }

    /// Render the complete envelope for a request.
    pub fn build(&self, request: &QueryRequest) -> String {
        format!(
            r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
	<Header>
		<Security xmlns="http://schemas.xmlsoap.org/ws/2002/04/secext">
			<UsernameToken>
				<Username>{username}@{tenant}</Username>
				<Password>{password}</Password>
			</UsernameToken>
		</Security>
		<SessionScenario xmlns="http://schemas.datastream.net/headers">{scenario}</SessionScenario>
		<Organization xmlns="http://schemas.datastream.net/headers">{organization}</Organization>
	</Header>
	<Body>
		<MP0170_GetDatabaseData_001 verb="Get" noun="DatabaseData" version="001" xmlns="http://schemas.datastream.net/MP_functions/MP0170_001">
			<SelectStatement returnmetadata="true">
				{statement}
			</SelectStatement>
		</MP0170_GetDatabaseData_001>
	</Body>
</Envelope>"#,
            username = xml_escape(request.username()),
            tenant = xml_escape(request.tenant()),
            password = xml_escape(request.password()),
            scenario = xml_escape(&self.session_scenario),
            organization = xml_escape(&self.organization),
            statement = self.statement(request),
        )
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an envelope with the default header values and a 50 row sample limit.
pub fn build_envelope(request: &QueryRequest) -> String {
    EnvelopeBuilder::default().build(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    fn request(sample: bool, query: &str) -> QueryRequest {
        QueryRequest::new("jdoe", "s3cret", "ACME_PRD", sample, query).unwrap()
    }

    /// Parse the envelope and collect the text of every element with `name`.
    fn element_texts(xml: &str, name: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut texts = Vec::new();
        let mut inside = false;
        loop {
            match reader.read_event().expect("envelope is well-formed XML") {
                Event::Start(e) if e.local_name().as_ref() == name.as_bytes() => {
                    inside = true;
                    texts.push(String::new());
                }
                Event::End(e) if e.local_name().as_ref() == name.as_bytes() => inside = false,
                Event::Text(t) if inside => {
                    let text = t.unescape().unwrap();
                    if let Some(last) = texts.last_mut() {
                        last.push_str(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        texts
    }

    #[test]
    fn test_credentials_embedded_once() {
        let xml = build_envelope(&request(false, "SELECT 1 FROM dual"));
        assert_eq!(element_texts(&xml, "Username"), vec!["jdoe@ACME_PRD"]);
        assert_eq!(element_texts(&xml, "Password"), vec!["s3cret"]);
    }

    #[test]
    fn test_credentials_with_markup_characters() {
        let request =
            QueryRequest::new("o'brien", "p&ss<1\">", "ACME&CO", false, "SELECT 1").unwrap();
        let xml = build_envelope(&request);
        assert!(xml.contains("<Password>p&amp;ss&lt;1&quot;&gt;</Password>"));
        assert_eq!(element_texts(&xml, "Username"), vec!["o'brien@ACME&CO"]);
        assert_eq!(element_texts(&xml, "Password"), vec!["p&ss<1\">"]);
    }

    #[test]
    fn test_query_lt_escaped() {
        let xml = build_envelope(&request(false, "SELECT * FROM r5events WHERE evt_cost < 10"));
        assert!(xml.contains("evt_cost &lt; 10"));
        let statement = element_texts(&xml, "SelectStatement");
        assert_eq!(
            statement[0].trim(),
            "SELECT * FROM r5events WHERE evt_cost < 10"
        );
    }

    #[test]
    fn test_sample_wraps_query() {
        let builder = EnvelopeBuilder::default();
        let statement = builder.statement(&request(true, "SELECT a FROM t WHERE a < 3"));
        assert_eq!(
            statement,
            "SELECT * FROM (SELECT a FROM t WHERE a &lt; 3) WHERE ROWNUM &lt;= 50"
        );
    }

    #[test]
    fn test_no_sample_passes_query_through() {
        let builder = EnvelopeBuilder::default();
        assert_eq!(builder.statement(&request(false, "SELECT 1")), "SELECT 1");
    }

    #[test]
    fn test_custom_headers_and_sample_rows() {
        let xml = EnvelopeBuilder::new()
            .organization("NORTH")
            .session_scenario("keep")
            .sample_rows(10)
            .build(&request(true, "SELECT 1"));
        assert_eq!(element_texts(&xml, "Organization"), vec!["NORTH"]);
        assert_eq!(element_texts(&xml, "SessionScenario"), vec!["keep"]);
        assert!(xml.contains("WHERE ROWNUM &lt;= 10"));
    }
}
