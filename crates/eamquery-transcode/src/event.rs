//! Event types flowing through the transcoder.

/// A structural XML token.
///
/// Element names are local names; namespace prefixes are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// An opening tag. Self-closing elements produce a start and an end.
    ElementStart {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Unescaped character data between tags.
    CharacterData(String),
    /// A closing tag.
    ElementEnd { name: String },
}

impl XmlEvent {
    /// Shorthand for an element start without attributes.
    pub fn start(name: impl Into<String>) -> Self {
        Self::ElementStart {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Shorthand for an element start with attributes.
    pub fn start_with(name: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Self::ElementStart {
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::CharacterData(text.into())
    }

    pub fn end(name: impl Into<String>) -> Self {
        Self::ElementEnd { name: name.into() }
    }
}

/// Output-agnostic projection of the upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A column label from the metadata section.
    ColumnHeader(String),
    /// A data row begins.
    RowStart,
    /// One cell value of the current row.
    Cell(String),
    /// The current data row ends.
    RowEnd,
    /// The upstream reported an error. Always the last event of a pass.
    Fault(String),
}
