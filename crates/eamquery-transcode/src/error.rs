//! Error types for the transcoder.

use thiserror::Error;

/// Errors that end a transcode pass.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The upstream body is not well-formed XML.
    #[error("malformed XML in upstream response: {0}")]
    MalformedXml(#[from] quick_xml::Error),

    /// The metadata section does not match the expected shape.
    #[error("malformed metadata in upstream response: {0}")]
    MalformedMetadata(String),

    /// The upstream reported an application-level error in `faultstring`.
    #[error("{0}")]
    ApplicationFault(String),

    /// The projection was fed after it had already seen a fault.
    #[error("transcoder already terminated by a fault")]
    Terminated,

    /// Writing rendered output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::events::attributes::AttrError> for TranscodeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedXml(err.into())
    }
}

impl TranscodeError {
    /// Whether the error was reported by the upstream application itself
    /// rather than detected while decoding its response.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::ApplicationFault(_))
    }
}
