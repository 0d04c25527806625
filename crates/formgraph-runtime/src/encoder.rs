#![forbid(unsafe_code)]

//! Output encoding.
//!
//! When a pass finishes on an apply, each output's [`Payload`] is turned
//! into an [`EncodedOutput`]: a renderer hint, a MIME type, and base64
//! bytes. Applications plug in their own [`OutputEncoder`] to handle data
//! the default one does not understand.

use std::fmt;

use formgraph_view::{EncodedOutput, Map, Payload};

/// Content type of JSON-encoded plain values.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type of markdown text.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";
/// Renderer hint for markdown.
pub const MARKDOWN_APPLICATION: &str = "markdown";

/// An output payload could not be encoded.
#[derive(Debug)]
pub enum EncodeError {
    /// No encoder accepts this payload.
    Unsupported { description: String },
    Json(serde_json::Error),
    Other(formgraph_core::HandlerError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { description } => {
                write!(f, "no encoder for output {description}")
            }
            Self::Json(err) => write!(f, "output is not serializable: {err}"),
            Self::Other(err) => write!(f, "output encoding failed: {err}"),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported { .. } => None,
            Self::Json(err) => Some(err),
            Self::Other(err) => Some(err.as_ref()),
        }
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Turns output payloads into their transport form.
pub trait OutputEncoder: Send + Sync {
    /// Encode `payload`.
    ///
    /// `description` names the output (usually its label) for error
    /// messages; `params` carries encoder-specific options.
    fn encode(
        &self,
        payload: &Payload,
        description: Option<&str>,
        params: &Map,
    ) -> Result<EncodedOutput, EncodeError>;
}

/// Encoder for the payload shapes the core knows about.
///
/// - [`Payload::Value`]: compact JSON, `application/json`, no renderer hint.
/// - [`Payload::Markdown`]: UTF-8 text, `text/markdown`, hint `markdown`.
/// - [`Payload::Encoded`]: passed through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEncoder;

impl OutputEncoder for DefaultEncoder {
    fn encode(
        &self,
        payload: &Payload,
        _description: Option<&str>,
        _params: &Map,
    ) -> Result<EncodedOutput, EncodeError> {
        Ok(match payload {
            Payload::Value(value) => {
                EncodedOutput::from_bytes(None, JSON_CONTENT_TYPE, &serde_json::to_vec(value)?)
            }
            Payload::Markdown(md) => EncodedOutput::from_bytes(
                Some(MARKDOWN_APPLICATION.to_owned()),
                MARKDOWN_CONTENT_TYPE,
                md.text.as_bytes(),
            ),
            Payload::Encoded(encoded) => encoded.clone(),
        })
    }
}
