#![forbid(unsafe_code)]

//! Output payloads.
//!
//! Output controls hold arbitrary data. Three shapes are distinguished on
//! the wire:
//!
//! | Variant | Packed form |
//! |---------|-------------|
//! | [`Payload::Value`] | the raw JSON value |
//! | [`Payload::Markdown`] | `{"markdown": text}` |
//! | [`Payload::Encoded`] | `{"application", "content_type", "data"}` (base64 data) |
//!
//! Unpacking recognizes the two object shapes by their exact key sets and
//! treats anything else as a raw value.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::Map;

/// Markdown text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markdown {
    pub text: String,
}

impl Markdown {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for Markdown {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Markdown {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Output that has been run through an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    /// Renderer hint (`"markdown"`, `"plotly"`, ...). `None` for plain data.
    pub application: Option<String>,
    pub content_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

impl EncodedOutput {
    /// Encode raw bytes.
    #[must_use]
    pub fn from_bytes(
        application: Option<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            application,
            content_type: content_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Decode the base64 body.
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

/// Data shown by an output control.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(Value),
    Markdown(Markdown),
    Encoded(EncodedOutput),
}

const MARKDOWN_KEY: &str = "markdown";

impl Payload {
    /// Packed wire form.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Markdown(md) => {
                let mut map = Map::new();
                map.insert(MARKDOWN_KEY.into(), Value::String(md.text.clone()));
                Value::Object(map)
            }
            Self::Encoded(encoded) => {
                let mut map = Map::new();
                map.insert(
                    "application".into(),
                    encoded
                        .application
                        .clone()
                        .map_or(Value::Null, Value::String),
                );
                map.insert(
                    "content_type".into(),
                    Value::String(encoded.content_type.clone()),
                );
                map.insert("data".into(), Value::String(encoded.data.clone()));
                Value::Object(map)
            }
        }
    }

    /// Inverse of [`to_wire`](Self::to_wire).
    #[must_use]
    pub fn from_wire(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Value(value);
        };
        if map.len() == 1
            && let Some(Value::String(text)) = map.get(MARKDOWN_KEY)
        {
            return Self::Markdown(Markdown::new(text.clone()));
        }
        if map.len() == 3
            && let (Some(app), Some(Value::String(content_type)), Some(Value::String(data))) =
                (map.get("application"), map.get("content_type"), map.get("data"))
        {
            let application = match app {
                Value::String(s) => Some(Some(s.clone())),
                Value::Null => Some(None),
                _ => None,
            };
            if let Some(application) = application {
                return Self::Encoded(EncodedOutput {
                    application,
                    content_type: content_type.clone(),
                    data: data.clone(),
                });
            }
        }
        Self::Value(Value::Object(map))
    }

    #[must_use]
    pub fn as_markdown(&self) -> Option<&Markdown> {
        match self {
            Self::Markdown(md) => Some(md),
            _ => None,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Markdown> for Payload {
    fn from(md: Markdown) -> Self {
        Self::Markdown(md)
    }
}

impl From<EncodedOutput> for Payload {
    fn from(encoded: EncodedOutput) -> Self {
        Self::Encoded(encoded)
    }
}
