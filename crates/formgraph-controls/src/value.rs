#![forbid(unsafe_code)]

//! Semantic control values.
//!
//! A [`ControlValue`] is what handlers read from their parents: the
//! resolved element of a select rather than its index, the number under a
//! slider's cursor rather than its position.

use std::hash::{Hash, Hasher};

use formgraph_view::{Payload, Upload};
use rustc_hash::FxHasher;
use serde_json::Value;

/// Current value of a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// No value (empty input, unselected single select, empty output).
    None,
    Text(String),
    Bool(bool),
    /// Selected element of a single select.
    Item(Value),
    /// Selected elements of a multiple select, in selection order.
    Items(Vec<Value>),
    /// Value under a slider's cursor.
    Number(f64),
    Uploads(Vec<Upload>),
    /// Output or markdown data.
    Payload(Payload),
}

impl ControlValue {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_item(&self) -> Option<&Value> {
        match self {
            Self::Item(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Items(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uploads(&self) -> Option<&[Upload]> {
        match self {
            Self::Uploads(u) => Some(u),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_payload(&self) -> Option<&Payload> {
        match self {
            Self::Payload(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            Self::Payload(p) => Some(p),
            _ => None,
        }
    }

    /// JSON rendering of the value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Item(v) => v.clone(),
            Self::Items(v) => Value::Array(v.clone()),
            Self::Number(n) => Value::from(*n),
            Self::Uploads(u) => serde_json::to_value(u).unwrap_or(Value::Null),
            Self::Payload(p) => p.to_wire(),
        }
    }

    /// Stable 64-bit digest, usable as a memoization key.
    ///
    /// Equal values digest equally. The variant participates, so
    /// `Text("1")` and `Item("1")` differ.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        std::mem::discriminant(self).hash(&mut hasher);
        self.to_json().to_string().hash(&mut hasher);
        hasher.finish()
    }
}

impl From<&str> for ControlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ControlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
