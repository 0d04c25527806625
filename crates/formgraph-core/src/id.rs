#![forbid(unsafe_code)]

//! Stable control identifiers.
//!
//! A [`ControlId`] names one control for the lifetime of an application
//! graph. Views carry the id of the control that produced them, and
//! incoming views are routed back to their control by it, so an id must
//! survive serialization unchanged.
//!
//! Ids are cheap to clone (`Arc<str>`), compare by string content, and
//! serialize as a bare JSON string.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a control.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(Arc<str>);

impl ControlId {
    /// Create an id from an explicit string.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Generate a fresh, globally unique id.
    ///
    /// ULIDs sort by creation time, which keeps generated ids readable in
    /// logs ordered the same way controls were declared.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(ulid::Ulid::new().to_string().to_lowercase())
    }

    /// Borrow the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlId({:?})", &*self.0)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ControlId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ControlId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ControlId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&ControlId> for ControlId {
    fn from(id: &ControlId) -> Self {
        id.clone()
    }
}

impl Serialize for ControlId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ControlId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
