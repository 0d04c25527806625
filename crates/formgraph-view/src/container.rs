#![forbid(unsafe_code)]

//! Layout containers.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::Map;

/// A named region controls can be placed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    /// Layout name understood by the client (e.g. `"grid"`).
    pub layout: Option<String>,
    pub columns: Option<u32>,
}

impl Container {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layout: None,
            columns: None,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = Some(columns);
        self
    }

    /// `{id, layout, columns?}`; `columns` only when set and non-zero.
    #[must_use]
    pub fn pack(&self) -> Map {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert(
            "layout".into(),
            self.layout.clone().map_or(Value::Null, Value::String),
        );
        if let Some(columns) = self.columns.filter(|&c| c > 0) {
            map.insert("columns".into(), Value::from(columns));
        }
        map
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pack().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_columns_are_omitted() {
        let c = Container::new("main").with_layout("grid").with_columns(0);
        assert_eq!(
            Value::Object(c.pack()),
            json!({"id": "main", "layout": "grid"})
        );
    }

    #[test]
    fn columns_are_packed_when_set() {
        let c = Container::new("side").with_columns(2);
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"id": "side", "layout": null, "columns": 2})
        );
    }
}
