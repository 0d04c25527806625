#![forbid(unsafe_code)]

//! Uploaded file descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::Map;

time::serde::format_description!(created_date_format, Date, "[year]-[month]-[day]");

/// Metadata of one uploaded file.
///
/// Content is not held here; a resolver turns `id` plus `created_date`
/// into a byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upload {
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub length: u64,
    /// Packed as `YYYY-MM-DD`.
    #[serde(with = "created_date_format")]
    pub created_date: Date,
}

impl Upload {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        length: u64,
        created_date: Date,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            length,
            created_date,
        }
    }

    /// Pack into the same record the serde form produces.
    #[must_use]
    pub fn pack(&self) -> Map {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("file_name".into(), Value::String(self.file_name.clone()));
        map.insert("length".into(), Value::from(self.length));
        map.insert(
            "created_date".into(),
            Value::String(format_day(self.created_date)),
        );
        map
    }
}

fn format_day(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
