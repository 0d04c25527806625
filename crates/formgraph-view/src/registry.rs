#![forbid(unsafe_code)]

//! Dispatch from packed maps back to concrete views.
//!
//! # Defaults for absent keys
//!
//! | Key | Absent or `null` |
//! |-----|------------------|
//! | `enabled` | `true` |
//! | `visible` | `true` (only an explicit `false` hides) |
//! | `optional`, `require_apply`, `multiple`, `long`, `selected` (checkbox) | `false` |
//! | `label`, `container`, `colspan`, `rowspan`, `placeholder`, `data` | `None` |
//! | `depends`, `titles`, `uploads`, slider `data` | empty |
//! | select `selected` | `None` (single) or `[]` (multiple) |
//! | slider `selected` | `0` |
//!
//! # Failure Modes
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`ViewError::UnsupportedView`] | `type` missing or not a known discriminator |
//! | [`ViewError::MissingField`] | `id` absent |
//! | [`ViewError::InvalidField`] | a present key has the wrong JSON shape |

use std::fmt;

use formgraph_core::ControlId;
use serde_json::Value;

use crate::Map;
use crate::payload::Payload;
use crate::upload::Upload;
use crate::view::{
    CheckboxView, InputView, Layout, OutputView, SelectView, Selection, SliderView, UploaderView,
    View, ViewKind,
};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Wire discriminator stored under the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    Input,
    Checkbox,
    Select,
    Slider,
    Uploader,
    Output,
    Apply,
}

impl ViewType {
    pub const ALL: [ViewType; 7] = [
        Self::Input,
        Self::Checkbox,
        Self::Select,
        Self::Slider,
        Self::Uploader,
        Self::Output,
        Self::Apply,
    ];

    /// The `type` string.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Input => "InputView",
            Self::Checkbox => "CheckboxView",
            Self::Select => "SelectView",
            Self::Slider => "SliderView",
            Self::Uploader => "UploaderView",
            Self::Output => "OutputView",
            Self::Apply => "ApplyView",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while unpacking a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Unknown or missing `type`. Holds the offending discriminator.
    UnsupportedView(String),
    /// A required key is absent.
    MissingField {
        view: &'static str,
        field: &'static str,
    },
    /// A key is present with the wrong shape.
    InvalidField {
        view: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedView(tag) => write!(f, "unsupported view: {tag}"),
            Self::MissingField { view, field } => write!(f, "{view}: missing field `{field}`"),
            Self::InvalidField {
                view,
                field,
                reason,
            } => write!(f, "{view}: invalid field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ViewError {}

// ---------------------------------------------------------------------------
// Field reader
// ---------------------------------------------------------------------------

struct Fields<'a> {
    view: &'static str,
    map: &'a Map,
}

impl<'a> Fields<'a> {
    /// Present and non-null.
    fn get(&self, field: &'static str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> ViewError {
        ViewError::InvalidField {
            view: self.view,
            field,
            reason: reason.into(),
        }
    }

    fn string(&self, field: &'static str) -> Result<Option<String>, ViewError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(field, "expected a string")),
        }
    }

    fn flag(&self, field: &'static str, default: bool) -> Result<bool, ViewError> {
        match self.get(field) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(field, "expected a boolean")),
        }
    }

    fn int(&self, field: &'static str) -> Result<Option<i64>, ViewError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "expected an integer")),
        }
    }

    fn span(&self, field: &'static str) -> Result<Option<u32>, ViewError> {
        self.int(field)?
            .map(|n| u32::try_from(n).map_err(|_| self.invalid(field, "out of range")))
            .transpose()
    }

    fn array(&self, field: &'static str) -> Result<&'a [Value], ViewError> {
        match self.get(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.invalid(field, "expected an array")),
        }
    }

    fn strings(&self, field: &'static str) -> Result<Vec<String>, ViewError> {
        self.array(field)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.invalid(field, "expected an array of strings"))
            })
            .collect()
    }

    fn index(&self, field: &'static str, value: &Value) -> Result<Option<usize>, ViewError> {
        let n = value
            .as_i64()
            .ok_or_else(|| self.invalid(field, "expected an integer index"))?;
        Ok(usize::try_from(n).ok())
    }
}

// ---------------------------------------------------------------------------
// Unpacking
// ---------------------------------------------------------------------------

/// Reconstruct a view from its packed map.
pub fn unpack(map: &Map) -> Result<View, ViewError> {
    let view_type = match map.get("type") {
        Some(Value::String(tag)) => {
            ViewType::from_tag(tag).ok_or_else(|| ViewError::UnsupportedView(tag.clone()))?
        }
        Some(other) => return Err(ViewError::UnsupportedView(other.to_string())),
        None => return Err(ViewError::UnsupportedView(Value::Object(map.clone()).to_string())),
    };
    let fields = Fields {
        view: view_type.tag(),
        map,
    };

    let id = fields.string("id")?.ok_or(ViewError::MissingField {
        view: view_type.tag(),
        field: "id",
    })?;
    let depends = fields
        .strings("depends")?
        .into_iter()
        .map(ControlId::from)
        .collect();

    let kind = match view_type {
        ViewType::Input => ViewKind::Input(InputView {
            text: fields.string("data")?,
            placeholder: fields.string("placeholder")?,
            long: fields.flag("long", false)?,
        }),
        ViewType::Checkbox => ViewKind::Checkbox(CheckboxView {
            selected: fields.flag("selected", false)?,
        }),
        ViewType::Select => ViewKind::Select(unpack_select(&fields)?),
        ViewType::Slider => ViewKind::Slider(SliderView {
            values: fields
                .array("data")?
                .iter()
                .map(|v| {
                    v.as_f64()
                        .ok_or_else(|| fields.invalid("data", "expected an array of numbers"))
                })
                .collect::<Result<_, _>>()?,
            selected: fields.int("selected")?.unwrap_or(0),
        }),
        ViewType::Uploader => ViewKind::Uploader(UploaderView {
            uploads: fields
                .array("uploads")?
                .iter()
                .map(|v| {
                    serde_json::from_value::<Upload>(v.clone())
                        .map_err(|e| fields.invalid("uploads", e.to_string()))
                })
                .collect::<Result<_, _>>()?,
            multiple: fields.flag("multiple", false)?,
        }),
        ViewType::Output => ViewKind::Output(OutputView {
            data: fields.get("data").cloned().map(Payload::from_wire),
        }),
        ViewType::Apply => ViewKind::Apply,
    };

    Ok(View {
        id: ControlId::from(id),
        enabled: fields.flag("enabled", true)?,
        label: fields.string("label")?,
        optional: fields.flag("optional", false)?,
        layout: Layout {
            container: fields.string("container")?,
            visible: fields.flag("visible", true)?,
            colspan: fields.span("colspan")?,
            rowspan: fields.span("rowspan")?,
        },
        depends,
        require_apply: fields.flag("require_apply", false)?,
        kind,
    })
}

fn unpack_select(fields: &Fields<'_>) -> Result<SelectView, ViewError> {
    let selected = fields.get("selected");
    let selection = if fields.flag("multiple", false)? {
        // A bare index from an older client is promoted to a one-element list.
        let indices = match selected {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| fields.index("selected", v))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect(),
            Some(v) => fields.index("selected", v)?.into_iter().collect(),
        };
        Selection::Multiple(indices)
    } else {
        match selected {
            None => Selection::Single(None),
            Some(v) => Selection::Single(fields.index("selected", v)?),
        }
    };
    Ok(SelectView {
        titles: fields.strings("titles")?,
        selection,
        placeholder: fields.string("placeholder")?,
    })
}

/// Unpack a list of packed views, failing on the first bad entry.
pub fn unpack_all<'a>(maps: impl IntoIterator<Item = &'a Map>) -> Result<Vec<View>, ViewError> {
    maps.into_iter().map(unpack).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn tags_round_trip() {
        for t in ViewType::ALL {
            assert_eq!(ViewType::from_tag(t.tag()), Some(t));
        }
        assert_eq!(ViewType::from_tag("TableView"), None);
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = unpack(&map(json!({"id": "x", "type": "TableView"}))).unwrap_err();
        assert_eq!(err, ViewError::UnsupportedView("TableView".into()));
        assert_eq!(err.to_string(), "unsupported view: TableView");
    }

    #[test]
    fn missing_type_is_unsupported() {
        let err = unpack(&map(json!({"id": "x"}))).unwrap_err();
        assert!(matches!(err, ViewError::UnsupportedView(_)));
    }

    #[test]
    fn missing_id_is_reported() {
        let err = unpack(&map(json!({"type": "CheckboxView"}))).unwrap_err();
        assert_eq!(
            err,
            ViewError::MissingField {
                view: "CheckboxView",
                field: "id"
            }
        );
    }

    #[test]
    fn absent_keys_take_defaults() {
        let view = unpack(&map(json!({"id": "a", "type": "InputView"}))).unwrap();
        assert!(view.enabled);
        assert!(view.layout.visible);
        assert!(!view.optional);
        assert!(!view.require_apply);
        assert!(view.depends.is_empty());
        assert_eq!(view.as_input().unwrap(), &InputView::default());
    }

    #[test]
    fn only_explicit_false_hides() {
        let hidden = unpack(&map(json!({"id": "a", "type": "ApplyView", "visible": false}))).unwrap();
        assert!(!hidden.layout.visible);
        let shown = unpack(&map(json!({"id": "a", "type": "ApplyView", "visible": null}))).unwrap();
        assert!(shown.layout.visible);
    }

    #[test]
    fn multiple_select_promotes_bare_index() {
        let view = unpack(&map(json!({
            "id": "s", "type": "SelectView", "titles": ["a", "b"], "multiple": true, "selected": 1
        })))
        .unwrap();
        assert_eq!(view.as_select().unwrap().selection, Selection::Multiple(vec![1]));

        let view = unpack(&map(json!({
            "id": "s", "type": "SelectView", "titles": [], "multiple": true
        })))
        .unwrap();
        assert_eq!(view.as_select().unwrap().selection, Selection::Multiple(vec![]));
    }

    #[test]
    fn single_select_without_selection() {
        let view = unpack(&map(json!({"id": "s", "type": "SelectView", "titles": ["a"]}))).unwrap();
        assert_eq!(view.as_select().unwrap().selection, Selection::Single(None));
    }

    #[test]
    fn wrong_shapes_are_invalid() {
        let err = unpack(&map(json!({"id": "c", "type": "CheckboxView", "selected": "yes"})))
            .unwrap_err();
        assert!(matches!(err, ViewError::InvalidField { field: "selected", .. }));

        let err = unpack(&map(json!({"id": "u", "type": "UploaderView", "uploads": [{"id": 1}]})))
            .unwrap_err();
        assert!(matches!(err, ViewError::InvalidField { field: "uploads", .. }));
    }
}
