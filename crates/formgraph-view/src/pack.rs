#![forbid(unsafe_code)]

//! Packing views into ordered maps.
//!
//! Key order is fixed: `id`, `type`, `enabled`, `label`, `optional`, then
//! the presentation keys, then the kind payload. Optional presentation keys
//! (`visible`, `container`, `depends`, `require_apply`, `colspan`,
//! `rowspan`) and optional kind keys appear only when they differ from the
//! default that [`unpack`](crate::unpack) would fill in.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::Map;
use crate::view::{Selection, View, ViewKind};

/// Pack one view.
#[must_use]
pub fn pack(view: &View) -> Map {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(view.id.to_string()));
    map.insert("type".into(), Value::String(view.view_type().tag().into()));
    map.insert("enabled".into(), Value::Bool(view.enabled));
    if let Some(label) = &view.label {
        map.insert("label".into(), Value::String(label.clone()));
    }
    map.insert("optional".into(), Value::Bool(view.optional));

    let layout = &view.layout;
    if !layout.visible {
        map.insert("visible".into(), Value::Bool(false));
    }
    if let Some(container) = &layout.container {
        map.insert("container".into(), Value::String(container.clone()));
    }
    if !view.depends.is_empty() {
        map.insert(
            "depends".into(),
            Value::Array(
                view.depends
                    .iter()
                    .map(|id| Value::String(id.to_string()))
                    .collect(),
            ),
        );
    }
    if view.require_apply {
        map.insert("require_apply".into(), Value::Bool(true));
    }
    if let Some(colspan) = layout.colspan {
        map.insert("colspan".into(), Value::from(colspan));
    }
    if let Some(rowspan) = layout.rowspan {
        map.insert("rowspan".into(), Value::from(rowspan));
    }

    pack_kind(&view.kind, &mut map);
    map
}

fn pack_kind(kind: &ViewKind, map: &mut Map) {
    match kind {
        ViewKind::Input(input) => {
            if let Some(text) = &input.text {
                map.insert("data".into(), Value::String(text.clone()));
            }
            if let Some(placeholder) = &input.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            if input.long {
                map.insert("long".into(), Value::Bool(true));
            }
        }
        ViewKind::Checkbox(checkbox) => {
            map.insert("selected".into(), Value::Bool(checkbox.selected));
        }
        ViewKind::Select(select) => {
            map.insert(
                "titles".into(),
                Value::Array(select.titles.iter().cloned().map(Value::String).collect()),
            );
            match &select.selection {
                Selection::Single(Some(index)) => {
                    map.insert("selected".into(), Value::from(*index));
                }
                Selection::Single(None) => {}
                Selection::Multiple(indices) => {
                    map.insert(
                        "selected".into(),
                        Value::Array(indices.iter().map(|&i| Value::from(i)).collect()),
                    );
                    map.insert("multiple".into(), Value::Bool(true));
                }
            }
            if let Some(placeholder) = &select.placeholder {
                map.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
        }
        ViewKind::Slider(slider) => {
            map.insert(
                "data".into(),
                Value::Array(slider.values.iter().map(|&v| Value::from(v)).collect()),
            );
            map.insert("selected".into(), Value::from(slider.selected));
        }
        ViewKind::Uploader(uploader) => {
            map.insert(
                "uploads".into(),
                Value::Array(
                    uploader
                        .uploads
                        .iter()
                        .map(|u| Value::Object(u.pack()))
                        .collect(),
                ),
            );
            if uploader.multiple {
                map.insert("multiple".into(), Value::Bool(true));
            }
        }
        ViewKind::Output(output) => {
            if let Some(data) = &output.data {
                map.insert("data".into(), data.to_wire());
            }
        }
        ViewKind::Apply => {}
    }
}

/// Pack a list of views in order.
#[must_use]
pub fn pack_all<'a>(views: impl IntoIterator<Item = &'a View>) -> Vec<Map> {
    views.into_iter().map(pack).collect()
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        pack(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        crate::unpack(&map).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Markdown, Payload};
    use crate::upload::Upload;
    use crate::view::{CheckboxView, InputView, OutputView, SelectView, SliderView, UploaderView};
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn defaults_are_omitted() {
        let view = View::new("a", InputView::default());
        assert_eq!(
            Value::Object(pack(&view)),
            json!({"id": "a", "type": "InputView", "enabled": true, "optional": false})
        );
    }

    #[test]
    fn key_order_is_stable() {
        let mut view = View::new("a", CheckboxView { selected: true }).with_label("Agree");
        view.require_apply = true;
        view.depends = vec!["b".into()];
        let keys: Vec<_> = pack(&view).keys().cloned().collect();
        assert_eq!(
            keys,
            [
                "id",
                "type",
                "enabled",
                "label",
                "optional",
                "depends",
                "require_apply",
                "selected"
            ]
        );
    }

    #[test]
    fn multiple_select_packs_list_and_flag() {
        let view = View::new(
            "s",
            SelectView {
                titles: vec!["a".into(), "b".into()],
                selection: Selection::Multiple(vec![0, 1]),
                placeholder: None,
            },
        );
        let packed = Value::Object(pack(&view));
        assert_eq!(packed["selected"], json!([0, 1]));
        assert_eq!(packed["multiple"], json!(true));
    }

    #[test]
    fn single_select_without_selection_omits_key() {
        let view = View::new(
            "s",
            SelectView {
                titles: vec![],
                selection: Selection::Single(None),
                placeholder: None,
            },
        );
        let packed = pack(&view);
        assert!(!packed.contains_key("selected"));
        assert!(!packed.contains_key("multiple"));
    }

    #[test]
    fn slider_packs_values_as_data() {
        let view = View::new(
            "sl",
            SliderView {
                values: vec![0.5, 1.0],
                selected: 1,
            },
        );
        let packed = Value::Object(pack(&view));
        assert_eq!(packed["data"], json!([0.5, 1.0]));
        assert_eq!(packed["selected"], json!(1));
    }

    #[test]
    fn uploader_packs_upload_records() {
        let view = View::new(
            "u",
            UploaderView {
                uploads: vec![Upload::new("f", "a.txt", 3, date!(2020 - 01 - 02))],
                multiple: false,
            },
        );
        let packed = Value::Object(pack(&view));
        assert_eq!(
            packed["uploads"],
            json!([{"id": "f", "file_name": "a.txt", "length": 3, "created_date": "2020-01-02"}])
        );
        assert!(packed.get("multiple").is_none());
    }

    #[test]
    fn serde_goes_through_pack() {
        let view = View::new(
            "o",
            OutputView {
                data: Some(Payload::Markdown(Markdown::new("# Title"))),
            },
        );
        let text = serde_json::to_string(&view).unwrap();
        assert_eq!(
            text,
            r##"{"id":"o","type":"OutputView","enabled":true,"optional":false,"data":{"markdown":"# Title"}}"##
        );
        let back: View = serde_json::from_str(&text).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn deserialize_reports_unsupported_view() {
        let err = serde_json::from_str::<View>(r#"{"id":"x","type":"Nope"}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported view"));
    }
}
