#![forbid(unsafe_code)]

use formgraph_core::Source;
use formgraph_view::{OutputView, Payload, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// Read-only data display, usually filled by a handler.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub data: Option<Source<Payload>>,
}

impl Output {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: impl Into<Payload>) -> Self {
        Self {
            data: Some(Source::Static(data.into())),
        }
    }

    #[must_use]
    pub fn dynamic(producer: impl Fn() -> Payload + Send + Sync + 'static) -> Self {
        Self {
            data: Some(Source::dynamic(producer)),
        }
    }

    pub fn set_data(&mut self, data: impl Into<Payload>) {
        self.data = Some(Source::Static(data.into()));
    }

    #[must_use]
    pub fn data(&self) -> Option<Payload> {
        self.data.as_ref().map(Source::get)
    }
}

impl ControlState for Output {
    fn view_type(&self) -> ViewType {
        ViewType::Output
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Output(OutputView { data: self.data() })
    }

    /// Outputs have no client-editable state.
    fn apply(&mut self, _view: &ViewKind) {}

    fn value(&self) -> ControlValue {
        self.data().map_or(ControlValue::None, ControlValue::Payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn producer_runs_on_read() {
        let output = Output::dynamic(|| Payload::Value(json!(30)));
        assert_eq!(output.value(), ControlValue::Payload(Payload::Value(json!(30))));
    }

    #[test]
    fn apply_is_ignored() {
        let mut output = Output::with_data(json!("kept"));
        output.apply(&ViewKind::Output(OutputView { data: None }));
        assert_eq!(output.data(), Some(Payload::Value(json!("kept"))));
    }
}
