#![forbid(unsafe_code)]

use formgraph_core::Source;
use formgraph_view::{InputView, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// Free-text field.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub text: Option<Source<String>>,
    pub placeholder: Option<String>,
    /// Render as a multi-line editor.
    pub long: bool,
}

impl Input {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(Source::Static(text.into())),
            ..Self::default()
        }
    }

    /// Text computed on every read.
    #[must_use]
    pub fn dynamic(producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            text: Some(Source::dynamic(producer)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_long(mut self, long: bool) -> Self {
        self.long = long;
        self
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.text.as_ref().map(Source::get)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(Source::Static(text.into()));
    }
}

impl ControlState for Input {
    fn view_type(&self) -> ViewType {
        ViewType::Input
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Input(InputView {
            text: self.text(),
            placeholder: self.placeholder.clone(),
            long: self.long,
        })
    }

    fn apply(&mut self, view: &ViewKind) {
        let ViewKind::Input(view) = view else { return };
        self.set_text(view.text.clone().unwrap_or_default());
    }

    fn value(&self) -> ControlValue {
        self.text().map_or(ControlValue::None, ControlValue::Text)
    }
}
