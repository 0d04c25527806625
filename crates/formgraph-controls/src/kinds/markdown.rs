#![forbid(unsafe_code)]

use formgraph_core::Source;
use formgraph_view::{Markdown as MarkdownText, OutputView, Payload, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// Output that renders its text as markdown.
///
/// Handlers write plain text; the text is wrapped into a markdown payload
/// when the control settles. Producer-backed text is wrapped on every read.
#[derive(Debug, Clone, Default)]
pub struct Markdown {
    pub text: Option<Source<String>>,
    rendered: Option<MarkdownText>,
}

impl Markdown {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            rendered: Some(MarkdownText::new(text.clone())),
            text: Some(Source::Static(text)),
        }
    }

    #[must_use]
    pub fn dynamic(producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            text: Some(Source::dynamic(producer)),
            rendered: None,
        }
    }

    /// Replace the text. Takes effect in the view once the control settles.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(Source::Static(text.into()));
    }

    #[must_use]
    pub fn data(&self) -> Option<MarkdownText> {
        match &self.text {
            Some(Source::Dynamic(producer)) => Some(MarkdownText::new(producer())),
            _ => self.rendered.clone(),
        }
    }
}

impl ControlState for Markdown {
    fn view_type(&self) -> ViewType {
        ViewType::Output
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Output(OutputView {
            data: self.data().map(Payload::Markdown),
        })
    }

    fn apply(&mut self, _view: &ViewKind) {}

    fn value(&self) -> ControlValue {
        self.data()
            .map_or(ControlValue::None, |md| ControlValue::Payload(Payload::Markdown(md)))
    }

    fn check_after_update(&mut self) {
        if let Some(Source::Static(text)) = &self.text {
            self.rendered = Some(MarkdownText::new(text.clone()));
        }
    }
}
