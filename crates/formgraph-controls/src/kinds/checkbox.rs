#![forbid(unsafe_code)]

use formgraph_core::Source;
use formgraph_view::{CheckboxView, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// Boolean toggle.
#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    pub selected: Source<bool>,
}

impl Checkbox {
    #[must_use]
    pub fn new(selected: bool) -> Self {
        Self {
            selected: Source::Static(selected),
        }
    }

    #[must_use]
    pub fn dynamic(producer: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            selected: Source::dynamic(producer),
        }
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected.set(selected);
    }
}

impl ControlState for Checkbox {
    fn view_type(&self) -> ViewType {
        ViewType::Checkbox
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Checkbox(CheckboxView {
            selected: self.is_selected(),
        })
    }

    fn apply(&mut self, view: &ViewKind) {
        if let ViewKind::Checkbox(view) = view {
            self.set_selected(view.selected);
        }
    }

    fn value(&self) -> ControlValue {
        ControlValue::Bool(self.is_selected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unselected() {
        assert_eq!(Checkbox::default().value(), ControlValue::Bool(false));
    }

    #[test]
    fn producer_is_read_on_view() {
        let checkbox = Checkbox::dynamic(|| true);
        assert_eq!(
            checkbox.view_kind(),
            ViewKind::Checkbox(CheckboxView { selected: true })
        );
    }

    #[test]
    fn apply_replaces_producer() {
        let mut checkbox = Checkbox::dynamic(|| true);
        checkbox.apply(&ViewKind::Checkbox(CheckboxView { selected: false }));
        assert!(!checkbox.is_selected());
        assert!(!checkbox.selected.is_dynamic());
    }
}
