#![forbid(unsafe_code)]

use formgraph_view::{SliderView, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// Sentinel selection of a slider without values.
pub const NO_SELECTION: i64 = -1;

/// Pick one of a list of numbers.
///
/// Only finite numbers are kept: NaN and infinities have no wire form.
#[derive(Debug, Clone, Default)]
pub struct Slider {
    pub values: Vec<f64>,
    pub selected: i64,
}

impl Slider {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().filter(|v| v.is_finite()).collect(),
            selected: 0,
        }
    }

    #[must_use]
    pub fn with_selected(mut self, selected: i64) -> Self {
        self.selected = selected;
        self
    }

    /// Number under the cursor, if the cursor is in range.
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        usize::try_from(self.selected)
            .ok()
            .and_then(|i| self.values.get(i))
            .copied()
    }
}

impl ControlState for Slider {
    fn view_type(&self) -> ViewType {
        ViewType::Slider
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Slider(SliderView {
            values: self.values.clone(),
            selected: self.selected,
        })
    }

    fn apply(&mut self, view: &ViewKind) {
        if let ViewKind::Slider(view) = view {
            self.selected = view.selected;
        }
    }

    fn value(&self) -> ControlValue {
        self.current().map_or(ControlValue::None, ControlValue::Number)
    }

    fn check_after_update(&mut self) {
        self.values.retain(|v| v.is_finite());
        if self.values.is_empty() {
            self.selected = NO_SELECTION;
        } else if self.current().is_none() {
            self.selected = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_dropped() {
        let slider = Slider::new([1.0, f64::NAN, 2.5, f64::INFINITY, f64::NEG_INFINITY]);
        assert_eq!(slider.values, vec![1.0, 2.5]);
    }

    #[test]
    fn handler_written_non_finite_values_are_dropped_on_settle() {
        let mut slider = Slider::new([1.0, 2.0]).with_selected(1);
        slider.values = vec![f64::NAN, 4.0];
        slider.selected = 1;
        slider.check_after_update();
        assert_eq!(slider.values, vec![4.0]);
        assert_eq!(slider.selected, 0);
        assert_eq!(slider.current(), Some(4.0));
    }

    #[test]
    fn empty_values_use_sentinel() {
        let mut slider = Slider::new([]).with_selected(2);
        slider.check_after_update();
        assert_eq!(slider.selected, NO_SELECTION);
        assert!(slider.value().is_none());
    }

    #[test]
    fn out_of_range_resets_to_first() {
        let mut slider = Slider::new([1.0, 2.0]).with_selected(5);
        slider.check_after_update();
        assert_eq!(slider.selected, 0);
        assert_eq!(slider.value(), ControlValue::Number(1.0));
    }

    #[test]
    fn sentinel_recovers_when_values_return() {
        let mut slider = Slider::new([]);
        slider.check_after_update();
        slider.values = vec![0.5];
        slider.check_after_update();
        assert_eq!(slider.selected, 0);
    }
}
