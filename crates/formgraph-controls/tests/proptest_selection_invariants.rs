//! Property tests for post-update repair of select and slider state.
//!
//! # Invariants
//!
//! 1. **Single select in range**: after settling, a single selection is
//!    `None` or a valid index; `None` only when there are no items or
//!    nothing was selected.
//! 2. **Multiple select filtering**: after settling, the selection is the
//!    old selection with out-of-range entries removed, order preserved.
//! 3. **Slider sentinel**: after settling, `selected == -1` iff the values
//!    are empty, otherwise it indexes a value.

use formgraph_controls::{Control, ControlState, Select, Slider};
use formgraph_view::Selection;
use proptest::prelude::*;
use serde_json::Value;

fn items(n: usize) -> Vec<Value> {
    (0..n).map(|i| Value::from(format!("item {i}"))).collect()
}

proptest! {
    #[test]
    fn single_selection_lands_in_range(
        before in 0usize..6,
        after in 0usize..6,
        selected in proptest::option::of(0usize..6),
    ) {
        let mut select = Select::new(items(before)).with_selection(Selection::Single(selected));
        select.set_items(items(after));
        select.check_after_update();
        match select.selection {
            Selection::Single(Some(i)) => prop_assert!(i < after),
            Selection::Single(None) => prop_assert!(after == 0 || selected.is_none()),
            Selection::Multiple(_) => prop_assert!(false, "mode changed"),
        }
    }

    #[test]
    fn multiple_selection_drops_only_out_of_range(
        after in 0usize..6,
        selected in proptest::collection::vec(0usize..8, 0..6),
    ) {
        let mut select = Select::new(items(8))
            .multiple()
            .with_selection(Selection::Multiple(selected.clone()));
        select.set_items(items(after));
        select.check_after_update();
        let expected: Vec<usize> = selected.into_iter().filter(|&i| i < after).collect();
        prop_assert_eq!(select.selection, Selection::Multiple(expected));
    }

    #[test]
    fn slider_selection_is_sentinel_or_valid(
        len in 0usize..5,
        selected in -3i64..8,
    ) {
        let values: Vec<f64> = (0..len).map(|i| i as f64).collect();
        let mut slider = Slider::new(values).with_selected(selected);
        slider.check_after_update();
        if len == 0 {
            prop_assert_eq!(slider.selected, -1);
            prop_assert!(slider.value().is_none());
        } else {
            prop_assert!(slider.selected >= 0 && (slider.selected as usize) < len);
            prop_assert!(slider.value().as_number().is_some());
        }
    }
}

#[test]
fn settle_repairs_selection_after_handler_replaces_items() {
    let parent = Control::checkbox(true);
    let mut select = Control::new(Select::new(["a", "b"]).with_selection(Selection::Single(Some(1))))
        .depends_on(&parent)
        .on_update(|this, _parents| {
            this.as_select_mut().ok_or("not a select")?.set_items(["only"]);
            Ok(())
        });
    assert!(select.run_handler(&[&parent]).unwrap());
    select.settle();
    assert_eq!(
        select.as_select().unwrap().selection,
        Selection::Single(Some(0))
    );
    assert_eq!(select.value().as_item(), Some(&Value::from("only")));
}
