//! Copy-on-read isolation of controller passes.
//!
//! # Invariants
//!
//! 1. Two `list()` calls without client views return identical views.
//! 2. Mutating a returned view does not leak into later passes.
//! 3. Concurrent passes over one shared controller see only their own
//!    client views.

use std::sync::Arc;
use std::thread;

use formgraph_controls::Control;
use formgraph_core::HandlerError;
use formgraph_runtime::{Controller, Event};
use formgraph_view::{View, pack_all};

fn suffix(this: &mut Control, parents: &[&Control]) -> Result<(), HandlerError> {
    let text = parents[0].value().as_text().unwrap_or_default().to_owned();
    this.as_input_mut()
        .ok_or("not an input")?
        .set_text(format!("{text}!"));
    Ok(())
}

fn controller() -> Controller {
    let a = Control::input("hello").with_id("a").with_label("A");
    let b = Control::input("").with_id("b").depends_on(&a).on_update(suffix);
    let flag = Control::checkbox(true).with_id("flag");
    Controller::new(vec![a, b, flag]).unwrap()
}

fn text_of(views: &[View], id: &str) -> String {
    views
        .iter()
        .find(|v| v.id.as_str() == id)
        .and_then(|v| v.as_input())
        .and_then(|i| i.text.clone())
        .unwrap_or_default()
}

#[test]
fn repeated_lists_are_identical() {
    let controller = controller();
    let first = controller.refresh().unwrap();
    let second = controller.refresh().unwrap();
    assert_eq!(first, second);
    assert_eq!(pack_all(&first), pack_all(&second));
}

#[test]
fn mutating_returned_views_does_not_leak() {
    let controller = controller();
    let mut views = controller.refresh().unwrap();
    views[0].as_input_mut().unwrap().text = Some("changed".into());
    views[2].as_checkbox_mut().unwrap().selected = false;

    let fresh = controller.refresh().unwrap();
    assert_eq!(text_of(&fresh, "a"), "hello");
    assert_eq!(text_of(&fresh, "b"), "hello!");
    assert!(fresh[2].as_checkbox().unwrap().selected);
}

#[test]
fn applied_views_do_not_reach_the_controller() {
    let controller = controller();
    let mut views = controller.refresh().unwrap();
    views[0].as_input_mut().unwrap().text = Some("bye".into());
    let edited = controller.list(views, Event::Refresh).unwrap();
    assert_eq!(text_of(&edited, "b"), "bye!");

    let fresh = controller.refresh().unwrap();
    assert_eq!(text_of(&fresh, "a"), "hello");
    assert_eq!(controller.control("a").unwrap().value().as_text(), Some("hello"));
}

#[test]
fn concurrent_passes_are_independent() {
    let controller = Arc::new(controller());
    let template = controller.refresh().unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let controller = Arc::clone(&controller);
                let mut views = template.clone();
                scope.spawn(move || {
                    let text = format!("t{n}");
                    views[0].as_input_mut().unwrap().text = Some(text.clone());
                    let out = controller.list(views, Event::Refresh).unwrap();
                    (text, text_of(&out, "b"))
                })
            })
            .collect();
        for handle in handles {
            let (text, derived) = handle.join().unwrap();
            assert_eq!(derived, format!("{text}!"));
        }
    });

    assert_eq!(text_of(&controller.refresh().unwrap(), "a"), "hello");
}
