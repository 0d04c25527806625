#![forbid(unsafe_code)]

//! One recomputation pass over a private copy of the controls.
//!
//! A [`Snapshot`] clones the controller's arena, so nothing done during a
//! pass is visible to the controller or to any other pass. Reads are
//! pull-based: asking for a control's view or value first brings that
//! control and all of its ancestors up to date, in topological order.
//!
//! # Invariants
//!
//! 1. **At most once**: each handler runs at most once per pass, however
//!    many dependents reach it. [`Snapshot::apply`] after a read starts a
//!    new round for the target and its descendants only.
//! 2. **Parents first**: a handler only runs after every parent is settled.
//! 3. **Gating**: on a [`Event::Refresh`] pass, handlers of controls that
//!    require apply do not run. Staged views are still applied.
//! 4. **Attribution**: a failing handler aborts the read with an
//!    [`UpdateError`] naming the failing control, which stays dirty.
//!    Controls settled before the failure keep their state.

use std::cell::{Cell, Ref, RefCell};

use formgraph_controls::{Control, ControlValue};
use formgraph_core::ControlId;
use formgraph_view::View;
use tracing::{trace, warn};

use crate::config::ControllerConfig;
use crate::error::{ListError, ListResult, UpdateError};
use crate::graph::Graph;

/// What triggered a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Event {
    /// Plain read: apply-gated handlers are skipped.
    #[default]
    Refresh,
    /// The user pressed Apply: every handler may run.
    Apply,
}

/// A copy-on-read recomputation pass.
pub struct Snapshot<'a> {
    graph: &'a Graph,
    config: &'a ControllerConfig,
    event: Event,
    slots: Vec<RefCell<Control>>,
    fresh: Vec<Cell<bool>>,
    deferred: Vec<Cell<bool>>,
    apply_slot: Option<usize>,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(
        controls: &[Control],
        graph: &'a Graph,
        config: &'a ControllerConfig,
        event: Event,
        apply_slot: Option<usize>,
    ) -> Self {
        let slots = controls
            .iter()
            .map(|c| {
                let mut copy = c.clone();
                copy.invalidate();
                RefCell::new(copy)
            })
            .collect();
        Self {
            graph,
            config,
            event,
            slots,
            fresh: (0..controls.len()).map(|_| Cell::new(false)).collect(),
            deferred: (0..controls.len()).map(|_| Cell::new(false)).collect(),
            apply_slot,
        }
    }

    #[must_use]
    pub fn event(&self) -> Event {
        self.event
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index(&self, id: &str) -> ListResult<usize> {
        self.graph
            .index_of(id)
            .ok_or_else(|| ListError::UnknownControl(ControlId::new(id)))
    }

    /// Stage a client view on the matching control.
    ///
    /// The view is applied when the control is next read. The control and
    /// its descendants are marked for recomputation.
    pub fn apply(&self, view: View) -> ListResult<()> {
        let node = self.index(view.id.as_str())?;
        self.slots[node].borrow_mut().stage(view)?;
        self.fresh[node].set(false);
        for child in self.graph.descendants(node) {
            if self.fresh[child].replace(false) {
                self.slots[child].borrow_mut().invalidate();
            }
        }
        Ok(())
    }

    /// Whether the handler of `control` is held back on this pass.
    fn gated(&self, control: &Control) -> bool {
        self.event != Event::Apply
            && control.is_apply_required()
            && !(self.config.outputs_always_fresh && control.kind().is_output())
    }

    /// Bring `node` and its ancestors up to date.
    fn ensure(&self, node: usize) -> Result<(), UpdateError> {
        if self.fresh[node].get() {
            return Ok(());
        }
        for i in self.graph.ancestors(node) {
            if !self.fresh[i].get() {
                self.step(i)?;
            }
        }
        Ok(())
    }

    /// Update a single node whose parents are already fresh.
    fn step(&self, node: usize) -> Result<(), UpdateError> {
        let mut control = self.slots[node].borrow_mut();
        let applied = control.apply_pending();

        if self.gated(&control) {
            if applied || (control.has_handler() && control.is_dirty()) {
                self.deferred[node].set(true);
            }
        } else if control.has_handler() {
            let guards: Vec<Ref<'_, Control>> = self
                .graph
                .parents(node)
                .iter()
                .map(|&p| self.slots[p].borrow())
                .collect();
            let parents: Vec<&Control> = guards.iter().map(|g| &**g).collect();
            match control.run_handler(&parents) {
                Ok(ran) => {
                    if ran {
                        trace!(control = %control.id(), "handler completed");
                    }
                }
                Err(cause) => {
                    warn!(control = %control.id(), error = %cause, "handler failed");
                    return Err(UpdateError::new(control.id().clone(), cause));
                }
            }
        }

        control.settle();
        self.fresh[node].set(true);
        Ok(())
    }

    /// Fresh view of the control with `id`.
    pub fn view(&self, id: &str) -> ListResult<View> {
        let node = self.index(id)?;
        self.view_at(node)
    }

    fn view_at(&self, node: usize) -> ListResult<View> {
        if Some(node) == self.apply_slot {
            for other in (0..self.slots.len()).filter(|&n| n != node) {
                self.ensure(other)?;
            }
            return Ok(self.apply_view(node));
        }
        self.ensure(node)?;
        Ok(self.slots[node].borrow().view())
    }

    /// Fresh semantic value of the control with `id`.
    pub fn value(&self, id: &str) -> ListResult<ControlValue> {
        let node = self.index(id)?;
        self.ensure(node)?;
        Ok(self.slots[node].borrow().value())
    }

    /// Fresh views of every control, in registration order.
    ///
    /// The Apply control is rendered last, once the others have settled,
    /// and is enabled only when a gated control has work waiting for it.
    pub fn views(&self) -> ListResult<Vec<View>> {
        let mut views = Vec::with_capacity(self.slots.len());
        for node in 0..self.slots.len() {
            if Some(node) == self.apply_slot {
                views.push(None);
            } else {
                self.ensure(node)?;
                views.push(Some(self.slots[node].borrow().view()));
            }
        }
        Ok(views
            .into_iter()
            .enumerate()
            .map(|(node, view)| view.unwrap_or_else(|| self.apply_view(node)))
            .collect())
    }

    /// Whether some apply-gated control holds back work on this pass.
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        self.deferred.iter().any(Cell::get)
    }

    fn apply_view(&self, node: usize) -> View {
        let mut control = self.slots[node].borrow_mut();
        control.apply_pending();
        control.settle();
        self.fresh[node].set(true);
        let mut view = control.view();
        view.enabled = view.enabled && self.event == Event::Refresh && self.has_deferred();
        view
    }

    /// Borrow a settled copy, bringing it up to date first.
    pub fn control(&self, id: &str) -> ListResult<Ref<'_, Control>> {
        let node = self.index(id)?;
        self.ensure(node)?;
        Ok(self.slots[node].borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Controller;
    use formgraph_core::HandlerError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    fn counting_double(
        calls: &Arc<AtomicUsize>,
    ) -> impl Fn(&mut Control, &[&Control]) -> Result<(), HandlerError> + Send + Sync + 'static
    {
        let calls = Arc::clone(calls);
        move |this, parents| {
            calls.fetch_add(1, Ordering::SeqCst);
            let n: i64 = parents[0].value().as_text().unwrap_or("0").parse()?;
            this.as_input_mut()
                .ok_or("not an input")?
                .set_text((n * 2).to_string());
            Ok(())
        }
    }

    #[test]
    fn value_pulls_ancestors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let a = Control::input("3").with_id("a");
        let b = Control::input("").with_id("b").depends_on(&a).on_update(counting_double(&calls));
        let c = Control::input("").with_id("c").depends_on(&b).on_update(counting_double(&calls));
        let controller = Controller::new(vec![a, b, c]).unwrap();
        let snapshot = controller.snapshot(Event::Refresh);
        assert_eq!(snapshot.value("c").unwrap().as_text(), Some("12"));
        assert_eq!(snapshot.value("b").unwrap().as_text(), Some("6"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn apply_after_read_recomputes_descendants() {
        let calls = Arc::new(AtomicUsize::new(0));
        let a = Control::input("3").with_id("a");
        let b = Control::input("").with_id("b").depends_on(&a).on_update(counting_double(&calls));
        let controller = Controller::new(vec![a, b]).unwrap();
        let snapshot = controller.snapshot(Event::Refresh);
        assert_eq!(snapshot.value("b").unwrap().as_text(), Some("6"));

        let mut view = snapshot.view("a").unwrap();
        view.as_input_mut().unwrap().text = Some("5".into());
        snapshot.apply(view).unwrap();
        assert_eq!(snapshot.value("b").unwrap().as_text(), Some("10"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_view_id_is_reported() {
        let controller = Controller::new(vec![Control::input("x").with_id("a")]).unwrap();
        let snapshot = controller.snapshot(Event::Refresh);
        let err = snapshot
            .apply(View::new("zzz", formgraph_view::InputView::default()))
            .unwrap_err();
        assert!(matches!(err, ListError::UnknownControl(ref id) if id.as_str() == "zzz"));
    }

    #[test]
    fn gated_handler_waits_for_apply() {
        let calls = Arc::new(AtomicUsize::new(0));
        let a = Control::input("3").with_id("a");
        let b = Control::input("")
            .with_id("b")
            .depends_on(&a)
            .with_require_apply(true)
            .on_update(counting_double(&calls));
        let controller = Controller::new(vec![a, b]).unwrap();

        let refresh = controller.snapshot(Event::Refresh);
        assert_eq!(refresh.value("b").unwrap().as_text(), Some(""));
        assert!(refresh.has_deferred());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let apply = controller.snapshot(Event::Apply);
        assert_eq!(apply.value("b").unwrap().as_text(), Some("6"));
        assert!(!apply.has_deferred());
    }

    #[traced_test]
    #[test]
    fn handler_failure_is_logged_with_id() {
        let a = Control::input("ten").with_id("a");
        let b = Control::input("")
            .with_id("b")
            .depends_on(&a)
            .on_update(counting_double(&Arc::new(AtomicUsize::new(0))));
        let controller = Controller::new(vec![a, b]).unwrap();
        let snapshot = controller.snapshot(Event::Refresh);
        let err = snapshot.value("b").unwrap_err();
        assert_eq!(err.id().as_str(), "b");
        assert!(logs_contain("handler failed"));
        assert!(snapshot.control("a").is_ok());
    }
}
