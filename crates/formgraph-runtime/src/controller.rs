#![forbid(unsafe_code)]

//! The controller: owner of an application's control graph.
//!
//! ```text
//!   Controller (originals, never mutated by reads)
//!        │ snapshot(event): clone arena
//!        ▼
//!   Snapshot ── apply(view)* ── views() ──▶ Vec<View>
//! ```
//!
//! # Invariants
//!
//! 1. Control ids are unique and every parent id resolves; checked by
//!    [`Controller::init`], which every constructor calls.
//! 2. At most one Apply control. One is synthesized (appended last) when
//!    some control requires apply, none was declared, and the
//!    configuration allows it.
//! 3. `list` never mutates the controller, so concurrent `list` calls on a
//!    shared controller are independent.

use formgraph_controls::Control;
use formgraph_core::ControlId;
use formgraph_view::{Container, Map, View};
use tracing::{debug, debug_span};

use crate::config::ControllerConfig;
use crate::error::{GraphError, ListResult};
use crate::graph::Graph;
use crate::snapshot::{Event, Snapshot};

/// Owns the registered controls and runs recomputation passes.
#[derive(Debug, Clone)]
pub struct Controller {
    controls: Vec<Control>,
    containers: Vec<Container>,
    config: ControllerConfig,
    graph: Graph,
    apply_slot: Option<usize>,
    /// Whether the last control is an Apply control added by `init`.
    synthesized: bool,
}

/// Builder for [`Controller`].
#[derive(Debug, Clone, Default)]
pub struct ControllerBuilder {
    controls: Vec<Control>,
    containers: Vec<Container>,
    config: ControllerConfig,
}

impl ControllerBuilder {
    #[must_use]
    pub fn control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    #[must_use]
    pub fn controls(mut self, controls: impl IntoIterator<Item = Control>) -> Self {
        self.controls.extend(controls);
        self
    }

    #[must_use]
    pub fn containers(mut self, containers: impl IntoIterator<Item = Container>) -> Self {
        self.containers.extend(containers);
        self
    }

    #[must_use]
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the graph and build the controller.
    pub fn build(self) -> Result<Controller, GraphError> {
        let mut controller = Controller {
            controls: self.controls,
            containers: self.containers,
            config: self.config,
            graph: Graph::default(),
            apply_slot: None,
            synthesized: false,
        };
        controller.init()?;
        Ok(controller)
    }
}

impl Controller {
    /// Controller with the default configuration and no containers.
    pub fn new(controls: Vec<Control>) -> Result<Self, GraphError> {
        Self::builder().controls(controls).build()
    }

    #[must_use]
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    /// Resolve parent ids against the registered controls and validate the
    /// graph. Idempotent.
    ///
    /// All checks run on a candidate list; on error the controller is left
    /// exactly as it was.
    pub fn init(&mut self) -> Result<(), GraphError> {
        let mut candidate = self.declared().to_vec();

        let apply_ids: Vec<ControlId> = candidate
            .iter()
            .filter(|c| c.kind().is_apply())
            .map(|c| c.id().clone())
            .collect();
        if apply_ids.len() > 1 {
            return Err(GraphError::MultipleApply { ids: apply_ids });
        }

        if !self.containers.is_empty() {
            for control in &candidate {
                if let Some(container) = &control.layout().container
                    && !self.containers.iter().any(|c| &c.id == container)
                {
                    return Err(GraphError::UnknownContainer {
                        control: control.id().clone(),
                        container: container.clone(),
                    });
                }
            }
        }

        let needs_apply = candidate.iter().any(Control::is_apply_required);
        let synthesized = apply_ids.is_empty() && needs_apply && self.config.synthesize_apply;
        if synthesized {
            // Reuse an earlier synthesized control so its id stays stable.
            let apply = match self.synthesized_apply() {
                Some(apply) => apply.clone(),
                None => Control::apply_button(self.config.apply_label.clone()),
            };
            candidate.push(apply);
        }

        let graph = Graph::build(&candidate)?;
        if synthesized
            && self.synthesized_apply().is_none()
            && let Some(apply) = candidate.last()
        {
            debug!(control = %apply.id(), "synthesized apply control");
        }
        self.apply_slot = candidate.iter().position(|c| c.kind().is_apply());
        self.controls = candidate;
        self.graph = graph;
        self.synthesized = synthesized;
        debug!(
            controls = self.controls.len(),
            apply = self.apply_slot.is_some(),
            "control graph resolved"
        );
        Ok(())
    }

    /// Controls as registered, without a synthesized Apply.
    fn declared(&self) -> &[Control] {
        match self.controls.split_last() {
            Some((_, rest)) if self.synthesized => rest,
            _ => &self.controls,
        }
    }

    fn synthesized_apply(&self) -> Option<&Control> {
        self.controls.last().filter(|_| self.synthesized)
    }

    /// Register another control and re-validate.
    ///
    /// On error the control is not kept and the controller is unchanged.
    pub fn push(&mut self, control: Control) -> Result<(), GraphError> {
        let mut next = self.clone();
        // Keep the synthesized Apply control last.
        next.controls.insert(self.declared().len(), control);
        next.init()?;
        *self = next;
        Ok(())
    }

    /// Registered controls in order, including a synthesized Apply.
    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    #[must_use]
    pub fn control(&self, id: &str) -> Option<&Control> {
        self.graph.index_of(id).map(|i| &self.controls[i])
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The Apply control, if any.
    #[must_use]
    pub fn apply_control(&self) -> Option<&Control> {
        self.apply_slot.map(|i| &self.controls[i])
    }

    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Containers in their packed wire form.
    #[must_use]
    pub fn packed_containers(&self) -> Vec<Map> {
        self.containers.iter().map(Container::pack).collect()
    }

    /// Start a pass over a private copy of the controls.
    #[must_use]
    pub fn snapshot(&self, event: Event) -> Snapshot<'_> {
        Snapshot::new(
            &self.controls,
            &self.graph,
            &self.config,
            event,
            self.apply_slot,
        )
    }

    /// Apply client views and return fresh views of every control.
    ///
    /// This is the entry point a transport calls on each round-trip.
    pub fn list(&self, views: impl IntoIterator<Item = View>, event: Event) -> ListResult<Vec<View>> {
        let views: Vec<View> = views.into_iter().collect();
        let span = debug_span!(
            "controller.list",
            controls = self.controls.len(),
            views = views.len(),
            event = ?event
        );
        let _guard = span.enter();

        let snapshot = self.snapshot(event);
        for view in views {
            snapshot.apply(view)?;
        }
        snapshot.views()
    }

    /// [`list`](Self::list) with no client views on a refresh.
    pub fn refresh(&self) -> ListResult<Vec<View>> {
        self.list(Vec::new(), Event::Refresh)
    }
}
