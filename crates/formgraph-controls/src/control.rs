#![forbid(unsafe_code)]

//! The control node.
//!
//! A [`Control`] pairs presentation metadata with a [`ControlKind`], a list
//! of parent ids it depends on, and an optional [`Handler`] that recomputes
//! it from those parents.
//!
//! # Per-pass state
//!
//! ```text
//!   clean ──stage(view)──▶ pending ──apply_pending──▶ dirty
//!     ▲                                                 │
//!     └──────────settle◀──── run_handler (parents fresh)┘
//! ```
//!
//! A freshly built control is dirty with nothing pending, so the first
//! pass over a copy runs its handler. If the handler fails the control
//! stays dirty.
//!
//! The node itself does not know its parents' objects; ordering and
//! parent resolution belong to the controller that owns the graph.

use formgraph_core::{ControlId, HandlerError};
use formgraph_view::{Layout, View, ViewType};

use crate::error::ValidationError;
use crate::handler::Handler;
use crate::kinds::{
    Checkbox, ControlKind, ControlState, Input, Markdown, Output, Select, Slider, Uploader,
};
use crate::value::ControlValue;

/// A node of the control graph.
#[derive(Debug, Clone)]
pub struct Control {
    id: ControlId,
    label: Option<String>,
    enabled: bool,
    optional: bool,
    layout: Layout,
    parents: Vec<ControlId>,
    handler: Option<Handler>,
    require_apply: bool,
    kind: ControlKind,
    dirty: bool,
    pending: Option<View>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Control {
    /// A control of the given kind with a generated id.
    #[must_use]
    pub fn new(kind: impl Into<ControlKind>) -> Self {
        Self::from_kind(kind.into())
    }

    fn from_kind(kind: ControlKind) -> Self {
        Self {
            id: ControlId::generate(),
            label: None,
            enabled: true,
            optional: false,
            layout: Layout::default(),
            parents: Vec::new(),
            handler: None,
            require_apply: false,
            kind,
            dirty: true,
            pending: None,
        }
    }

    /// Text field with initial text.
    #[must_use]
    pub fn input(text: impl Into<String>) -> Self {
        Self::new(Input::new(text))
    }

    #[must_use]
    pub fn checkbox(selected: bool) -> Self {
        Self::new(Checkbox::new(selected))
    }

    /// Single select over fixed items.
    #[must_use]
    pub fn select<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<serde_json::Value>,
    {
        Self::new(Select::new(items))
    }

    #[must_use]
    pub fn slider(values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(Slider::new(values))
    }

    #[must_use]
    pub fn uploader() -> Self {
        Self::new(Uploader::new())
    }

    /// Empty output, to be filled by a handler.
    #[must_use]
    pub fn output() -> Self {
        Self::new(Output::new())
    }

    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::new(Markdown::new(text))
    }

    /// The button that releases apply-gated handlers.
    #[must_use]
    pub fn apply_button(label: impl Into<String>) -> Self {
        Self::from_kind(ControlKind::Apply).with_label(label)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<ControlId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.layout.container = Some(container.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.layout.visible = visible;
        self
    }

    #[must_use]
    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.layout.colspan = Some(colspan);
        self
    }

    #[must_use]
    pub fn with_rowspan(mut self, rowspan: u32) -> Self {
        self.layout.rowspan = Some(rowspan);
        self
    }

    /// Add a parent. Order matters: handlers receive parents in the order
    /// they were added.
    #[must_use]
    pub fn depends_on(mut self, parent: &Control) -> Self {
        self.parents.push(parent.id.clone());
        self
    }

    /// Add parents by id.
    #[must_use]
    pub fn with_depends<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ControlId>,
    {
        self.parents.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Shorthand for [`with_handler`](Self::with_handler) with
    /// [`Handler::new`].
    #[must_use]
    pub fn on_update(
        self,
        f: impl Fn(&mut Control, &[&Control]) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        self.with_handler(Handler::new(f))
    }

    /// Gate the handler behind an explicit apply.
    #[must_use]
    pub fn with_require_apply(mut self, require_apply: bool) -> Self {
        self.require_apply = require_apply;
        self
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Control {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ControlId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parent ids in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[ControlId] {
        &self.parents
    }

    #[must_use]
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    #[must_use]
    pub fn is_apply_required(&self) -> bool {
        self.require_apply
    }

    #[must_use]
    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ControlKind {
        &mut self.kind
    }

    /// Current semantic value, as of the last settle.
    #[must_use]
    pub fn value(&self) -> ControlValue {
        self.kind.value()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn view(&self) -> View {
        View {
            id: self.id.clone(),
            enabled: self.enabled,
            label: self.label.clone(),
            optional: self.optional,
            layout: self.layout.clone(),
            depends: self.parents.clone(),
            require_apply: self.require_apply,
            kind: self.kind.view_kind(),
        }
    }

    #[must_use]
    pub fn view_type(&self) -> ViewType {
        self.kind.view_type()
    }
}

macro_rules! kind_accessors {
    ($($variant:ident => $kind:ty, $get:ident, $get_mut:ident;)*) => {
        impl Control {
            $(
                #[must_use]
                pub fn $get(&self) -> Option<&$kind> {
                    match &self.kind {
                        ControlKind::$variant(k) => Some(k),
                        _ => None,
                    }
                }

                pub fn $get_mut(&mut self) -> Option<&mut $kind> {
                    match &mut self.kind {
                        ControlKind::$variant(k) => Some(k),
                        _ => None,
                    }
                }
            )*
        }
    };
}

kind_accessors! {
    Input => Input, as_input, as_input_mut;
    Checkbox => Checkbox, as_checkbox, as_checkbox_mut;
    Select => Select, as_select, as_select_mut;
    Slider => Slider, as_slider, as_slider_mut;
    Uploader => Uploader, as_uploader, as_uploader_mut;
    Output => Output, as_output, as_output_mut;
    Markdown => Markdown, as_markdown, as_markdown_mut;
}

// ---------------------------------------------------------------------------
// Recomputation primitives
// ---------------------------------------------------------------------------

impl Control {
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next settle to recompute.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Stage a view to be applied on the next update.
    ///
    /// A later stage replaces an earlier one that has not been applied yet.
    pub fn stage(&mut self, view: View) -> Result<(), ValidationError> {
        if view.id != self.id {
            return Err(ValidationError::IdMismatch {
                control: self.id.clone(),
                view: view.id,
            });
        }
        let expected = self.view_type();
        let found = view.view_type();
        if expected != found {
            return Err(ValidationError::KindMismatch {
                id: self.id.clone(),
                expected,
                found,
            });
        }
        self.pending = Some(view);
        Ok(())
    }

    /// Apply the staged view, if any. Returns whether one was applied.
    pub fn apply_pending(&mut self) -> bool {
        let Some(view) = self.pending.take() else {
            return false;
        };
        formgraph_core::trace!(control = %self.id, kind = self.kind.name(), "applying view");
        self.kind.apply(&view.kind);
        self.dirty = true;
        true
    }

    /// Run the handler if the control is dirty. Parents must already be
    /// up to date. Returns whether the handler ran.
    ///
    /// On failure the control stays dirty.
    pub fn run_handler(&mut self, parents: &[&Control]) -> Result<bool, HandlerError> {
        if !self.dirty {
            return Ok(false);
        }
        let Some(handler) = self.handler.clone() else {
            return Ok(false);
        };
        formgraph_core::trace!(control = %self.id, parents = parents.len(), "running handler");
        handler.call(self, parents)?;
        Ok(true)
    }

    /// Finish a recomputation: run the kind's repair step if dirty, then
    /// mark clean.
    pub fn settle(&mut self) {
        if self.dirty {
            self.kind.check_after_update();
            self.dirty = false;
        }
    }
}
