#![forbid(unsafe_code)]

//! Single and multiple selection over a list of items.
//!
//! # Invariants
//!
//! 1. A multiple select always holds [`Selection::Multiple`]; a single
//!    select always holds [`Selection::Single`]. Applied views are coerced
//!    to the control's mode.
//! 2. After an update, every selected index is within the current items:
//!    a single selection past the end resets to `0` (or `None` when the
//!    items are empty), and out-of-range entries of a multiple selection
//!    are dropped.

use std::fmt;
use std::sync::Arc;

use formgraph_core::Source;
use formgraph_view::{SelectView, Selection, ViewKind, ViewType};
use serde_json::Value;

use super::ControlState;
use crate::list_model::{ItemsModel, ListModel, TitleFn};
use crate::value::ControlValue;

/// Choice from a list of items.
#[derive(Clone)]
pub struct Select {
    pub items: Source<Vec<Value>>,
    pub selection: Selection,
    pub title: Option<TitleFn>,
    pub placeholder: Option<String>,
}

impl Select {
    /// Single select over a fixed list, first item selected.
    #[must_use]
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::from_source(Source::Static(items.into_iter().map(Into::into).collect()))
    }

    /// Single select over items produced on every read.
    #[must_use]
    pub fn dynamic(producer: impl Fn() -> Vec<Value> + Send + Sync + 'static) -> Self {
        Self::from_source(Source::dynamic(producer))
    }

    #[must_use]
    pub fn from_source(items: Source<Vec<Value>>) -> Self {
        Self {
            items,
            selection: Selection::Single(Some(0)),
            title: None,
            placeholder: None,
        }
    }

    /// Switch to multiple selection with nothing selected.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.selection = Selection::Multiple(Vec::new());
        self
    }

    /// Set the initial selection. Coerced to the current mode.
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.set_selection(selection);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.title = Some(Arc::new(title));
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.selection.is_multiple()
    }

    /// Replace the items with a fixed list. The selection is repaired on
    /// the next update.
    pub fn set_items<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.items = Source::Static(items.into_iter().map(Into::into).collect());
    }

    /// Replace the selection, keeping the current mode.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = match (self.is_multiple(), selection) {
            (true, Selection::Single(index)) => Selection::Multiple(index.into_iter().collect()),
            (false, Selection::Multiple(indices)) => {
                Selection::Single(indices.first().copied())
            }
            (_, selection) => selection,
        };
    }

    /// Derive a fresh list model from the current items.
    #[must_use]
    pub fn model(&self) -> ItemsModel {
        ItemsModel::resolve(&self.items, self.title.as_ref())
    }

    /// Resolve the selection against a model.
    fn resolve(&self, model: &ItemsModel) -> ControlValue {
        match &self.selection {
            Selection::Single(index) => index
                .and_then(|i| model.element(i))
                .cloned()
                .map_or(ControlValue::None, ControlValue::Item),
            Selection::Multiple(indices) => ControlValue::Items(
                indices
                    .iter()
                    .filter_map(|&i| model.element(i).cloned())
                    .collect(),
            ),
        }
    }
}

impl ControlState for Select {
    fn view_type(&self) -> ViewType {
        ViewType::Select
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Select(SelectView {
            titles: self.model().titles(),
            selection: self.selection.clone(),
            placeholder: self.placeholder.clone(),
        })
    }

    fn apply(&mut self, view: &ViewKind) {
        if let ViewKind::Select(view) = view {
            self.set_selection(view.selection.clone());
        }
    }

    fn value(&self) -> ControlValue {
        self.resolve(&self.model())
    }

    fn check_after_update(&mut self) {
        let size = self.model().size();
        match &mut self.selection {
            Selection::Multiple(indices) => indices.retain(|&i| i < size),
            Selection::Single(index) => {
                if index.is_some() {
                    if size == 0 {
                        *index = None;
                    } else if index.is_some_and(|i| i >= size) {
                        *index = Some(0);
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("title", &self.title.as_ref().map(|_| ".."))
            .field("placeholder", &self.placeholder)
            .finish()
    }
}
