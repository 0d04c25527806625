#![forbid(unsafe_code)]

//! Indexable, titled views over select items.
//!
//! A list model is derived from a select's item [`Source`] each time the
//! select renders or resolves its selection. It is never kept across
//! recomputations, because the backing items may have changed.

use std::fmt;
use std::sync::Arc;

use formgraph_core::Source;
use serde_json::Value;

/// Maps an item to its display title.
pub type TitleFn = Arc<dyn Fn(&Value) -> String + Send + Sync + 'static>;

/// Indexable sequence with per-item titles.
pub trait ListModel {
    /// Number of items.
    fn size(&self) -> usize;

    /// Item at `index`, or `None` when out of range.
    fn element(&self, index: usize) -> Option<&Value>;

    /// Title of the item at `index`, or `None` when out of range.
    fn title(&self, index: usize) -> Option<String>;

    /// All titles in order.
    fn titles(&self) -> Vec<String> {
        (0..self.size()).filter_map(|i| self.title(i)).collect()
    }
}

/// Default title: strings as-is, anything else as compact JSON.
#[must_use]
pub fn default_title(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The built-in model: a materialized item list plus an optional title
/// function.
#[derive(Clone)]
pub struct ItemsModel {
    items: Vec<Value>,
    title: Option<TitleFn>,
}

impl ItemsModel {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self { items, title: None }
    }

    #[must_use]
    pub fn with_title(mut self, title: TitleFn) -> Self {
        self.title = Some(title);
        self
    }

    /// Materialize a model from a source. Dynamic sources are invoked once.
    #[must_use]
    pub fn resolve(source: &Source<Vec<Value>>, title: Option<&TitleFn>) -> Self {
        if source.is_dynamic() {
            formgraph_core::trace!("resolving dynamic select items");
        }
        Self {
            items: source.get(),
            title: title.cloned(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl ListModel for ItemsModel {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn element(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    fn title(&self, index: usize) -> Option<String> {
        let item = self.items.get(index)?;
        Some(match &self.title {
            Some(f) => f(item),
            None => default_title(item),
        })
    }
}

impl fmt::Debug for ItemsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemsModel")
            .field("items", &self.items)
            .field("title", &self.title.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn titles_default_to_string_conversion() {
        let model = ItemsModel::new(vec![json!("Hello"), json!(3), json!({"a": 1})]);
        assert_eq!(model.titles(), vec!["Hello", "3", r#"{"a":1}"#]);
    }

    #[test]
    fn title_function_overrides() {
        let model = ItemsModel::new(vec![json!({"code": "US", "title": "United States"})])
            .with_title(Arc::new(|v| v["title"].as_str().unwrap_or_default().to_owned()));
        assert_eq!(model.title(0).as_deref(), Some("United States"));
        assert_eq!(model.title(1), None);
    }

    #[test]
    fn dynamic_source_is_invoked_per_resolve() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = Source::dynamic(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            vec![json!(n)]
        });
        assert_eq!(ItemsModel::resolve(&source, None).element(0), Some(&json!(0)));
        assert_eq!(ItemsModel::resolve(&source, None).element(0), Some(&json!(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn out_of_range_element_is_none() {
        let model = ItemsModel::new(vec![]);
        assert_eq!(model.size(), 0);
        assert!(model.element(0).is_none());
        assert!(model.titles().is_empty());
    }
}
