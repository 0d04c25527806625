#![forbid(unsafe_code)]

//! Static or producer-backed values.
//!
//! Several control fields (input text, checkbox state, select items,
//! uploads, output data) accept either a literal value or a zero-argument
//! producer that is called every time the value is read. [`Source`] makes
//! that choice explicit.
//!
//! # Invariants
//!
//! 1. A `Dynamic` source is never memoized: each [`Source::get`] calls the
//!    producer again.
//! 2. Cloning a source shares the producer (`Arc`), never the result.

use std::fmt;
use std::sync::Arc;

/// A shareable zero-argument producer.
pub type Producer<T> = Arc<dyn Fn() -> T + Send + Sync + 'static>;

/// A value that is either fixed or produced on demand.
pub enum Source<T> {
    /// A literal value.
    Static(T),
    /// A producer invoked on every read.
    Dynamic(Producer<T>),
}

impl<T> Source<T> {
    /// Wrap a closure as a dynamic source.
    pub fn dynamic(producer: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(producer))
    }

    /// Whether reads go through a producer.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// Replace the source with a literal value.
    pub fn set(&mut self, value: T) {
        *self = Self::Static(value);
    }

    /// Borrow the literal value, if this is a static source.
    #[must_use]
    pub fn as_static(&self) -> Option<&T> {
        match self {
            Self::Static(value) => Some(value),
            Self::Dynamic(_) => None,
        }
    }

    /// Mutably borrow the literal value, if this is a static source.
    pub fn as_static_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Static(value) => Some(value),
            Self::Dynamic(_) => None,
        }
    }
}

impl<T: Clone> Source<T> {
    /// Read the current value.
    #[must_use]
    pub fn get(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic(producer) => producer(),
        }
    }
}

impl<T: Default> Default for Source<T> {
    fn default() -> Self {
        Self::Static(T::default())
    }
}

impl<T: Clone> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Dynamic(producer) => Self::Dynamic(Arc::clone(producer)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<T> From<T> for Source<T> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl From<&str> for Source<String> {
    fn from(value: &str) -> Self {
        Self::Static(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn static_source_returns_value() {
        let source = Source::from(vec![1, 2, 3]);
        assert_eq!(source.get(), vec![1, 2, 3]);
        assert!(!source.is_dynamic());
    }

    #[test]
    fn dynamic_source_calls_producer_each_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = Source::dynamic(move || counter.fetch_add(1, Ordering::SeqCst));
        assert_eq!(source.get(), 0);
        assert_eq!(source.get(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clone_shares_producer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = Source::dynamic(move || counter.fetch_add(1, Ordering::SeqCst));
        let copy = source.clone();
        let _ = source.get();
        assert_eq!(copy.get(), 1);
    }

    #[test]
    fn set_replaces_producer() {
        let mut source: Source<String> = Source::dynamic(|| "generated".to_owned());
        source.set("fixed".to_owned());
        assert_eq!(source.as_static().map(String::as_str), Some("fixed"));
        assert_eq!(format!("{source:?}"), "Static(\"fixed\")");
    }
}
