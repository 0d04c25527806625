#![forbid(unsafe_code)]

//! Recomputation handlers.

use std::fmt;
use std::sync::Arc;

use formgraph_core::HandlerError;

use crate::control::Control;

type HandlerFn =
    dyn Fn(&mut Control, &[&Control]) -> Result<(), HandlerError> + Send + Sync + 'static;

/// Recomputes a control from its parents.
///
/// The handler receives the control itself (mutably) and its parents in
/// declaration order, already up to date. It may fail with any error;
/// the failure is reported with the control's id.
#[derive(Clone)]
pub struct Handler {
    arity: Option<usize>,
    f: Arc<HandlerFn>,
}

impl Handler {
    /// A handler accepting any number of parents.
    pub fn new(
        f: impl Fn(&mut Control, &[&Control]) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity: None,
            f: Arc::new(f),
        }
    }

    /// A handler that expects exactly `arity` parents. Checked when the
    /// graph is built.
    pub fn with_arity(
        arity: usize,
        f: impl Fn(&mut Control, &[&Control]) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity: Some(arity),
            f: Arc::new(f),
        }
    }

    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Invoke the handler.
    pub fn call(&self, control: &mut Control, parents: &[&Control]) -> Result<(), HandlerError> {
        (self.f)(control, parents)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
