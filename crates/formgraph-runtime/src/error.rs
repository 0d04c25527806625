#![forbid(unsafe_code)]

//! Runtime error types.
//!
//! # Failure Modes
//!
//! | Error | Raised by | Cause |
//! |-------|-----------|-------|
//! | [`GraphError`] | `Controller::init` | duplicate id, dangling parent, cycle, second Apply, arity, unknown container |
//! | [`UpdateError`] | recomputation | a handler returned an error |
//! | [`ValidationError`] | `Snapshot::apply` | view id or type does not match the control |
//! | [`ListError::UnknownControl`] | `Snapshot::apply` | no control has the view's id |
//!
//! A failed pass leaves the controller's own controls untouched; only the
//! snapshot copies saw any mutation.

use std::fmt;

use formgraph_controls::ValidationError;
use formgraph_core::{ControlId, HandlerError};

// ─────────────────────────────────────────────────────────────────────────────
// Graph errors
// ─────────────────────────────────────────────────────────────────────────────

/// The control set does not form a valid graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two controls share an id.
    DuplicateId(ControlId),
    /// A control depends on an id that is not registered.
    DanglingReference {
        control: ControlId,
        missing: ControlId,
    },
    /// The dependency edges contain a cycle. Lists every control on or
    /// downstream of a cycle, in registration order.
    Cycle { members: Vec<ControlId> },
    /// More than one explicit Apply control.
    MultipleApply { ids: Vec<ControlId> },
    /// A handler declared an arity that differs from its parent count.
    ArityMismatch {
        control: ControlId,
        expected: usize,
        actual: usize,
    },
    /// A control names a container that was not declared.
    UnknownContainer {
        control: ControlId,
        container: String,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate control id: {id}"),
            Self::DanglingReference { control, missing } => {
                write!(f, "control {control} depends on unknown control {missing}")
            }
            Self::Cycle { members } => {
                write!(f, "dependency cycle among controls: ")?;
                for (i, id) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            Self::MultipleApply { ids } => {
                write!(f, "more than one apply control ({} found)", ids.len())
            }
            Self::ArityMismatch {
                control,
                expected,
                actual,
            } => write!(
                f,
                "handler of {control} expects {expected} parents, has {actual}"
            ),
            Self::UnknownContainer { control, container } => {
                write!(f, "control {control} placed in unknown container {container}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

// ─────────────────────────────────────────────────────────────────────────────
// Update errors
// ─────────────────────────────────────────────────────────────────────────────

/// A handler failed. Carries the failing control's id.
#[derive(Debug)]
pub struct UpdateError {
    pub id: ControlId,
    pub cause: HandlerError,
}

impl UpdateError {
    #[must_use]
    pub fn new(id: ControlId, cause: HandlerError) -> Self {
        Self { id, cause }
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control {} failed to update", self.id)
    }
}

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.cause)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// List errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure of a recomputation pass.
#[derive(Debug)]
pub enum ListError {
    Update(UpdateError),
    Validation(ValidationError),
    /// An incoming view names no registered control.
    UnknownControl(ControlId),
}

impl ListError {
    /// Id of the control the failure is attributed to.
    #[must_use]
    pub fn id(&self) -> &ControlId {
        match self {
            Self::Update(e) => &e.id,
            Self::Validation(e) => e.id(),
            Self::UnknownControl(id) => id,
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "invalid view: {e}"),
            Self::UnknownControl(id) => write!(f, "no control with id {id}"),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Update(e) => std::error::Error::source(e),
            Self::Validation(_) | Self::UnknownControl(_) => None,
        }
    }
}

impl From<UpdateError> for ListError {
    fn from(e: UpdateError) -> Self {
        Self::Update(e)
    }
}

impl From<ValidationError> for ListError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// Result of a recomputation pass.
pub type ListResult<T> = Result<T, ListError>;
