#![forbid(unsafe_code)]

use std::fmt;

use formgraph_core::ControlId;
use formgraph_view::ViewType;

/// A view could not be applied to a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The view was produced by a different control.
    IdMismatch { control: ControlId, view: ControlId },
    /// The view's type does not match the control's kind.
    KindMismatch {
        id: ControlId,
        expected: ViewType,
        found: ViewType,
    },
}

impl ValidationError {
    /// Id of the control the view was applied to.
    #[must_use]
    pub fn id(&self) -> &ControlId {
        match self {
            Self::IdMismatch { control, .. } => control,
            Self::KindMismatch { id, .. } => id,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdMismatch { control, view } => {
                write!(f, "view {view} applied to control {control}")
            }
            Self::KindMismatch {
                id,
                expected,
                found,
            } => write!(f, "control {id} expects {expected}, got {found}"),
        }
    }
}

impl std::error::Error for ValidationError {}
