#![forbid(unsafe_code)]

//! formgraph public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a
//! prelude. A typical application declares controls, hands them to a
//! [`Controller`], and calls [`Controller::list`] on every client
//! round-trip:
//!
//! ```
//! use formgraph::prelude::*;
//!
//! let a = Control::input("10").with_id("a");
//! let b = Control::input("").with_id("b").depends_on(&a).on_update(|this, parents| {
//!     let n: i64 = parents[0].value().as_text().unwrap_or("0").parse()?;
//!     this.as_input_mut().ok_or("not an input")?.set_text((n * 2).to_string());
//!     Ok(())
//! });
//! let controller = Controller::new(vec![a, b])?;
//! let views = controller.refresh()?;
//! assert_eq!(views[1].as_input().unwrap().text.as_deref(), Some("20"));
//! # Ok::<(), formgraph::Error>(())
//! ```

use std::error::Error as StdError;
use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use formgraph_core::{ControlId, HandlerError, Producer, Source};

// --- View re-exports -------------------------------------------------------

pub use formgraph_view::{
    CheckboxView, Container, EncodedOutput, InputView, Layout, Map, Markdown, OutputView, Payload,
    SelectView, Selection, SliderView, Upload, UploaderView, View, ViewError, ViewKind, ViewType,
    pack, pack_all, unpack, unpack_all,
};

// --- Control re-exports ----------------------------------------------------

pub use formgraph_controls::{
    Control, ControlKind, ControlValue, Handler, ItemsModel, ListModel, Select, Slider,
    ValidationError,
};

// --- Runtime re-exports ----------------------------------------------------

pub use formgraph_runtime::{
    Command, Controller, ControllerConfig, DefaultEncoder, Event, Execution, ExecutionStatus,
    Executor, GraphError, HandlerCache, ListError, MemoryUploads, OutputEncoder, Snapshot,
    UpdateError, UploadResolver,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for formgraph applications.
#[derive(Debug)]
pub enum Error {
    /// The controls do not form a valid graph.
    Graph(GraphError),
    /// A recomputation pass failed.
    List(ListError),
    /// A packed view could not be read.
    View(ViewError),
    Validation(ValidationError),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph(err) => write!(f, "{err}"),
            Self::List(err) => write!(f, "{err}"),
            Self::View(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Graph(err) => err.source(),
            Self::List(err) => err.source(),
            Self::View(err) => err.source(),
            Self::Validation(err) => err.source(),
            Self::Json(err) => err.source(),
            Self::Io(err) => err.source(),
        }
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<ListError> for Error {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

impl From<UpdateError> for Error {
    fn from(err: UpdateError) -> Self {
        Self::List(ListError::Update(err))
    }
}

impl From<ViewError> for Error {
    fn from(err: ViewError) -> Self {
        Self::View(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for formgraph APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Control, ControlId, ControlValue, Controller, ControllerConfig, Error, Event, Payload,
        Result, Select, Selection, View, ViewKind,
    };

    pub use crate::{controls, core, runtime, view};
}

pub use formgraph_controls as controls;
pub use formgraph_core as core;
pub use formgraph_runtime as runtime;
pub use formgraph_view as view;
