#![forbid(unsafe_code)]

//! Controls: stateful graph nodes and their concrete kinds.
//!
//! Application code declares controls, wires parent edges with
//! [`Control::depends_on`], and attaches [`Handler`]s that recompute a
//! control from its parents. A controller owns the graph and drives the
//! recomputation primitives exposed here.

pub mod control;
pub mod error;
pub mod handler;
pub mod kinds;
pub mod list_model;
pub mod value;

pub use control::Control;
pub use error::ValidationError;
pub use handler::Handler;
pub use kinds::{
    Checkbox, ControlKind, ControlState, Input, Markdown, Output, Select, Slider, Uploader,
};
pub use list_model::{ItemsModel, ListModel, TitleFn, default_title};
pub use value::ControlValue;
