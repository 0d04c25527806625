#![forbid(unsafe_code)]

//! Views: immutable, serializable snapshots of control state.
//!
//! A [`View`] is what crosses the wire. Controls produce views, clients
//! edit them, and edited views are fed back to the control with the same
//! id. [`pack`] turns a view into an ordered JSON map carrying a `type`
//! discriminator and only the non-default optional keys; [`unpack`] is the
//! inverse dispatch on `type`.

pub mod container;
pub mod pack;
pub mod payload;
pub mod registry;
pub mod upload;
pub mod view;

pub use container::Container;
pub use pack::{pack, pack_all};
pub use payload::{EncodedOutput, Markdown, Payload};
pub use registry::{ViewError, ViewType, unpack, unpack_all};
pub use upload::Upload;
pub use view::{
    CheckboxView, InputView, Layout, OutputView, SelectView, Selection, SliderView, UploaderView,
    View, ViewKind,
};

/// An ordered JSON object, the packed form of a view.
pub type Map = serde_json::Map<String, serde_json::Value>;
