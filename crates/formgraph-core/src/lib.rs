#![forbid(unsafe_code)]

//! Core: control identifiers, static/dynamic value sources, and logging.

pub mod id;
pub mod logging;
pub mod source;

pub use id::ControlId;
pub use source::{Producer, Source};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

/// Error type a recomputation handler may return.
///
/// Handlers are application code; any error type that is `Send + Sync`
/// converts into this with `?` or `.into()`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
