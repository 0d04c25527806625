#![forbid(unsafe_code)]

//! formgraph runtime
//!
//! Owns a set of controls, resolves them into a dependency graph, and runs
//! recomputation passes over it.
//!
//! # Key Components
//!
//! - [`Controller`] - registered controls, validated graph, `list()` entry point
//! - [`Snapshot`] - one copy-on-read pass; pull-based, parents first
//! - [`Graph`] - id index, edges, and topological order
//! - [`ControllerConfig`] - recomputation policy switches
//! - [`Executor`] - turns client [`Command`]s into [`Execution`] reports
//! - [`HandlerCache`] - LRU memoization for expensive handlers
//! - [`OutputEncoder`] / [`UploadResolver`] - application plug-in points
//!
//! # Passes
//!
//! The controller is never mutated by a read. Every `list()` clones the
//! controls into a [`Snapshot`], applies the client's views to the copy,
//! and renders it. Concurrent passes over a shared controller do not
//! observe each other.

pub mod cache;
pub mod config;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod executor;
pub mod graph;
pub mod snapshot;
pub mod uploads;

pub use cache::{CacheStats, HandlerCache, parents_key};
pub use config::ControllerConfig;
pub use controller::{Controller, ControllerBuilder};
pub use encoder::{DefaultEncoder, EncodeError, OutputEncoder};
pub use error::{GraphError, ListError, ListResult, UpdateError};
pub use executor::{Command, Execution, ExecutionError, ExecutionStatus, Executor, OutputRecord};
pub use formgraph_controls::ValidationError;
pub use graph::Graph;
pub use snapshot::{Event, Snapshot};
pub use uploads::{MemoryUploads, UploadResolver};
