#![forbid(unsafe_code)]

//! Command execution.
//!
//! A client round-trip arrives as a [`Command`]: a request id, the views
//! the client currently shows, and whether the user pressed Apply. The
//! [`Executor`] runs one pass for it and reports an [`Execution`].
//!
//! ```text
//!   refresh:  SCHEDULED ──▶ READY
//!   apply:    RUNNING   ──▶ FINISHED (views + encoded outputs)
//!   either:   ...       ──▶ FAILED   (error chain in `logs`)
//! ```

use std::fmt;
use std::sync::Arc;

use formgraph_core::ControlId;
use formgraph_view::{Map, Payload, View};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, warn};

use crate::controller::Controller;
use crate::encoder::{DefaultEncoder, EncodeError, OutputEncoder};
use crate::error::ListError;
use crate::snapshot::{Event, Snapshot};

/// One client request.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    pub id: String,
    /// Views shown by the client; absent on the first request.
    #[serde(default)]
    pub views: Option<Vec<View>>,
    #[serde(default)]
    pub apply: bool,
}

impl Command {
    /// Parse one JSON command line.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    fn event(&self) -> Event {
        if self.apply { Event::Apply } else { Event::Refresh }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Scheduled,
    Running,
    Ready,
    Finished,
    Failed,
}

/// An encoded output, as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub id: ControlId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub application: Option<String>,
    pub content_type: String,
    /// Base64 body.
    pub data: String,
}

/// Outcome of a [`Command`].
#[derive(Debug, Clone, Serialize)]
pub struct Execution {
    pub id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<View>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<OutputRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
}

impl Execution {
    fn started(command: &Command) -> Self {
        Self {
            id: command.id.clone(),
            status: if command.apply {
                ExecutionStatus::Running
            } else {
                ExecutionStatus::Scheduled
            },
            views: None,
            outputs: None,
            logs: None,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self.status,
            ExecutionStatus::Scheduled | ExecutionStatus::Running
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why an execution failed.
#[derive(Debug)]
pub enum ExecutionError {
    List(ListError),
    Encode { id: ControlId, source: EncodeError },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(err) => fmt::Display::fmt(err, f),
            Self::Encode { id, .. } => write!(f, "cannot encode output {id}"),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::List(err) => std::error::Error::source(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<ListError> for ExecutionError {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

/// `err` followed by each of its causes, one per line.
fn report(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        out.push_str("\ncaused by: ");
        out.push_str(&inner.to_string());
        cause = inner.source();
    }
    out
}

/// Runs commands against a shared controller.
#[derive(Clone)]
pub struct Executor {
    controller: Arc<Controller>,
    encoder: Arc<dyn OutputEncoder>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("controls", &self.controller.controls().len())
            .finish_non_exhaustive()
    }
}

impl Executor {
    #[must_use]
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            encoder: Arc::new(DefaultEncoder),
        }
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: impl OutputEncoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Run `command` to completion.
    pub fn execute(&self, command: Command) -> Execution {
        let span = info_span!("executor.execute", id = %command.id, apply = command.apply);
        let _guard = span.enter();

        let mut execution = Execution::started(&command);
        match self.run(&command) {
            Ok((views, outputs)) => {
                execution.views = Some(views);
                execution.outputs = outputs;
                execution.status = if command.apply {
                    ExecutionStatus::Finished
                } else {
                    ExecutionStatus::Ready
                };
                info!(status = ?execution.status, "execution done");
            }
            Err(err) => {
                warn!(error = %err, "execution failed");
                execution.status = ExecutionStatus::Failed;
                execution.views = command.views;
                execution.logs = Some(report(&err));
            }
        }
        execution
    }

    /// Parse a JSON command line and run it.
    pub fn execute_json(&self, line: &str) -> Result<Execution, serde_json::Error> {
        Command::from_json(line).map(|command| self.execute(command))
    }

    fn run(
        &self,
        command: &Command,
    ) -> Result<(Vec<View>, Option<Vec<OutputRecord>>), ExecutionError> {
        let snapshot = self.controller.snapshot(command.event());
        for view in command.views.iter().flatten() {
            snapshot.apply(view.clone())?;
        }
        let views = snapshot.views()?;
        let outputs = if command.apply {
            Some(self.outputs(&snapshot)?)
        } else {
            None
        };
        Ok((views, outputs))
    }

    fn outputs(&self, snapshot: &Snapshot<'_>) -> Result<Vec<OutputRecord>, ExecutionError> {
        let params = Map::new();
        let mut records = Vec::new();
        for control in self.controller.controls() {
            if !control.kind().is_output() {
                continue;
            }
            let id = control.id();
            let payload = snapshot
                .value(id.as_str())?
                .into_payload()
                .unwrap_or(Payload::Value(Value::Null));
            let encoded = self
                .encoder
                .encode(&payload, control.label(), &params)
                .map_err(|source| ExecutionError::Encode {
                    id: id.clone(),
                    source,
                })?;
            records.push(OutputRecord {
                id: id.clone(),
                label: control.label().map(str::to_owned),
                application: encoded.application,
                content_type: encoded.content_type,
                data: encoded.data,
            });
        }
        Ok(records)
    }
}
