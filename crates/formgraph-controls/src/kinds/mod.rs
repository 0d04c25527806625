#![forbid(unsafe_code)]

//! Concrete control kinds.
//!
//! Every kind implements [`ControlState`]: how it renders into a
//! [`ViewKind`], which fields an applied view overwrites, what its
//! semantic value is, and what it repairs after an update.
//!
//! | Kind | Editable state | Value | After update |
//! |------|----------------|-------|--------------|
//! | [`Input`] | text | text | |
//! | [`Checkbox`] | selected | selected | |
//! | [`Select`] | selection | resolved element(s) | clamp selection to items |
//! | [`Slider`] | selected | `values[selected]` | `-1` if empty, `0` if out of range |
//! | [`Uploader`] | uploads | uploads | |
//! | [`Output`] | none | data | |
//! | [`Markdown`] | none | markdown data | re-wrap static text |

mod checkbox;
mod input;
mod markdown;
mod output;
mod select;
mod slider;
mod uploader;

pub use checkbox::Checkbox;
pub use input::Input;
pub use markdown::Markdown;
pub use output::Output;
pub use select::Select;
pub use slider::Slider;
pub use uploader::Uploader;

use formgraph_view::{ViewKind, ViewType};

use crate::value::ControlValue;

/// Per-kind behavior of a control.
pub trait ControlState {
    /// Wire type of the views this kind produces and accepts.
    fn view_type(&self) -> ViewType;

    /// Render the kind-specific part of the view.
    fn view_kind(&self) -> ViewKind;

    /// Overwrite editable fields from an applied view of the same type.
    fn apply(&mut self, view: &ViewKind);

    /// Semantic value.
    fn value(&self) -> ControlValue;

    /// Repair state after a recomputation.
    fn check_after_update(&mut self) {}
}

/// The closed set of control kinds.
#[derive(Debug, Clone)]
pub enum ControlKind {
    Input(Input),
    Checkbox(Checkbox),
    Select(Select),
    Slider(Slider),
    Uploader(Uploader),
    Output(Output),
    Markdown(Markdown),
    /// Button that triggers handlers gated behind an explicit apply.
    Apply,
}

impl ControlKind {
    fn state(&self) -> Option<&dyn ControlState> {
        match self {
            Self::Input(k) => Some(k),
            Self::Checkbox(k) => Some(k),
            Self::Select(k) => Some(k),
            Self::Slider(k) => Some(k),
            Self::Uploader(k) => Some(k),
            Self::Output(k) => Some(k),
            Self::Markdown(k) => Some(k),
            Self::Apply => None,
        }
    }

    fn state_mut(&mut self) -> Option<&mut dyn ControlState> {
        match self {
            Self::Input(k) => Some(k),
            Self::Checkbox(k) => Some(k),
            Self::Select(k) => Some(k),
            Self::Slider(k) => Some(k),
            Self::Uploader(k) => Some(k),
            Self::Output(k) => Some(k),
            Self::Markdown(k) => Some(k),
            Self::Apply => None,
        }
    }

    /// Whether this is an output-like kind (output or markdown).
    #[must_use]
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_) | Self::Markdown(_))
    }

    #[must_use]
    pub fn is_apply(&self) -> bool {
        matches!(self, Self::Apply)
    }

    /// Short kind name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Checkbox(_) => "checkbox",
            Self::Select(_) => "select",
            Self::Slider(_) => "slider",
            Self::Uploader(_) => "uploader",
            Self::Output(_) => "output",
            Self::Markdown(_) => "markdown",
            Self::Apply => "apply",
        }
    }
}

impl ControlState for ControlKind {
    fn view_type(&self) -> ViewType {
        self.state().map_or(ViewType::Apply, |s| s.view_type())
    }

    fn view_kind(&self) -> ViewKind {
        self.state().map_or(ViewKind::Apply, |s| s.view_kind())
    }

    fn apply(&mut self, view: &ViewKind) {
        if let Some(state) = self.state_mut() {
            state.apply(view);
        }
    }

    fn value(&self) -> ControlValue {
        self.state().map_or(ControlValue::None, |s| s.value())
    }

    fn check_after_update(&mut self) {
        if let Some(state) = self.state_mut() {
            state.check_after_update();
        }
    }
}

impl From<Input> for ControlKind {
    fn from(k: Input) -> Self {
        Self::Input(k)
    }
}

impl From<Checkbox> for ControlKind {
    fn from(k: Checkbox) -> Self {
        Self::Checkbox(k)
    }
}

impl From<Select> for ControlKind {
    fn from(k: Select) -> Self {
        Self::Select(k)
    }
}

impl From<Slider> for ControlKind {
    fn from(k: Slider) -> Self {
        Self::Slider(k)
    }
}

impl From<Uploader> for ControlKind {
    fn from(k: Uploader) -> Self {
        Self::Uploader(k)
    }
}

impl From<Output> for ControlKind {
    fn from(k: Output) -> Self {
        Self::Output(k)
    }
}

impl From<Markdown> for ControlKind {
    fn from(k: Markdown) -> Self {
        Self::Markdown(k)
    }
}
