#![forbid(unsafe_code)]

//! The view data model.
//!
//! One [`View`] struct carries the presentation metadata shared by every
//! control kind; the kind-specific payload lives in [`ViewKind`], a closed
//! enum with one variant per control kind. Exhaustive matches over it keep
//! packing and unpacking in step when a kind is added.

use formgraph_core::ControlId;

use crate::payload::Payload;
use crate::registry::ViewType;
use crate::upload::Upload;

// ---------------------------------------------------------------------------
// Shared metadata
// ---------------------------------------------------------------------------

/// Layout hints. Orthogonal to recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Id of the [`Container`](crate::Container) this control sits in.
    pub container: Option<String>,
    /// Whether the control is shown at all.
    pub visible: bool,
    pub colspan: Option<u32>,
    pub rowspan: Option<u32>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            container: None,
            visible: true,
            colspan: None,
            rowspan: None,
        }
    }
}

/// Snapshot of one control's displayable state.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Id of the control that produced this view.
    pub id: ControlId,
    pub enabled: bool,
    pub label: Option<String>,
    pub optional: bool,
    pub layout: Layout,
    /// Ids of the controls the producing control depends on.
    pub depends: Vec<ControlId>,
    pub require_apply: bool,
    pub kind: ViewKind,
}

impl View {
    /// A view with default metadata.
    #[must_use]
    pub fn new(id: impl Into<ControlId>, kind: impl Into<ViewKind>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            label: None,
            optional: false,
            layout: Layout::default(),
            depends: Vec::new(),
            require_apply: false,
            kind: kind.into(),
        }
    }

    /// Wire discriminator of this view.
    #[must_use]
    pub fn view_type(&self) -> ViewType {
        self.kind.view_type()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn as_input(&self) -> Option<&InputView> {
        match &self.kind {
            ViewKind::Input(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputView> {
        match &mut self.kind {
            ViewKind::Input(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<&CheckboxView> {
        match &self.kind {
            ViewKind::Checkbox(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_checkbox_mut(&mut self) -> Option<&mut CheckboxView> {
        match &mut self.kind {
            ViewKind::Checkbox(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&SelectView> {
        match &self.kind {
            ViewKind::Select(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_select_mut(&mut self) -> Option<&mut SelectView> {
        match &mut self.kind {
            ViewKind::Select(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_slider(&self) -> Option<&SliderView> {
        match &self.kind {
            ViewKind::Slider(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_slider_mut(&mut self) -> Option<&mut SliderView> {
        match &mut self.kind {
            ViewKind::Slider(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uploader(&self) -> Option<&UploaderView> {
        match &self.kind {
            ViewKind::Uploader(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uploader_mut(&mut self) -> Option<&mut UploaderView> {
        match &mut self.kind {
            ViewKind::Uploader(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputView> {
        match &self.kind {
            ViewKind::Output(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Kind payloads
// ---------------------------------------------------------------------------

/// Kind-specific view payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    Input(InputView),
    Checkbox(CheckboxView),
    Select(SelectView),
    Slider(SliderView),
    Uploader(UploaderView),
    /// Produced by both output and markdown controls.
    Output(OutputView),
    /// The synthesized apply button. Carries no payload.
    Apply,
}

impl ViewKind {
    #[must_use]
    pub fn view_type(&self) -> ViewType {
        match self {
            Self::Input(_) => ViewType::Input,
            Self::Checkbox(_) => ViewType::Checkbox,
            Self::Select(_) => ViewType::Select,
            Self::Slider(_) => ViewType::Slider,
            Self::Uploader(_) => ViewType::Uploader,
            Self::Output(_) => ViewType::Output,
            Self::Apply => ViewType::Apply,
        }
    }
}

/// Text field state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputView {
    pub text: Option<String>,
    pub placeholder: Option<String>,
    /// Multi-line editor hint.
    pub long: bool,
}

/// Checkbox state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxView {
    pub selected: bool,
}

/// Selection of a select control.
///
/// The two modes are distinct types so a multiple-selection control can
/// never hold a bare index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<usize>),
    Multiple(Vec<usize>),
}

impl Selection {
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// Selected indices in order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Self::Single(index) => index.iter().copied().collect(),
            Self::Multiple(indices) => indices.clone(),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::Single(Some(0))
    }
}

/// Select state: item titles plus the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectView {
    pub titles: Vec<String>,
    pub selection: Selection,
    pub placeholder: Option<String>,
}

/// Slider state. `selected` is `-1` when there are no values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderView {
    pub values: Vec<f64>,
    pub selected: i64,
}

/// Uploaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploaderView {
    pub uploads: Vec<Upload>,
    pub multiple: bool,
}

/// Opaque output data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputView {
    pub data: Option<Payload>,
}

impl From<InputView> for ViewKind {
    fn from(view: InputView) -> Self {
        Self::Input(view)
    }
}

impl From<CheckboxView> for ViewKind {
    fn from(view: CheckboxView) -> Self {
        Self::Checkbox(view)
    }
}

impl From<SelectView> for ViewKind {
    fn from(view: SelectView) -> Self {
        Self::Select(view)
    }
}

impl From<SliderView> for ViewKind {
    fn from(view: SliderView) -> Self {
        Self::Slider(view)
    }
}

impl From<UploaderView> for ViewKind {
    fn from(view: UploaderView) -> Self {
        Self::Uploader(view)
    }
}

impl From<OutputView> for ViewKind {
    fn from(view: OutputView) -> Self {
        Self::Output(view)
    }
}
