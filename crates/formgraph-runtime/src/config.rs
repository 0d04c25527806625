#![forbid(unsafe_code)]

//! Controller configuration.
//!
//! Defaults reproduce the plain pull-based behavior: outputs obey apply
//! gating like every other control, and an Apply control is synthesized
//! when some control requires one.
//!
//! # Environment
//!
//! | Variable | Field | Accepted |
//! |----------|-------|----------|
//! | `FORMGRAPH_OUTPUTS_ALWAYS_FRESH` | `outputs_always_fresh` | `1` / `true` / `0` / `false` |
//! | `FORMGRAPH_SYNTHESIZE_APPLY` | `synthesize_apply` | `1` / `true` / `0` / `false` |
//! | `FORMGRAPH_APPLY_LABEL` | `apply_label` | any string |
//!
//! Unset or unparsable flags keep their defaults.

use std::env;

use serde::Deserialize;

pub const ENV_OUTPUTS_ALWAYS_FRESH: &str = "FORMGRAPH_OUTPUTS_ALWAYS_FRESH";
pub const ENV_SYNTHESIZE_APPLY: &str = "FORMGRAPH_SYNTHESIZE_APPLY";
pub const ENV_APPLY_LABEL: &str = "FORMGRAPH_APPLY_LABEL";

/// Default label of the synthesized Apply control.
pub const DEFAULT_APPLY_LABEL: &str = "Apply";

/// Recomputation policy switches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Output and markdown controls recompute on every pass, ignoring
    /// their apply gate.
    pub outputs_always_fresh: bool,
    /// Add an Apply control when one is required and none was declared.
    pub synthesize_apply: bool,
    /// Label of the synthesized Apply control.
    pub apply_label: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            outputs_always_fresh: false,
            synthesize_apply: true,
            apply_label: DEFAULT_APPLY_LABEL.to_owned(),
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn with_outputs_always_fresh(mut self, enabled: bool) -> Self {
        self.outputs_always_fresh = enabled;
        self
    }

    #[must_use]
    pub fn with_synthesize_apply(mut self, enabled: bool) -> Self {
        self.synthesize_apply = enabled;
        self
    }

    #[must_use]
    pub fn with_apply_label(mut self, label: impl Into<String>) -> Self {
        self.apply_label = label.into();
        self
    }

    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`, starting from the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(flag) = lookup(ENV_OUTPUTS_ALWAYS_FRESH).as_deref().and_then(parse_flag) {
            config.outputs_always_fresh = flag;
        }
        if let Some(flag) = lookup(ENV_SYNTHESIZE_APPLY).as_deref().and_then(parse_flag) {
            config.synthesize_apply = flag;
        }
        if let Some(label) = lookup(ENV_APPLY_LABEL) {
            config.apply_label = label;
        }
        config
    }

    /// Parse from a JSON settings object. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
