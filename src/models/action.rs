use serde::{Deserialize, Serialize};

use super::content::ContentType;
use super::field::FieldPath;
use super::rule::{Capability, TrafficDescriptorType};

/// One user edit, as emitted by a rendered form control.
///
/// Serialized with an `action` tag, e.g.
/// `{"action": "set-descriptor-count", "rule": 0, "count": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum EditorAction {
    SetRuleCount {
        count: usize,
    },
    SetDescriptorCount {
        rule: usize,
        count: usize,
    },
    SetContentCount {
        rule: usize,
        descriptor: usize,
        count: usize,
    },
    SetDescriptorType {
        rule: usize,
        value: TrafficDescriptorType,
    },
    SetContentType {
        rule: usize,
        descriptor: usize,
        content: usize,
        value: ContentType,
    },
    SetField {
        path: FieldPath,
        value: String,
    },
    ToggleCapability {
        rule: usize,
        capability: Capability,
    },
}

impl EditorAction {
    /// Name used in the `data-action` attribute
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::SetRuleCount { .. } => "set-rule-count",
            EditorAction::SetDescriptorCount { .. } => "set-descriptor-count",
            EditorAction::SetContentCount { .. } => "set-content-count",
            EditorAction::SetDescriptorType { .. } => "set-descriptor-type",
            EditorAction::SetContentType { .. } => "set-content-type",
            EditorAction::SetField { .. } => "set-field",
            EditorAction::ToggleCapability { .. } => "toggle-capability",
        }
    }
}

/// When the view should be rebuilt after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rerender {
    /// Rebuild right away
    Immediate,
    /// Rebuild on the next tick, after the current event finished
    Deferred,
    /// Keep the view; the control already shows the change and only the
    /// rule's capability counter needs a new value
    CountOnly,
}
