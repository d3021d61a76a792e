//! Live form state and its reconciliation with the rule store
//!
//! The renderer names every free-text input after its [`FieldPath`]. Anything
//! that can answer "what does the input with this name currently hold" is a
//! [`FormView`]: the browser DOM, a posted form, or a test fixture.

mod binding;
mod reconciler;
mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod dom_wasm;

pub use binding::{ActionBinding, ActionError};
pub use reconciler::{sync_from_view, SyncReport};
pub use snapshot::FormSnapshot;

#[cfg(target_arch = "wasm32")]
pub use dom_wasm::{binding_for, DomView};

use serde::{Deserialize, Serialize};

use crate::models::FieldPath;

/// Current state of one rendered input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldState {
    pub fn enabled(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
        }
    }

    pub fn disabled(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: true,
        }
    }
}

/// Read access to the rendered form
pub trait FormView {
    /// State of the input rendered for `path`, `None` if it is not rendered
    fn field(&self, path: &FieldPath) -> Option<FieldState>;
}
