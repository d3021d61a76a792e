use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{FieldState, FormView};
use crate::models::FieldPath;

/// Form state captured outside a live DOM, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    fields: HashMap<String, FieldState>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from submitted `name=value` pairs.
    ///
    /// Browsers leave disabled inputs out of a submission, so every pair is
    /// recorded as enabled. Names that are not editor fields are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .filter(|(name, _)| FieldPath::from_name(name.as_ref()).is_some())
            .map(|(name, value)| (name.as_ref().to_string(), FieldState::enabled(value)))
            .collect();
        Self { fields }
    }

    pub fn insert(&mut self, path: FieldPath, state: FieldState) {
        self.fields.insert(path.name(), state);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FormView for FormSnapshot {
    fn field(&self, path: &FieldPath) -> Option<FieldState> {
        self.fields.get(&path.name()).cloned()
    }
}
