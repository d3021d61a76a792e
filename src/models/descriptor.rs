use serde::{Deserialize, Serialize};

/// Route selection descriptor. Its contents live in the store's content
/// table at the same rule/descriptor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Precedence value as typed by the user
    pub precedence: String,
    /// Number of content entries owned by this descriptor
    pub content_count: usize,
}

impl Descriptor {
    pub fn new(precedence: String) -> Self {
        Self {
            precedence,
            content_count: 1,
        }
    }
}

/// Display identifier of a route selection descriptor
pub fn descriptor_id(rule: usize, descriptor: usize) -> String {
    format!("RSD_{}_{}", rule, descriptor)
}
