//! Core data model of the URSP editor
//!
//! A rule set is a tree of URSP rules, route selection descriptors (RSD)
//! and RSD contents. [`RuleStore`] owns it as three position-aligned tables
//! and is the only place that mutates it.
//!
//! ```rust
//! use ursp_editor::models::{ContentType, RuleStore};
//!
//! let mut store = RuleStore::new();
//! store.set_rule_count(2);
//! store.set_content_type(1, 0, 0, ContentType::SNssai).unwrap();
//! assert_eq!(store.content(1, 0, 0).unwrap().value, "SST 1 + SD 1");
//! ```

mod action;
mod content;
mod descriptor;
mod field;
mod precedence;
mod rule;
mod sections;
mod store;

#[cfg(feature = "web-api")]
pub mod app_state;

pub use action::{EditorAction, Rerender};
pub use content::{content_id, Content, ContentType};
pub use descriptor::{descriptor_id, Descriptor};
pub use field::FieldPath;
pub use precedence::next_precedence;
pub use rule::{
    join_capabilities, parse_capabilities, rule_id, Capability, Rule, TrafficDescriptorType,
};
pub use sections::{ContentRow, DescriptorRow, RuleRow, RuleSet, Sections};
pub use store::{IntegrityFault, Limits, RuleStore, StoreError};

#[cfg(feature = "web-api")]
pub use app_state::AppState;
