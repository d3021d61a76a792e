//! Flat positional shape the encoder backend consumes.
//!
//! Each row is a tuple struct so it serializes as a JSON array, matching
//! `ursp_sum`, `rsd_sum` and `rsd_conts` of the `/encode` request.

use serde::{Deserialize, Serialize};

use super::content::ContentType;
use super::rule::TrafficDescriptorType;

/// `[ruleId, precedence, descriptorType, descriptorValue, descriptorCount]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow(
    pub String,
    pub String,
    pub TrafficDescriptorType,
    pub String,
    pub usize,
);

/// `[descId, precedence, contentCount]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRow(pub String, pub String, pub usize);

/// `[contId, type, value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow(pub String, pub ContentType, pub String);

/// The three aligned tables of a rule set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default)]
    pub ursp_sum: Vec<RuleRow>,
    #[serde(default)]
    pub rsd_sum: Vec<Vec<DescriptorRow>>,
    #[serde(default)]
    pub rsd_conts: Vec<Vec<Vec<ContentRow>>>,
}

/// Rule-set file: the encode request body with optional session context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plmn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsc: Option<String>,
    #[serde(flatten)]
    pub sections: Sections,
}

impl RuleSet {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
