use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::defaults::{LOCKED_VALUE, S_NSSAI_TEMPLATE};

/// Type of a route selection descriptor content entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "SSC mode")]
    SscMode,
    #[serde(rename = "S-NSSAI")]
    SNssai,
    #[serde(rename = "DNN")]
    Dnn,
    #[serde(rename = "Access type")]
    AccessType,
    #[serde(rename = "Multi-access preference")]
    MultiAccessPreference,
    #[serde(rename = "Non-seamless non-3GPP offload indication")]
    NonSeamlessOffload,
    #[serde(rename = "5G ProSe layer-3 UE-to-network relay offload indication")]
    ProseRelayOffload,
    #[serde(rename = "PDU session type")]
    PduSessionType,
    #[serde(rename = "Preferred access type")]
    PreferredAccessType,
    #[serde(rename = "PDU session pair ID")]
    PduSessionPairId,
    #[serde(rename = "RSN")]
    Rsn,
}

impl ContentType {
    /// Every content type, in the order the type selector lists them
    pub const ALL: [ContentType; 11] = [
        ContentType::SscMode,
        ContentType::SNssai,
        ContentType::Dnn,
        ContentType::AccessType,
        ContentType::MultiAccessPreference,
        ContentType::NonSeamlessOffload,
        ContentType::ProseRelayOffload,
        ContentType::PduSessionType,
        ContentType::PreferredAccessType,
        ContentType::PduSessionPairId,
        ContentType::Rsn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::SscMode => "SSC mode",
            ContentType::SNssai => "S-NSSAI",
            ContentType::Dnn => "DNN",
            ContentType::AccessType => "Access type",
            ContentType::MultiAccessPreference => "Multi-access preference",
            ContentType::NonSeamlessOffload => "Non-seamless non-3GPP offload indication",
            ContentType::ProseRelayOffload => {
                "5G ProSe layer-3 UE-to-network relay offload indication"
            }
            ContentType::PduSessionType => "PDU session type",
            ContentType::PreferredAccessType => "Preferred access type",
            ContentType::PduSessionPairId => "PDU session pair ID",
            ContentType::Rsn => "RSN",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Zero-value types are encoded without a value field
    pub fn is_zero_value(&self) -> bool {
        matches!(
            self,
            ContentType::MultiAccessPreference
                | ContentType::NonSeamlessOffload
                | ContentType::ProseRelayOffload
        )
    }

    /// Value a content entry takes right after switching to this type
    pub fn default_value(&self) -> String {
        if self.is_zero_value() {
            LOCKED_VALUE.to_string()
        } else if *self == ContentType::SNssai {
            S_NSSAI_TEMPLATE.to_string()
        } else {
            String::new()
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed parameter of a route selection descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub content_type: ContentType,
    pub value: String,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            content_type: ContentType::SscMode,
            value: String::new(),
        }
    }
}

impl Content {
    /// Switch the content type, resetting the value to the type default
    pub fn set_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
        self.value = content_type.default_value();
    }

    /// Whether the value input accepts user input
    pub fn is_editable(&self) -> bool {
        !self.content_type.is_zero_value()
    }
}

/// Display identifier of a content entry
pub fn content_id(rule: usize, descriptor: usize, content: usize) -> String {
    format!("RSD_{}_{}_{}", rule, descriptor, content)
}
