use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::defaults::{
    CAPABILITY_SEPARATOR, LOCKED_VALUE, NO_CAPABILITY_SELECTED, OS_APP_ID_PLACEHOLDER,
};

/// Match condition of a URSP rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficDescriptorType {
    #[serde(rename = "Match-all")]
    MatchAll,
    #[serde(rename = "OS Id + OS App Id")]
    OsAppId,
    #[serde(rename = "DNN")]
    Dnn,
    #[serde(rename = "Connection capabilities")]
    ConnectionCapabilities,
}

impl TrafficDescriptorType {
    /// Every descriptor type, in the order the type selector lists them
    pub const ALL: [TrafficDescriptorType; 4] = [
        TrafficDescriptorType::MatchAll,
        TrafficDescriptorType::OsAppId,
        TrafficDescriptorType::Dnn,
        TrafficDescriptorType::ConnectionCapabilities,
    ];

    /// Get the name the backend and the type selector use
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficDescriptorType::MatchAll => "Match-all",
            TrafficDescriptorType::OsAppId => "OS Id + OS App Id",
            TrafficDescriptorType::Dnn => "DNN",
            TrafficDescriptorType::ConnectionCapabilities => "Connection capabilities",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Value a rule takes right after switching to this type
    pub fn default_value(&self) -> String {
        match self {
            TrafficDescriptorType::MatchAll => LOCKED_VALUE.to_string(),
            TrafficDescriptorType::OsAppId => OS_APP_ID_PLACEHOLDER.to_string(),
            TrafficDescriptorType::Dnn => String::new(),
            TrafficDescriptorType::ConnectionCapabilities => join_capabilities(&Capability::ALL),
        }
    }

    /// Match-all carries no value the user may edit
    pub fn is_locked(&self) -> bool {
        matches!(self, TrafficDescriptorType::MatchAll)
    }

    /// Whether the value is edited through a plain text input
    pub fn is_free_text(&self) -> bool {
        matches!(
            self,
            TrafficDescriptorType::OsAppId | TrafficDescriptorType::Dnn
        )
    }
}

impl fmt::Display for TrafficDescriptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection capability offered by the Connection capabilities descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "IMS")]
    Ims,
    #[serde(rename = "MMS")]
    Mms,
    #[serde(rename = "SUPL")]
    Supl,
    #[serde(rename = "Internet")]
    Internet,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Ims,
        Capability::Mms,
        Capability::Supl,
        Capability::Internet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Ims => "IMS",
            Capability::Mms => "MMS",
            Capability::Supl => "SUPL",
            Capability::Internet => "Internet",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Capability code from TS 24.526
    pub fn code(&self) -> u8 {
        match self {
            Capability::Ims => 0x01,
            Capability::Mms => 0x02,
            Capability::Supl => 0x04,
            Capability::Internet => 0x08,
        }
    }
}

/// Parse a joined capability value into the capabilities it selects.
///
/// Unknown tokens (including the "None selected" marker) are dropped and the
/// result is in canonical order without duplicates.
pub fn parse_capabilities(value: &str) -> Vec<Capability> {
    let tokens: Vec<&str> = value.split(',').map(str::trim).collect();
    Capability::ALL
        .into_iter()
        .filter(|cap| tokens.contains(&cap.as_str()))
        .collect()
}

/// Join capabilities into a traffic descriptor value
pub fn join_capabilities(capabilities: &[Capability]) -> String {
    let names: Vec<&str> = Capability::ALL
        .into_iter()
        .filter(|cap| capabilities.contains(cap))
        .map(|cap| cap.as_str())
        .collect();
    if names.is_empty() {
        NO_CAPABILITY_SELECTED.to_string()
    } else {
        names.join(CAPABILITY_SEPARATOR)
    }
}

/// One URSP rule. Its route selection descriptors live in the store's
/// descriptor table at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Precedence value as typed by the user
    pub precedence: String,
    /// Traffic descriptor type
    pub traffic_type: TrafficDescriptorType,
    /// Traffic descriptor value, meaning depends on `traffic_type`
    pub traffic_value: String,
    /// Number of route selection descriptors owned by this rule
    pub descriptor_count: usize,
}

impl Rule {
    /// Create a match-all rule owning a single descriptor
    pub fn new(precedence: String) -> Self {
        Self {
            precedence,
            traffic_type: TrafficDescriptorType::MatchAll,
            traffic_value: TrafficDescriptorType::MatchAll.default_value(),
            descriptor_count: 1,
        }
    }

    /// Switch the traffic descriptor type, resetting its value
    pub fn set_traffic_type(&mut self, traffic_type: TrafficDescriptorType) {
        self.traffic_type = traffic_type;
        self.traffic_value = traffic_type.default_value();
    }

    /// Capabilities currently selected (empty unless the rule matches on them)
    pub fn capabilities(&self) -> Vec<Capability> {
        match self.traffic_type {
            TrafficDescriptorType::ConnectionCapabilities => {
                parse_capabilities(&self.traffic_value)
            }
            _ => Vec::new(),
        }
    }

    /// Add or remove one capability, returning how many remain selected
    pub fn toggle_capability(&mut self, capability: Capability) -> usize {
        let mut selected = parse_capabilities(&self.traffic_value);
        if let Some(pos) = selected.iter().position(|c| *c == capability) {
            selected.remove(pos);
        } else {
            selected.push(capability);
        }
        self.traffic_value = join_capabilities(&selected);
        selected.len()
    }
}

/// Display identifier of the rule at `index`
pub fn rule_id(index: usize) -> String {
    format!("URSP_{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_per_type() {
        assert_eq!(TrafficDescriptorType::MatchAll.default_value(), "-");
        assert_eq!(
            TrafficDescriptorType::OsAppId.default_value(),
            "Android/OS_APP_Id"
        );
        assert_eq!(TrafficDescriptorType::Dnn.default_value(), "");
        assert_eq!(
            TrafficDescriptorType::ConnectionCapabilities.default_value(),
            "IMS, MMS, SUPL, Internet"
        );
    }

    #[test]
    fn test_type_names_round_trip() {
        for t in TrafficDescriptorType::ALL {
            assert_eq!(TrafficDescriptorType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(TrafficDescriptorType::from_str("match-all"), None);
    }

    #[test]
    fn test_parse_capabilities_ignores_marker_and_unknown() {
        assert!(parse_capabilities("None selected").is_empty());
        assert_eq!(
            parse_capabilities("Internet, IMS, bogus"),
            vec![Capability::Ims, Capability::Internet]
        );
    }

    #[test]
    fn test_toggle_capability_keeps_canonical_order() {
        let mut rule = Rule::new("1".to_string());
        rule.set_traffic_type(TrafficDescriptorType::ConnectionCapabilities);

        assert_eq!(rule.toggle_capability(Capability::Mms), 3);
        assert_eq!(rule.traffic_value, "IMS, SUPL, Internet");

        assert_eq!(rule.toggle_capability(Capability::Mms), 4);
        assert_eq!(rule.traffic_value, "IMS, MMS, SUPL, Internet");

        for cap in Capability::ALL {
            rule.toggle_capability(cap);
        }
        assert_eq!(rule.traffic_value, "None selected");
        assert!(rule.capabilities().is_empty());
    }

    #[test]
    fn test_capability_codes() {
        let codes: Vec<u8> = Capability::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![0x01, 0x02, 0x04, 0x08]);
    }
}
