use serde::{Deserialize, Serialize};

/// Address of a free-text field inside the rule tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "kebab-case")]
pub enum FieldPath {
    RulePrecedence {
        rule: usize,
    },
    TrafficValue {
        rule: usize,
    },
    DescriptorPrecedence {
        rule: usize,
        descriptor: usize,
    },
    ContentValue {
        rule: usize,
        descriptor: usize,
        content: usize,
    },
}

impl FieldPath {
    /// Form field name the renderer gives this field.
    ///
    /// The name doubles as the lookup key for reading the live value back.
    pub fn name(&self) -> String {
        match self {
            FieldPath::RulePrecedence { rule } => format!("ursp-{}-pv", rule),
            FieldPath::TrafficValue { rule } => format!("ursp-{}-td", rule),
            FieldPath::DescriptorPrecedence { rule, descriptor } => {
                format!("rsd-{}-{}-pv", rule, descriptor)
            }
            FieldPath::ContentValue {
                rule,
                descriptor,
                content,
            } => format!("rsd-{}-{}-{}-val", rule, descriptor, content),
        }
    }

    /// Parse a form field name produced by [`FieldPath::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('-').collect();
        let index = |i: usize| parts.get(i).and_then(|p| p.parse::<usize>().ok());

        match parts.as_slice() {
            ["ursp", _, "pv"] => Some(FieldPath::RulePrecedence { rule: index(1)? }),
            ["ursp", _, "td"] => Some(FieldPath::TrafficValue { rule: index(1)? }),
            ["rsd", _, _, "pv"] => Some(FieldPath::DescriptorPrecedence {
                rule: index(1)?,
                descriptor: index(2)?,
            }),
            ["rsd", _, _, _, "val"] => Some(FieldPath::ContentValue {
                rule: index(1)?,
                descriptor: index(2)?,
                content: index(3)?,
            }),
            _ => None,
        }
    }
}
