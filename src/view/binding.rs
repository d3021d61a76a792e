use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Capability, ContentType, EditorAction, FieldPath, TrafficDescriptorType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unknown editor action: {0}")]
    UnknownAction(String),

    #[error("Editor action {action} has no {attribute} binding")]
    MissingBinding {
        action: String,
        attribute: &'static str,
    },

    #[error("Invalid count: {0:?}")]
    InvalidCount(String),

    #[error("Unknown option: {0:?}")]
    UnknownOption(String),

    #[error("Unknown form field: {0:?}")]
    UnknownField(String),
}

/// Attributes the renderer puts on an interactive control.
///
/// `action` comes from `data-action`, the indices from `data-rule`,
/// `data-descriptor` and `data-content`, `capability` from
/// `data-capability` and `name` from the input's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub action: String,
    #[serde(default)]
    pub rule: Option<usize>,
    #[serde(default)]
    pub descriptor: Option<usize>,
    #[serde(default)]
    pub content: Option<usize>,
    #[serde(default)]
    pub capability: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ActionBinding {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    /// Turn a committed control value into the edit it stands for
    pub fn to_action(&self, value: &str) -> Result<EditorAction, ActionError> {
        match self.action.as_str() {
            "set-rule-count" => Ok(EditorAction::SetRuleCount {
                count: parse_count(value)?,
            }),
            "set-descriptor-count" => Ok(EditorAction::SetDescriptorCount {
                rule: self.index(self.rule, "rule")?,
                count: parse_count(value)?,
            }),
            "set-content-count" => Ok(EditorAction::SetContentCount {
                rule: self.index(self.rule, "rule")?,
                descriptor: self.index(self.descriptor, "descriptor")?,
                count: parse_count(value)?,
            }),
            "set-descriptor-type" => Ok(EditorAction::SetDescriptorType {
                rule: self.index(self.rule, "rule")?,
                value: TrafficDescriptorType::from_str(value)
                    .ok_or_else(|| ActionError::UnknownOption(value.to_string()))?,
            }),
            "set-content-type" => Ok(EditorAction::SetContentType {
                rule: self.index(self.rule, "rule")?,
                descriptor: self.index(self.descriptor, "descriptor")?,
                content: self.index(self.content, "content")?,
                value: ContentType::from_str(value)
                    .ok_or_else(|| ActionError::UnknownOption(value.to_string()))?,
            }),
            "set-field" => {
                let name = self.name.as_deref().ok_or_else(|| self.missing("name"))?;
                let path = FieldPath::from_name(name)
                    .ok_or_else(|| ActionError::UnknownField(name.to_string()))?;
                Ok(EditorAction::SetField {
                    path,
                    value: value.to_string(),
                })
            }
            "toggle-capability" => {
                let name = self
                    .capability
                    .as_deref()
                    .ok_or_else(|| self.missing("capability"))?;
                Ok(EditorAction::ToggleCapability {
                    rule: self.index(self.rule, "rule")?,
                    capability: Capability::from_str(name)
                        .ok_or_else(|| ActionError::UnknownOption(name.to_string()))?,
                })
            }
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }

    fn index(&self, index: Option<usize>, attribute: &'static str) -> Result<usize, ActionError> {
        index.ok_or_else(|| self.missing(attribute))
    }

    fn missing(&self, attribute: &'static str) -> ActionError {
        ActionError::MissingBinding {
            action: self.action.clone(),
            attribute,
        }
    }
}

fn parse_count(value: &str) -> Result<usize, ActionError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ActionError::InvalidCount(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_binding() {
        let binding = ActionBinding {
            rule: Some(1),
            descriptor: Some(0),
            ..ActionBinding::new("set-content-count")
        };
        assert_eq!(
            binding.to_action(" 3 "),
            Ok(EditorAction::SetContentCount {
                rule: 1,
                descriptor: 0,
                count: 3
            })
        );
        assert_eq!(
            binding.to_action("-1"),
            Err(ActionError::InvalidCount("-1".to_string()))
        );
    }

    #[test]
    fn test_field_binding_uses_name() {
        let binding = ActionBinding {
            name: Some("rsd-0-1-pv".to_string()),
            ..ActionBinding::new("set-field")
        };
        assert_eq!(
            binding.to_action("5"),
            Ok(EditorAction::SetField {
                path: FieldPath::DescriptorPrecedence {
                    rule: 0,
                    descriptor: 1
                },
                value: "5".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_and_unknown() {
        assert_eq!(
            ActionBinding::new("set-descriptor-type").to_action("DNN"),
            Err(ActionError::MissingBinding {
                action: "set-descriptor-type".to_string(),
                attribute: "rule"
            })
        );
        let binding = ActionBinding {
            rule: Some(0),
            ..ActionBinding::new("set-descriptor-type")
        };
        assert_eq!(
            binding.to_action("IP 3 tuple"),
            Err(ActionError::UnknownOption("IP 3 tuple".to_string()))
        );
        assert!(matches!(
            ActionBinding::new("drop-table").to_action(""),
            Err(ActionError::UnknownAction(_))
        ));
    }
}
