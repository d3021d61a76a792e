use log::error;
use serde::Serialize;

use crate::models::{
    content_id, descriptor_id, rule_id, Capability, Content, ContentType, Descriptor, FieldPath,
    Rule, RuleStore, TrafficDescriptorType,
};

const VALUE_PLACEHOLDER: &str = "Enter value";

/// Everything the rule container template needs, flattened out of the store
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub rule_count: usize,
    pub max_rules: usize,
    pub max_descriptors: usize,
    pub max_contents: usize,
    pub traffic_types: Vec<&'static str>,
    pub content_types: Vec<&'static str>,
    pub rules: Vec<RuleCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleCard {
    pub index: usize,
    pub id: String,
    pub precedence: String,
    pub precedence_field: String,
    pub traffic_type: &'static str,
    pub traffic_value: String,
    pub value_field: String,
    /// `locked`, `capabilities` or `text`
    pub value_widget: &'static str,
    pub capabilities: Vec<CapabilityOption>,
    pub selected_count: usize,
    pub descriptor_count: usize,
    pub descriptors: Vec<DescriptorCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityOption {
    pub name: &'static str,
    pub code: u8,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptorCard {
    pub index: usize,
    pub id: String,
    pub precedence: String,
    pub precedence_field: String,
    pub content_count: usize,
    pub contents: Vec<ContentCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentCard {
    pub index: usize,
    pub id: String,
    pub content_type: &'static str,
    pub value: String,
    pub value_field: String,
    pub disabled: bool,
    pub placeholder: &'static str,
}

impl EditorView {
    pub fn from_store(store: &RuleStore) -> Self {
        let limits = store.limits();
        let rules = store
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| rule_card(store, i, rule))
            .collect();

        Self {
            rule_count: store.rule_count(),
            max_rules: limits.max_rules,
            max_descriptors: limits.max_descriptors,
            max_contents: limits.max_contents,
            traffic_types: TrafficDescriptorType::ALL.iter().map(|t| t.as_str()).collect(),
            content_types: ContentType::ALL.iter().map(|t| t.as_str()).collect(),
            rules,
        }
    }
}

fn rule_card(store: &RuleStore, index: usize, rule: &Rule) -> RuleCard {
    let descriptors = match store.descriptors(index) {
        Some(descriptors) => descriptors
            .iter()
            .enumerate()
            .map(|(j, d)| descriptor_card(store, index, j, d))
            .collect(),
        None => {
            error!("URSP rule {} has no RSD table, rendering it empty", index);
            Vec::new()
        }
    };

    let selected = rule.capabilities();
    let capabilities = Capability::ALL
        .into_iter()
        .map(|cap| CapabilityOption {
            name: cap.as_str(),
            code: cap.code(),
            checked: selected.contains(&cap),
        })
        .collect();

    let value_widget = match rule.traffic_type {
        TrafficDescriptorType::MatchAll => "locked",
        TrafficDescriptorType::ConnectionCapabilities => "capabilities",
        TrafficDescriptorType::OsAppId | TrafficDescriptorType::Dnn => "text",
    };

    RuleCard {
        index,
        id: rule_id(index),
        precedence: rule.precedence.clone(),
        precedence_field: FieldPath::RulePrecedence { rule: index }.name(),
        traffic_type: rule.traffic_type.as_str(),
        traffic_value: rule.traffic_value.clone(),
        value_field: FieldPath::TrafficValue { rule: index }.name(),
        value_widget,
        capabilities,
        selected_count: selected.len(),
        descriptor_count: rule.descriptor_count,
        descriptors,
    }
}

fn descriptor_card(
    store: &RuleStore,
    rule: usize,
    index: usize,
    descriptor: &Descriptor,
) -> DescriptorCard {
    let contents = match store.contents(rule, index) {
        Some(contents) => contents
            .iter()
            .enumerate()
            .map(|(k, c)| content_card(rule, index, k, c))
            .collect(),
        None => {
            error!(
                "RSD {}_{} has no content table, rendering it empty",
                rule, index
            );
            Vec::new()
        }
    };

    DescriptorCard {
        index,
        id: descriptor_id(rule, index),
        precedence: descriptor.precedence.clone(),
        precedence_field: FieldPath::DescriptorPrecedence {
            rule,
            descriptor: index,
        }
        .name(),
        content_count: descriptor.content_count,
        contents,
    }
}

fn content_card(rule: usize, descriptor: usize, index: usize, content: &Content) -> ContentCard {
    let disabled = !content.is_editable();
    ContentCard {
        index,
        id: content_id(rule, descriptor, index),
        content_type: content.content_type.as_str(),
        value: content.value.clone(),
        value_field: FieldPath::ContentValue {
            rule,
            descriptor,
            content: index,
        }
        .name(),
        disabled,
        placeholder: if disabled { "-" } else { VALUE_PLACEHOLDER },
    }
}
