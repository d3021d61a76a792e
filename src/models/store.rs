use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::{EditorAction, Rerender};
use super::content::{content_id, Content, ContentType};
use super::descriptor::{descriptor_id, Descriptor};
use super::field::FieldPath;
use super::precedence::next_precedence;
use super::rule::{rule_id, Capability, Rule, TrafficDescriptorType};
use super::sections::{ContentRow, DescriptorRow, RuleRow, Sections};
use crate::constants::defaults::{DEFAULT_MAX_COUNT, LOCKED_VALUE, MIN_COUNT};

/// Upper bounds of the three count inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_rules: usize,
    pub max_descriptors: usize,
    pub max_contents: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_COUNT,
            max_descriptors: DEFAULT_MAX_COUNT,
            max_contents: DEFAULT_MAX_COUNT,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("URSP rule {0} does not exist")]
    RuleNotFound(usize),

    #[error("RSD {0}_{1} does not exist")]
    DescriptorNotFound(usize, usize),

    #[error("RSD content {0}_{1}_{2} does not exist")]
    ContentNotFound(usize, usize, usize),
}

/// Structural defect found in a store loaded from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFault {
    /// A rule has no descriptor table
    MissingDescriptors { rule: usize },
    /// A descriptor has no content table
    MissingContents { rule: usize, descriptor: usize },
    /// A stored count disagrees with the rows it counts
    DescriptorCountMismatch {
        rule: usize,
        stored: usize,
        actual: usize,
    },
    ContentCountMismatch {
        rule: usize,
        descriptor: usize,
        stored: usize,
        actual: usize,
    },
    /// More tables than rules or descriptors to own them
    OrphanRows { rule: usize },
}

/// In-memory URSP rule set.
///
/// Rules, descriptors and contents sit in three parallel tables aligned by
/// position: `descriptors[i]` belongs to `rules[i]` and `contents[i][j]` to
/// `descriptors[i][j]`. Every operation keeps the tables the same shape and
/// the stored counts equal to the row counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStore {
    rules: Vec<Rule>,
    descriptors: Vec<Vec<Descriptor>>,
    contents: Vec<Vec<Vec<Content>>>,
    limits: Limits,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    /// Create a store holding one default rule
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        let mut store = Self {
            rules: Vec::new(),
            descriptors: Vec::new(),
            contents: Vec::new(),
            limits,
        };
        store.push_rule();
        debug!("URSP store initialized with one default rule");
        store
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule(&self, rule: usize) -> Option<&Rule> {
        self.rules.get(rule)
    }

    /// Descriptors of one rule, `None` when the table is missing
    pub fn descriptors(&self, rule: usize) -> Option<&[Descriptor]> {
        self.descriptors.get(rule).map(Vec::as_slice)
    }

    pub fn descriptor(&self, rule: usize, descriptor: usize) -> Option<&Descriptor> {
        self.descriptors.get(rule)?.get(descriptor)
    }

    /// Contents of one descriptor, `None` when the table is missing
    pub fn contents(&self, rule: usize, descriptor: usize) -> Option<&[Content]> {
        self.contents
            .get(rule)?
            .get(descriptor)
            .map(Vec::as_slice)
    }

    pub fn content(&self, rule: usize, descriptor: usize, content: usize) -> Option<&Content> {
        self.contents.get(rule)?.get(descriptor)?.get(content)
    }

    /// Next free precedence among all rules
    pub fn next_rule_precedence(&self) -> String {
        next_precedence(self.rules.iter().map(|r| r.precedence.as_str()))
    }

    /// Resize the rule list, returning the count actually applied
    pub fn set_rule_count(&mut self, count: usize) -> usize {
        let count = clamp_count(count, self.limits.max_rules, "URSP rule");
        let current = self.rules.len();

        if count > current {
            self.align_rule_tables();
            for _ in current..count {
                self.push_rule();
            }
            debug!("Added {} URSP rule(s)", count - current);
        } else if count < current {
            self.rules.truncate(count);
            self.descriptors.truncate(count);
            self.contents.truncate(count);
            debug!("Removed {} URSP rule(s)", current - count);
        }
        count
    }

    /// Resize the descriptor list of one rule
    pub fn set_descriptor_count(&mut self, rule: usize, count: usize) -> Result<usize, StoreError> {
        let count = clamp_count(count, self.limits.max_descriptors, "RSD");
        let (owner, descriptors, contents) = self.rule_tables_mut(rule)?;
        let current = descriptors.len();

        if count > current {
            if contents.len() != current {
                warn!(
                    "Realigning content tables of URSP rule {} to {} RSD(s)",
                    rule, current
                );
                contents.resize_with(current, Vec::new);
            }
            for _ in current..count {
                let precedence = next_precedence(descriptors.iter().map(|d| d.precedence.as_str()));
                descriptors.push(Descriptor::new(precedence));
                contents.push(vec![Content::default()]);
            }
            debug!("Added {} RSD(s) to URSP rule {}", count - current, rule);
        } else if count < current {
            descriptors.truncate(count);
            contents.truncate(count);
            debug!("Removed {} RSD(s) from URSP rule {}", current - count, rule);
        }

        owner.descriptor_count = count;
        Ok(count)
    }

    /// Resize the content list of one descriptor
    pub fn set_content_count(
        &mut self,
        rule: usize,
        descriptor: usize,
        count: usize,
    ) -> Result<usize, StoreError> {
        let count = clamp_count(count, self.limits.max_contents, "RSD content");
        let owner = self
            .descriptors
            .get_mut(rule)
            .and_then(|d| d.get_mut(descriptor))
            .ok_or(StoreError::DescriptorNotFound(rule, descriptor))?;
        let contents = self
            .contents
            .get_mut(rule)
            .and_then(|c| c.get_mut(descriptor))
            .ok_or(StoreError::DescriptorNotFound(rule, descriptor))?;
        let current = contents.len();

        if count > current {
            contents.resize_with(count, Content::default);
            debug!(
                "Added {} content(s) to RSD {}_{}",
                count - current,
                rule,
                descriptor
            );
        } else if count < current {
            contents.truncate(count);
            debug!(
                "Removed {} content(s) from RSD {}_{}",
                current - count,
                rule,
                descriptor
            );
        }

        owner.content_count = count;
        Ok(count)
    }

    /// Switch a rule's traffic descriptor type, resetting its value
    pub fn set_descriptor_type(
        &mut self,
        rule: usize,
        traffic_type: TrafficDescriptorType,
    ) -> Result<(), StoreError> {
        let owner = self
            .rules
            .get_mut(rule)
            .ok_or(StoreError::RuleNotFound(rule))?;
        owner.set_traffic_type(traffic_type);
        debug!(
            "URSP rule {} traffic descriptor set to {} ({})",
            rule, traffic_type, owner.traffic_value
        );
        Ok(())
    }

    /// Switch a content entry's type, resetting its value
    pub fn set_content_type(
        &mut self,
        rule: usize,
        descriptor: usize,
        content: usize,
        content_type: ContentType,
    ) -> Result<(), StoreError> {
        let entry = self
            .contents
            .get_mut(rule)
            .and_then(|c| c.get_mut(descriptor))
            .and_then(|c| c.get_mut(content))
            .ok_or(StoreError::ContentNotFound(rule, descriptor, content))?;
        entry.set_type(content_type);
        debug!(
            "RSD content {}_{}_{} type set to {}",
            rule, descriptor, content, content_type
        );
        Ok(())
    }

    /// Write a free-text field. Values are stored as given.
    ///
    /// Writes to a field locked by its type (match-all value, zero-value
    /// content) are ignored so the forced value survives.
    pub fn set_field(&mut self, path: FieldPath, value: &str) -> Result<(), StoreError> {
        match path {
            FieldPath::RulePrecedence { rule } => {
                let owner = self
                    .rules
                    .get_mut(rule)
                    .ok_or(StoreError::RuleNotFound(rule))?;
                owner.precedence = value.to_string();
            }
            FieldPath::TrafficValue { rule } => {
                let owner = self
                    .rules
                    .get_mut(rule)
                    .ok_or(StoreError::RuleNotFound(rule))?;
                if owner.traffic_type.is_locked() {
                    debug!("Ignoring write to locked traffic value of URSP rule {}", rule);
                } else {
                    owner.traffic_value = value.to_string();
                }
            }
            FieldPath::DescriptorPrecedence { rule, descriptor } => {
                let entry = self
                    .descriptors
                    .get_mut(rule)
                    .and_then(|d| d.get_mut(descriptor))
                    .ok_or(StoreError::DescriptorNotFound(rule, descriptor))?;
                entry.precedence = value.to_string();
            }
            FieldPath::ContentValue {
                rule,
                descriptor,
                content,
            } => {
                let entry = self
                    .contents
                    .get_mut(rule)
                    .and_then(|c| c.get_mut(descriptor))
                    .and_then(|c| c.get_mut(content))
                    .ok_or(StoreError::ContentNotFound(rule, descriptor, content))?;
                if entry.is_editable() {
                    entry.value = value.to_string();
                } else {
                    debug!(
                        "Ignoring write to zero-value content {}_{}_{}",
                        rule, descriptor, content
                    );
                    entry.value = LOCKED_VALUE.to_string();
                }
            }
        }
        Ok(())
    }

    /// Flip one connection capability, returning the selected count
    pub fn toggle_capability(
        &mut self,
        rule: usize,
        capability: Capability,
    ) -> Result<usize, StoreError> {
        let owner = self
            .rules
            .get_mut(rule)
            .ok_or(StoreError::RuleNotFound(rule))?;
        if owner.traffic_type != TrafficDescriptorType::ConnectionCapabilities {
            warn!(
                "Capability toggled on URSP rule {} whose descriptor is {}",
                rule, owner.traffic_type
            );
        }
        let selected = owner.toggle_capability(capability);
        debug!(
            "Connection capabilities of URSP rule {}: {}",
            rule, owner.traffic_value
        );
        Ok(selected)
    }

    /// Apply one editor action
    pub fn apply(&mut self, action: &EditorAction) -> Result<Rerender, StoreError> {
        match action {
            EditorAction::SetRuleCount { count } => {
                self.set_rule_count(*count);
            }
            EditorAction::SetDescriptorCount { rule, count } => {
                self.set_descriptor_count(*rule, *count)?;
            }
            EditorAction::SetContentCount {
                rule,
                descriptor,
                count,
            } => {
                self.set_content_count(*rule, *descriptor, *count)?;
                return Ok(Rerender::Deferred);
            }
            EditorAction::SetDescriptorType { rule, value } => {
                self.set_descriptor_type(*rule, *value)?;
            }
            EditorAction::SetContentType {
                rule,
                descriptor,
                content,
                value,
            } => {
                self.set_content_type(*rule, *descriptor, *content, *value)?;
            }
            EditorAction::SetField { path, value } => {
                self.set_field(*path, value)?;
            }
            EditorAction::ToggleCapability { rule, capability } => {
                self.toggle_capability(*rule, *capability)?;
                return Ok(Rerender::CountOnly);
            }
        }
        Ok(Rerender::Immediate)
    }

    /// Flatten into the positional tables the encoder expects
    pub fn sections(&self) -> Sections {
        let ursp_sum = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                RuleRow(
                    rule_id(i),
                    rule.precedence.clone(),
                    rule.traffic_type,
                    rule.traffic_value.clone(),
                    rule.descriptor_count,
                )
            })
            .collect();

        let rsd_sum = self
            .descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptors)| {
                descriptors
                    .iter()
                    .enumerate()
                    .map(|(j, d)| DescriptorRow(descriptor_id(i, j), d.precedence.clone(), d.content_count))
                    .collect()
            })
            .collect();

        let rsd_conts = self
            .contents
            .iter()
            .enumerate()
            .map(|(i, per_rule)| {
                per_rule
                    .iter()
                    .enumerate()
                    .map(|(j, per_descriptor)| {
                        per_descriptor
                            .iter()
                            .enumerate()
                            .map(|(k, c)| {
                                ContentRow(content_id(i, j, k), c.content_type, c.value.clone())
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Sections {
            ursp_sum,
            rsd_sum,
            rsd_conts,
        }
    }

    /// Load a store from the encoder's positional tables.
    ///
    /// Row identifiers are dropped (they are regenerated from position) and
    /// the shape is taken as is: a malformed rule set stays malformed and is
    /// reported through [`RuleStore::integrity_faults`].
    pub fn from_sections(sections: Sections, limits: Limits) -> Self {
        let rules = sections
            .ursp_sum
            .into_iter()
            .map(|RuleRow(_, precedence, traffic_type, traffic_value, descriptor_count)| Rule {
                precedence,
                traffic_type,
                traffic_value,
                descriptor_count,
            })
            .collect();

        let descriptors = sections
            .rsd_sum
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|DescriptorRow(_, precedence, content_count)| Descriptor {
                        precedence,
                        content_count,
                    })
                    .collect()
            })
            .collect();

        let contents = sections
            .rsd_conts
            .into_iter()
            .map(|per_rule| {
                per_rule
                    .into_iter()
                    .map(|per_descriptor| {
                        per_descriptor
                            .into_iter()
                            .map(|ContentRow(_, content_type, value)| Content { content_type, value })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let store = Self {
            rules,
            descriptors,
            contents,
            limits,
        };
        for fault in store.integrity_faults() {
            error!("Loaded URSP rule set is malformed: {:?}", fault);
        }
        store
    }

    /// List every place where the three tables disagree
    pub fn integrity_faults(&self) -> Vec<IntegrityFault> {
        let mut faults = Vec::new();

        for (i, rule) in self.rules.iter().enumerate() {
            let Some(descriptors) = self.descriptors.get(i) else {
                faults.push(IntegrityFault::MissingDescriptors { rule: i });
                continue;
            };
            if rule.descriptor_count != descriptors.len() {
                faults.push(IntegrityFault::DescriptorCountMismatch {
                    rule: i,
                    stored: rule.descriptor_count,
                    actual: descriptors.len(),
                });
            }
            for (j, descriptor) in descriptors.iter().enumerate() {
                match self.contents(i, j) {
                    None => faults.push(IntegrityFault::MissingContents {
                        rule: i,
                        descriptor: j,
                    }),
                    Some(contents) if contents.len() != descriptor.content_count => {
                        faults.push(IntegrityFault::ContentCountMismatch {
                            rule: i,
                            descriptor: j,
                            stored: descriptor.content_count,
                            actual: contents.len(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        let owned = self.rules.len();
        if self.descriptors.len() > owned || self.contents.len() > owned {
            faults.push(IntegrityFault::OrphanRows { rule: owned });
        }

        faults
    }

    /// Drop orphan tables and give rules without one an empty table, so
    /// rows pushed next line up with their rule
    fn align_rule_tables(&mut self) {
        let rules = self.rules.len();
        if self.descriptors.len() != rules || self.contents.len() != rules {
            warn!("Realigning URSP tables to {} rule(s)", rules);
            self.descriptors.resize_with(rules, Vec::new);
            self.contents.resize_with(rules, Vec::new);
        }
    }

    fn push_rule(&mut self) {
        let precedence = self.next_rule_precedence();
        self.rules.push(Rule::new(precedence));
        self.descriptors
            .push(vec![Descriptor::new(next_precedence(std::iter::empty()))]);
        self.contents.push(vec![vec![Content::default()]]);
    }

    fn rule_tables_mut(
        &mut self,
        rule: usize,
    ) -> Result<(&mut Rule, &mut Vec<Descriptor>, &mut Vec<Vec<Content>>), StoreError> {
        match (
            self.rules.get_mut(rule),
            self.descriptors.get_mut(rule),
            self.contents.get_mut(rule),
        ) {
            (Some(owner), Some(descriptors), Some(contents)) => Ok((owner, descriptors, contents)),
            _ => Err(StoreError::RuleNotFound(rule)),
        }
    }
}

fn clamp_count(requested: usize, max: usize, what: &str) -> usize {
    let max = max.max(MIN_COUNT);
    let clamped = requested.clamp(MIN_COUNT, max);
    if clamped != requested {
        warn!(
            "{} count {} out of range {}..={}, using {}",
            what, requested, MIN_COUNT, max, clamped
        );
    }
    clamped
}
