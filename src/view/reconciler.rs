use log::{debug, warn};

use super::FormView;
use crate::constants::defaults::LOCKED_VALUE;
use crate::models::{FieldPath, RuleStore};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Fields whose live value was written into the store
    pub synced: usize,
    /// Fields with no rendered input, left untouched
    pub skipped: usize,
}

/// Copy live input values back into the store.
///
/// Covers every rule precedence, free-text traffic descriptor value,
/// descriptor precedence and content value. The live value wins over the
/// stored one; a field that is not rendered keeps its stored value, and a
/// disabled content input always yields `-`.
pub fn sync_from_view<V>(store: &mut RuleStore, view: &V) -> SyncReport
where
    V: FormView + ?Sized,
{
    let mut report = SyncReport::default();

    for path in synced_fields(store) {
        let Some(state) = view.field(&path) else {
            debug!("Field {} is not rendered, keeping stored value", path.name());
            report.skipped += 1;
            continue;
        };

        let value = if state.disabled {
            LOCKED_VALUE
        } else {
            state.value.as_str()
        };
        match store.set_field(path, value) {
            Ok(()) => report.synced += 1,
            Err(e) => {
                warn!("Failed to sync field {}: {}", path.name(), e);
                report.skipped += 1;
            }
        }
    }

    debug!(
        "Synced {} field(s) from view, {} skipped",
        report.synced, report.skipped
    );
    report
}

fn synced_fields(store: &RuleStore) -> Vec<FieldPath> {
    let mut paths = Vec::new();

    for (rule, entry) in store.rules().iter().enumerate() {
        paths.push(FieldPath::RulePrecedence { rule });
        if entry.traffic_type.is_free_text() {
            paths.push(FieldPath::TrafficValue { rule });
        }

        let descriptor_count = store.descriptors(rule).map_or(0, <[_]>::len);
        for descriptor in 0..descriptor_count {
            paths.push(FieldPath::DescriptorPrecedence { rule, descriptor });

            let content_count = store.contents(rule, descriptor).map_or(0, <[_]>::len);
            for content in 0..content_count {
                paths.push(FieldPath::ContentValue {
                    rule,
                    descriptor,
                    content,
                });
            }
        }
    }
    paths
}
