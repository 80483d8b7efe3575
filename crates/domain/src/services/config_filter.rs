//! Config record filtering by environment and sensitivity.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::models::{ConfigEnvironment, ConfigRecord};

/// Records that apply in `target`: those tagged `target` or `all`.
///
/// Order is preserved.
pub fn filter_by_environment(
    records: &[ConfigRecord],
    target: ConfigEnvironment,
) -> Vec<ConfigRecord> {
    records
        .iter()
        .filter(|r| r.environment.applies_to(target))
        .cloned()
        .collect()
}

/// All records when `include_sensitive`, otherwise only non-sensitive ones.
///
/// Order is preserved.
pub fn filter_sensitive(records: &[ConfigRecord], include_sensitive: bool) -> Vec<ConfigRecord> {
    records
        .iter()
        .filter(|r| include_sensitive || !r.is_sensitive)
        .cloned()
        .collect()
}

/// Effective non-sensitive key/value map for `target`.
///
/// A record tagged with `target` overrides an `all` record with the same key.
pub fn resolve_config(
    records: &[ConfigRecord],
    target: ConfigEnvironment,
) -> BTreeMap<String, JsonValue> {
    let visible = filter_sensitive(&filter_by_environment(records, target), false);

    let mut values = BTreeMap::new();
    for record in visible.iter().filter(|r| r.environment == ConfigEnvironment::All) {
        values.insert(record.config_key.clone(), record.config_value.clone());
    }
    for record in visible.iter().filter(|r| r.environment != ConfigEnvironment::All) {
        values.insert(record.config_key.clone(), record.config_value.clone());
    }
    values
}
