//! Final aggregation: relevance filter and order-preserving dedupe

use rinkside_common::GameRecord;
use std::collections::HashSet;

/// Apply the text relevance filter and deduplicate by id.
///
/// Records without an id are dropped unconditionally. Duplicated ids
/// keep their first occurrence; input order is preserved and nothing
/// is sorted.
pub fn finalize(records: Vec<GameRecord>, text_filters: &[String]) -> Vec<GameRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        let Some(id) = record.id.clone() else {
            continue;
        };
        if !matches_any_filter(&record, text_filters) {
            continue;
        }
        if seen.insert(id) {
            kept.push(record);
        }
    }

    kept
}

/// Loose any-field text search: upstream team naming is inconsistent
/// across shapes, so a structured team-name match would miss records.
fn matches_any_filter(record: &GameRecord, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let haystack = serde_json::to_string(record)
        .unwrap_or_default()
        .to_lowercase();
    filters
        .iter()
        .any(|filter| haystack.contains(&filter.to_lowercase()))
}
