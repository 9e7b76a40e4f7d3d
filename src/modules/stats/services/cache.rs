use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::modules::stats::models::StatsSnapshot;

/// Process-wide result cache for the low-cardinality stats queries
///
/// An explicit object with injected storage rather than a hidden global:
/// constructed once in `main` and shared behind an `Arc`. Entries never
/// expire on their own; `clear` is the only eviction path and is exposed
/// as an administrative operation. Readers and writers may race; a miss
/// observed concurrently by two callers computes twice and the last
/// writer wins on that key, which is fine for deterministic aggregates.
pub struct StatsCache {
    entries: RwLock<HashMap<String, StatsSnapshot>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a snapshot by its derived key
    pub fn get(&self, key: &str) -> Option<StatsSnapshot> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Store a snapshot under its derived key, replacing any previous one
    pub fn insert(&self, key: String, snapshot: StatsSnapshot) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, snapshot);
    }

    /// Evict every entry unconditionally
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic cache keys, one builder per cacheable operation
///
/// Parameters are canonicalized (ISO dates, numeric ids) so that equal
/// queries always derive the same key.
pub mod cache_key {
    use super::NaiveDate;

    pub fn global_stats() -> String {
        "global_stats".to_string()
    }

    pub fn date_range_stats(start: NaiveDate, end: NaiveDate) -> String {
        format!("date_range_stats_{}_{}", start, end)
    }

    pub fn structure_stats(structure_id: i64) -> String {
        format!("structure_stats_{}", structure_id)
    }
}
