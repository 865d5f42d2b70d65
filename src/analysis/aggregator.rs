//! Per-actor anomaly aggregation.
//!
//! Events are grouped by actor and each actor is classified by whether
//! every value it was seen with belongs to the reference set. The same
//! grouping drives suspicious-login detection, and `merge_by_key` backs the
//! admin merge used by stale-admin detection.

use crate::analysis::ReferenceSet;
use crate::models::Event;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregated view of one actor's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorRecord {
    pub actor: String,
    /// True while every observed value is in the reference set. Never goes
    /// back to true once false.
    pub clear: bool,
    /// Observed values, first seen to last seen.
    pub observed: Vec<String>,
}

impl ActorRecord {
    fn first(event: &Event, reference: &ReferenceSet) -> Self {
        Self {
            actor: event.actor.clone(),
            clear: reference.contains(&event.value),
            observed: vec![event.value.clone()],
        }
    }

    fn observe(&mut self, value: &str, reference: &ReferenceSet) {
        self.clear = self.clear && reference.contains(value);
        self.observed.push(value.to_string());
    }

    pub fn is_flagged(&self) -> bool {
        !self.clear
    }
}

/// Group events by actor and classify each actor against `reference`.
pub fn aggregate(events: &[Event], reference: &ReferenceSet) -> BTreeMap<String, ActorRecord> {
    let mut records: BTreeMap<String, ActorRecord> = BTreeMap::new();

    for event in events {
        match records.entry(event.actor.clone()) {
            Entry::Occupied(mut slot) => slot.get_mut().observe(&event.value, reference),
            Entry::Vacant(slot) => {
                slot.insert(ActorRecord::first(event, reference));
            }
        }
    }

    records
}

/// Records with at least one out-of-reference value, ordered by actor.
pub fn flagged(records: &BTreeMap<String, ActorRecord>) -> Vec<&ActorRecord> {
    records.values().filter(|r| r.is_flagged()).collect()
}

/// Merge several result lists, keeping the first item seen for each key.
///
/// Output order is first-seen order across the lists.
pub fn merge_by_key<T, K, F>(lists: Vec<Vec<T>>, key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut seen = BTreeSet::new();
    let mut merged = Vec::new();

    for item in lists.into_iter().flatten() {
        if seen.insert(key(&item)) {
            merged.push(item);
        }
    }

    merged
}
