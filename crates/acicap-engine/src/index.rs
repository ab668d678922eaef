//! In-memory class index with cross-dataset dedup.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use acicap_core::{Attributes, ManagedObject};

const NO_RECORDS: &[Attributes] = &[];

/// Class-keyed record store built once during ingestion.
///
/// Records keep ingestion order. Dedup is keyed on `(class, dn)` when the
/// record carries a dn, else on the canonical attribute serialization; the
/// first record inserted for a key wins, which makes descriptor dataset
/// order the tie-break between overlapping export snapshots.
#[derive(Debug, Default)]
pub struct ClassIndex {
    by_class: HashMap<String, Vec<Attributes>>,
    raw_counts: HashMap<String, u64>,
    seen: HashSet<(String, String)>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a normalized record; returns false when the dedup key was
    /// already seen. The raw per-class counter advances either way.
    pub fn insert(&mut self, record: ManagedObject) -> bool {
        *self.raw_counts.entry(record.class.clone()).or_default() += 1;

        let key = match record.dn() {
            Some(dn) => (record.class.clone(), dn.to_string()),
            None => (
                record.class.clone(),
                serde_json::to_string(&record.attributes).unwrap_or_default(),
            ),
        };
        if !self.seen.insert(key) {
            return false;
        }

        self.by_class
            .entry(record.class)
            .or_default()
            .push(record.attributes);
        true
    }

    /// Stored records for a class; empty for classes never seen.
    pub fn records(&self, class: &str) -> &[Attributes] {
        self.by_class
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(NO_RECORDS)
    }

    /// Deduplicated record count for a class.
    pub fn count(&self, class: &str) -> u64 {
        self.records(class).len() as u64
    }

    /// Raw record count for a class, duplicates included.
    pub fn raw_count(&self, class: &str) -> u64 {
        self.raw_counts.get(class).copied().unwrap_or(0)
    }

    /// Raw per-class counters in deterministic order.
    pub fn raw_counts(&self) -> BTreeMap<String, u64> {
        self.raw_counts
            .iter()
            .map(|(class, count)| (class.clone(), *count))
            .collect()
    }

    /// Distinct hierarchical identifiers for a class; dn-less records are
    /// excluded.
    pub fn unique_dn_count(&self, class: &str) -> u64 {
        let dns: BTreeSet<&str> = self
            .records(class)
            .iter()
            .filter_map(|attributes| attributes.get("dn"))
            .filter(|dn| !dn.is_empty())
            .map(String::as_str)
            .collect();
        dns.len() as u64
    }
}
