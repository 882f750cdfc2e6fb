//! First-seen dense id assignment for barcodes and peak regions.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// A genomic peak region used as a matrix column key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeakKey {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl fmt::Display for PeakKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Append-only mapping from keys to dense integer ids.
///
/// Ids are assigned 0, 1, 2, ... in first-seen order and never reassigned
/// or removed, so the ordered key list doubles as the matrix row/column
/// metadata table. A single sequential consumer owns and mutates the index
/// while iterating the fragment stream exactly once.
#[derive(Debug, Clone)]
pub struct DenseIndex<K> {
    ids: FxHashMap<K, u32>,
    keys: Vec<K>,
}

/// Row index mapping cell barcodes to dense ids.
pub type BarcodeIndex = DenseIndex<String>;

/// Column index mapping peak regions to dense ids.
pub type PeakIndex = DenseIndex<PeakKey>;

impl<K: Eq + Hash + Clone> DenseIndex<K> {
    pub fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Return the id for `key`, assigning the next unused id on first sight.
    pub fn intern(&mut self, key: &K) -> u32 {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        let id = self.keys.len() as u32;
        self.ids.insert(key.clone(), id);
        self.keys.push(key.clone());
        id
    }

    /// Lookup the id for a key if it has been seen.
    pub fn get(&self, key: &K) -> Option<u32> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in id order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Consume the index, returning the keys in id order.
    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

impl<K: Eq + Hash + Clone> Default for DenseIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_dense_ids_in_first_seen_order() {
        let mut index = BarcodeIndex::new();
        assert_eq!(index.intern(&"AAAA".to_string()), 0);
        assert_eq!(index.intern(&"CCCC".to_string()), 1);
        assert_eq!(index.intern(&"GGGG".to_string()), 2);
        assert_eq!(index.keys(), ["AAAA", "CCCC", "GGGG"]);
    }

    #[test]
    fn reencountering_a_key_never_changes_its_id() {
        let mut index = BarcodeIndex::new();
        index.intern(&"AAAA".to_string());
        index.intern(&"CCCC".to_string());
        assert_eq!(index.intern(&"AAAA".to_string()), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn peak_keys_display_as_region_strings() {
        let peak = PeakKey {
            chrom: "chr1".to_string(),
            start: 1000,
            end: 1200,
        };
        assert_eq!(peak.to_string(), "chr1:1000-1200");
    }
}
