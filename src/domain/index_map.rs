// ============================================================
// Layer 3 — Identifier Index
// ============================================================
// Maps raw identifiers ("42", "user_7", ...) onto the dense
// range [0, N) used as embedding-table rows.
//
// Indices are handed out in first-observed order, so building
// from the same sequence always yields the same mapping. The
// map is persisted next to the model weights; serving loads it
// verbatim instead of rebuilding it from some other file.
//
// On disk it is just the ordered list of raw ids: position in
// the list IS the index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IdIndex {
    ids:    Vec<String>,
    lookup: HashMap<String, usize>,
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from identifiers in observation order.
    /// Repeats are ignored after their first occurrence.
    pub fn from_observed<I, S>(observed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for id in observed {
            index.insert(id.as_ref());
        }
        index
    }

    /// Return the index for `id`, assigning the next free one if unseen.
    pub fn insert(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.lookup.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.to_string());
        self.lookup.insert(id.to_string(), idx);
        idx
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    /// Inverse lookup: the raw identifier behind a dense index.
    pub fn raw(&self, idx: usize) -> Option<&str> {
        self.ids.get(idx).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl From<Vec<String>> for IdIndex {
    fn from(ids: Vec<String>) -> Self {
        Self::from_observed(ids)
    }
}

impl From<IdIndex> for Vec<String> {
    fn from(index: IdIndex) -> Self {
        index.ids
    }
}
