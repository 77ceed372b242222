//! A single node of the compressed trie.
//!
//! Each node owns a fragment of key text relative to its parent, exclusively
//! owns its children, and, when it terminates a key, a map from field to the
//! ids of the records whose value for that field spells the root-to-node path.

use std::collections::{HashMap, HashSet};

use crate::record::{IndexedField, RecordId};

pub(super) struct TrieNode<F> {
    /// Partial key segment relative to the parent. Empty only at the root.
    pub(super) fragment: String,
    /// Exactly one child per distinct next character.
    pub(super) children: HashMap<char, Box<TrieNode<F>>>,
    /// True iff the concatenated fragments from the root spell a full key.
    pub(super) is_key_end: bool,
    /// Field -> record ids ending at this key. `None` unless this node is a
    /// key end (or transiently during restructuring).
    pub(super) entries: Option<HashMap<F, HashSet<RecordId>>>,
}

impl<F: IndexedField> TrieNode<F> {
    pub(super) fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            children: HashMap::new(),
            is_key_end: false,
            entries: None,
        }
    }

    /// Attaches `id` under `field`. Duplicate insertion is a no-op.
    pub(super) fn add_record(&mut self, field: F, id: RecordId) {
        self.entries
            .get_or_insert_with(HashMap::new)
            .entry(field)
            .or_default()
            .insert(id);
    }

    /// Detaches `id` from `field`. An emptied field is dropped from the map,
    /// and an emptied map is dropped entirely.
    pub(super) fn remove_record(&mut self, field: F, id: &str) {
        if let Some(entries) = self.entries.as_mut() {
            if let Some(ids) = entries.get_mut(&field) {
                ids.remove(id);
                if ids.is_empty() {
                    entries.remove(&field);
                }
            }
            if entries.is_empty() {
                self.entries = None;
            }
        }
    }

    pub(super) fn has_records(&self) -> bool {
        self.entries.as_ref().is_some_and(|entries| !entries.is_empty())
    }

    /// The ids stored here for `field`, or the deduplicated union across all
    /// fields when no field is given.
    pub(super) fn records(&self, field: Option<F>) -> HashSet<RecordId> {
        let mut out = HashSet::new();
        self.collect_records(field, &mut out);
        out
    }

    pub(super) fn collect_records(&self, field: Option<F>, out: &mut HashSet<RecordId>) {
        let Some(entries) = self.entries.as_ref() else {
            return;
        };
        match field {
            Some(field) => {
                if let Some(ids) = entries.get(&field) {
                    out.extend(ids.iter().cloned());
                }
            }
            None => {
                for ids in entries.values() {
                    out.extend(ids.iter().cloned());
                }
            }
        }
    }

    /// Splices a lone child into this node: fragments concatenate and the
    /// child's children, key-end flag, and entries are adopted. No-op unless
    /// this node is a non-key-end node with exactly one child.
    pub(super) fn merge_lone_child(&mut self) {
        if self.is_key_end || self.children.len() != 1 {
            return;
        }
        let Some(next) = self.children.keys().next().copied() else {
            return;
        };
        let Some(child) = self.children.remove(&next) else {
            return;
        };
        let child = *child;
        debug_assert!(!child.fragment.is_empty());
        self.fragment.push_str(&child.fragment);
        self.children = child.children;
        self.is_key_end = child.is_key_end;
        self.entries = child.entries;
    }
}
