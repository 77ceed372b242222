//! Multi-field compressed-trie driver.
//!
//! One shared tree indexes every configured field: keys are raw attribute
//! values, and each key-end node maps field -> record ids. Values shared
//! across fields (say, an identical first and last name) reuse the same
//! branch, so space stays proportional to the set of distinct values.
//!
//! # API
//!
//! - `insert(record)` / `delete(record)` - index or unindex every configured
//!   field of a record
//! - `update(record, field, old_value)` - move one key after a field mutation
//! - `search` / `search_all` / `search_all_prefix` - exact and prefix lookup
//!
//! # Invariants
//!
//! - Compression: no non-key-end node other than the root has exactly one
//!   child; restored after every deletion
//! - Key uniqueness: no two root-to-node paths spell the same string
//! - Case policy: when case-insensitive, every key is folded to lowercase on
//!   insert, lookup, and delete alike

use std::collections::HashSet;

use super::errors::{IndexError, IndexResult};
use super::node::TrieNode;
use crate::record::{IndexedField, Record, RecordId};

/// In-memory index over one or more string-valued fields of a record type.
///
/// Derived state: stores rebuild it by replaying `insert` per record, it is
/// never persisted.
pub struct FieldIndex<F> {
    fields: Vec<F>,
    case_sensitive: bool,
    root: TrieNode<F>,
}

impl<F: IndexedField> FieldIndex<F> {
    /// Creates an empty index over `fields` with the given case policy.
    pub fn new(fields: Vec<F>, case_sensitive: bool) -> Self {
        Self {
            fields,
            case_sensitive,
            root: TrieNode::new(""),
        }
    }

    /// Creates a case-insensitive index over `fields`.
    pub fn case_insensitive(fields: Vec<F>) -> Self {
        Self::new(fields, false)
    }

    pub fn fields(&self) -> &[F] {
        &self.fields
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Indexes `record` under every configured field.
    ///
    /// # Errors
    ///
    /// `IndexError::EmptyKey` if any configured field value folds to the
    /// empty string. The tree is untouched in that case.
    pub fn insert<R: Record<Field = F>>(&mut self, record: &R) -> IndexResult<()> {
        let mut keys = Vec::with_capacity(self.fields.len());
        for &field in &self.fields {
            let key = self.fold(&record.field_value(field));
            if key.is_empty() {
                return Err(IndexError::EmptyKey { field: field.name() });
            }
            keys.push((field, key));
        }
        for (field, key) in keys {
            self.insert_key(&key, field, record.id());
        }
        Ok(())
    }

    /// Unindexes `record` from every configured field, using the record's
    /// current values to locate the keys. Values absent from the tree are
    /// skipped.
    pub fn delete<R: Record<Field = F>>(&mut self, record: &R) {
        let targets: Vec<(F, String)> = self
            .fields
            .iter()
            .map(|&field| (field, self.fold(&record.field_value(field))))
            .collect();
        for (field, key) in targets {
            if !key.is_empty() {
                self.remove_key(&key, field, record.id());
            }
        }
    }

    /// Moves `record`'s key for `field` from `old_value` to the record's
    /// current value. Call immediately after mutating the field, passing the
    /// pre-mutation value; the index cannot detect the change itself.
    ///
    /// # Errors
    ///
    /// `IndexError::EmptyKey` if the current value folds to the empty string;
    /// the old key is left in place.
    pub fn update<R: Record<Field = F>>(
        &mut self,
        record: &R,
        field: F,
        old_value: &str,
    ) -> IndexResult<()> {
        let new_key = self.fold(&record.field_value(field));
        if new_key.is_empty() {
            return Err(IndexError::EmptyKey { field: field.name() });
        }
        let old_key = self.fold(old_value);
        if !old_key.is_empty() {
            self.remove_key(&old_key, field, record.id());
        }
        self.insert_key(&new_key, field, record.id());
        Ok(())
    }

    /// First record id whose `field` value (any field when `None`) exactly
    /// equals `query`. Match choice among equals is unspecified.
    pub fn search(&self, query: &str, field: Option<F>) -> Option<RecordId> {
        self.search_all(query, field).into_iter().next()
    }

    /// All record ids whose value exactly equals `query`. A query that
    /// matches no stored key returns the empty set.
    pub fn search_all(&self, query: &str, field: Option<F>) -> HashSet<RecordId> {
        let key = self.fold(query);
        match self.find_key_node(&key) {
            Some(node) => node.records(field),
            None => HashSet::new(),
        }
    }

    /// All record ids whose value starts with `prefix`. The empty prefix
    /// matches every stored key.
    pub fn search_all_prefix(&self, prefix: &str, field: Option<F>) -> HashSet<RecordId> {
        let key = self.fold(prefix);
        let mut out = HashSet::new();
        if let Some(start) = self.find_prefix_node(&key) {
            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                if node.is_key_end {
                    node.collect_records(field, &mut out);
                }
                stack.extend(node.children.values().map(|child| &**child));
            }
        }
        out
    }

    /// Number of distinct keys currently stored.
    pub fn key_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.is_key_end {
                count += 1;
            }
            stack.extend(node.children.values().map(|child| &**child));
        }
        count
    }

    /// Number of nodes in the tree, excluding the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<_> = self.root.children.values().map(|child| &**child).collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values().map(|child| &**child));
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    fn fold(&self, raw: &str) -> String {
        if self.case_sensitive {
            raw.to_string()
        } else {
            raw.to_lowercase()
        }
    }

    /// Iterative descent attaching `(field, id)` at the key-end node for
    /// `key`, creating leaves and splitting fragments as needed.
    fn insert_key(&mut self, key: &str, field: F, id: &str) {
        use std::collections::hash_map::Entry;

        let mut node = &mut self.root;
        let mut i = 0;
        while i < key.len() {
            let Some(next) = key[i..].chars().next() else {
                return;
            };
            match node.children.entry(next) {
                Entry::Vacant(slot) => {
                    // No branch for this character: the key's remainder
                    // becomes a new leaf.
                    let mut leaf = TrieNode::new(&key[i..]);
                    leaf.is_key_end = true;
                    leaf.add_record(field, id.to_string());
                    slot.insert(Box::new(leaf));
                    return;
                }
                Entry::Occupied(slot) => {
                    let child = slot.into_mut().as_mut();
                    let shared = common_prefix_len(&child.fragment, &key[i..]);
                    if shared < child.fragment.len() {
                        // Divergence mid-fragment: split the child. The
                        // suffix beyond the shared prefix moves to a new node
                        // that inherits the child's children and entries.
                        let suffix = child.fragment.split_off(shared);
                        let mut lower = TrieNode::new(suffix);
                        lower.is_key_end = child.is_key_end;
                        lower.children = std::mem::take(&mut child.children);
                        lower.entries = child.entries.take();
                        child.is_key_end = false;
                        if let Some(first) = lower.fragment.chars().next() {
                            child.children.insert(first, Box::new(lower));
                        }

                        i += shared;
                        if i == key.len() {
                            // The shrunk child now spells the key exactly.
                            child.is_key_end = true;
                            child.add_record(field, id.to_string());
                        } else {
                            let mut leaf = TrieNode::new(&key[i..]);
                            leaf.is_key_end = true;
                            leaf.add_record(field, id.to_string());
                            if let Some(first) = key[i..].chars().next() {
                                child.children.insert(first, Box::new(leaf));
                            }
                        }
                        return;
                    }

                    // Full fragment match: consume it and keep descending.
                    i += shared;
                    if i == key.len() {
                        child.is_key_end = true;
                        child.add_record(field, id.to_string());
                        return;
                    }
                    node = child;
                }
            }
        }
    }

    fn remove_key(&mut self, key: &str, field: F, id: &str) {
        // The root is exempt from removal and merging; a false return here
        // is simply discarded.
        remove_rec(&mut self.root, key, 0, field, id);
    }

    /// Descends consuming `key` exactly; lands on the key-end node for `key`
    /// or nothing. Partial consumption of a longer stored key is not a match.
    fn find_key_node(&self, key: &str) -> Option<&TrieNode<F>> {
        let mut node = &self.root;
        let mut i = 0;
        while i < key.len() {
            let next = key[i..].chars().next()?;
            let child = node.children.get(&next)?.as_ref();
            if !key[i..].starts_with(child.fragment.as_str()) {
                return None;
            }
            i += child.fragment.len();
            node = child;
            if i == key.len() {
                return node.is_key_end.then_some(node);
            }
        }
        None
    }

    /// Descends consuming `prefix`; returns the shallowest node whose
    /// root-to-node path starts with (or is extended by) the whole prefix.
    fn find_prefix_node(&self, prefix: &str) -> Option<&TrieNode<F>> {
        let mut node = &self.root;
        let mut i = 0;
        while i < prefix.len() {
            let next = prefix[i..].chars().next()?;
            let child = node.children.get(&next)?.as_ref();
            node = child;
            let rest = &prefix[i..];
            if child.fragment.len() > rest.len() {
                // The node sits partway down a still-matching branch.
                return child.fragment.starts_with(rest).then_some(node);
            }
            if !rest.starts_with(child.fragment.as_str()) {
                return None;
            }
            i += child.fragment.len();
        }
        Some(node)
    }
}

/// Recursive deletion. Returns true when `node` should be unlinked by its
/// parent (no children left and not a key end). Compression is restored one
/// level at a time as the recursion unwinds: each frame re-checks the child
/// it descended into, so a node that lost its key-end flag or a grandchild
/// gets its lone child spliced in.
fn remove_rec<F: IndexedField>(
    node: &mut TrieNode<F>,
    key: &str,
    i: usize,
    field: F,
    id: &str,
) -> bool {
    if i == key.len() {
        if !node.is_key_end {
            // The key is not stored here; nothing to delete.
            return false;
        }
        node.remove_record(field, id);
        if node.has_records() {
            return false;
        }
        node.is_key_end = false;
        return node.children.is_empty();
    }

    let Some(next) = key[i..].chars().next() else {
        return false;
    };
    let Some(child) = node.children.get_mut(&next) else {
        return false;
    };
    let shared = common_prefix_len(&child.fragment, &key[i..]);
    if shared != child.fragment.len() {
        return false;
    }

    if remove_rec(child.as_mut(), key, i + shared, field, id) {
        node.children.remove(&next);
    } else if let Some(child) = node.children.get_mut(&next) {
        child.merge_lone_child();
    }
    node.children.is_empty() && !node.is_key_end
}

/// Byte length of the longest shared character prefix of `a` and `b`.
/// Identical characters encode identically, so the result indexes both
/// strings at a character boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, ac), bc)| ac != bc)
        .map(|((pos, _), _)| pos)
        .unwrap_or_else(|| a.len().min(b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Contact, ContactField};

    fn contact(id: &str, first: &str, last: &str) -> Contact {
        Contact::new(id.to_string(), first, last, "0000000000", "1 Elm St").unwrap()
    }

    fn name_index() -> FieldIndex<ContactField> {
        FieldIndex::case_insensitive(vec![ContactField::FirstName, ContactField::LastName])
    }

    /// Walks the tree asserting the compression and entries-placement
    /// invariants hold for every node.
    fn assert_well_formed(index: &FieldIndex<ContactField>) {
        fn walk(node: &TrieNode<ContactField>, is_root: bool) {
            if !is_root {
                assert!(!node.fragment.is_empty(), "non-root node with empty fragment");
                assert!(
                    node.is_key_end || node.children.len() != 1,
                    "non-key-end node {:?} has exactly one child",
                    node.fragment
                );
            }
            assert_eq!(node.is_key_end, node.has_records());
            for (first, child) in &node.children {
                assert_eq!(child.fragment.chars().next(), Some(*first));
                walk(child, false);
            }
        }
        walk(&index.root, true);
    }

    #[test]
    fn insert_then_exact_search_round_trips() {
        let mut index = name_index();
        let alice = contact("0", "Alice", "Smith");
        index.insert(&alice).unwrap();

        assert_eq!(index.search("alice", None), Some("0".to_string()));
        assert!(index.search_all("smith", Some(ContactField::LastName)).contains("0"));
        assert_well_formed(&index);
    }

    #[test]
    fn case_insensitive_fold_applies_to_queries_too() {
        let mut index = name_index();
        index.insert(&contact("0", "Alice", "Smith")).unwrap();

        assert!(index.search("ALICE", None).is_some());
        assert!(index.search("AlIcE", Some(ContactField::FirstName)).is_some());
    }

    #[test]
    fn case_sensitive_index_distinguishes_keys() {
        let mut index = FieldIndex::new(vec![ContactField::FirstName], true);
        index.insert(&contact("0", "Alice", "Smith")).unwrap();

        assert!(index.search("Alice", None).is_some());
        assert!(index.search("alice", None).is_none());
    }

    #[test]
    fn exact_search_does_not_match_superstring_key() {
        let mut index = name_index();
        index.insert(&contact("0", "Alexander", "Smith")).unwrap();

        assert!(index.search("alex", Some(ContactField::FirstName)).is_none());
        assert!(index.search("alexander", Some(ContactField::FirstName)).is_some());
    }

    #[test]
    fn exact_search_does_not_match_substring_key() {
        let mut index = name_index();
        index.insert(&contact("0", "Alex", "Smith")).unwrap();

        assert!(index.search("alexander", Some(ContactField::FirstName)).is_none());
    }

    #[test]
    fn divergent_keys_split_a_fragment() {
        let mut index = name_index();
        index.insert(&contact("0", "Mara", "Stone")).unwrap();
        index.insert(&contact("1", "Mark", "Stern")).unwrap();

        assert!(index.search_all("mara", Some(ContactField::FirstName)).contains("0"));
        assert!(index.search_all("mark", Some(ContactField::FirstName)).contains("1"));
        assert_well_formed(&index);
    }

    #[test]
    fn split_preserves_key_end_on_shrunk_node() {
        let mut index = name_index();
        index.insert(&contact("0", "Johnny", "Stone")).unwrap();
        index.insert(&contact("1", "John", "Stern")).unwrap();

        // "john" lands mid-fragment of "johnny" and must become a key end.
        assert!(index.search_all("john", Some(ContactField::FirstName)).contains("1"));
        assert!(index.search_all("johnny", Some(ContactField::FirstName)).contains("0"));
        assert_well_formed(&index);
    }

    #[test]
    fn shared_value_across_fields_reuses_the_branch() {
        let mut index = name_index();
        // First name of one record equals last name of the other.
        index.insert(&contact("0", "Morgan", "Lee")).unwrap();
        index.insert(&contact("1", "Lee", "Morgan")).unwrap();

        let by_first = index.search_all("morgan", Some(ContactField::FirstName));
        let by_last = index.search_all("morgan", Some(ContactField::LastName));
        let by_any = index.search_all("morgan", None);
        assert!(by_first.contains("0"));
        assert!(by_last.contains("1"));
        assert_eq!(by_any.len(), 2);
        assert_well_formed(&index);
    }

    /// Record stub whose last name is blank, bypassing entity validation.
    struct BlankLastName;

    impl Record for BlankLastName {
        type Field = ContactField;
        const FIELDS: &'static [ContactField] =
            &[ContactField::FirstName, ContactField::LastName];

        fn id(&self) -> &str {
            "0"
        }

        fn field_value(&self, field: ContactField) -> String {
            match field {
                ContactField::FirstName => "Alice".to_string(),
                _ => String::new(),
            }
        }

        fn update_field(
            &mut self,
            _field: ContactField,
            _value: &str,
        ) -> Result<(), crate::validate::ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn empty_field_value_is_rejected_without_mutating() {
        let mut index = name_index();

        assert_eq!(
            index.insert(&BlankLastName),
            Err(IndexError::EmptyKey { field: "last_name" })
        );
        assert!(index.is_empty());
    }

    #[test]
    fn delete_removes_all_field_keys() {
        let mut index = name_index();
        let alice = contact("0", "Alice", "Smith");
        index.insert(&alice).unwrap();
        index.delete(&alice);

        assert!(index.search("alice", None).is_none());
        assert!(index.search("smith", None).is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn delete_collapses_prefix_chain() {
        let mut index = name_index();
        let john = contact("0", "John", "Stone");
        let johnny = contact("1", "Johnny", "Stern");
        index.insert(&john).unwrap();
        index.insert(&johnny).unwrap();

        index.delete(&john);

        assert!(index.search("john", Some(ContactField::FirstName)).is_none());
        assert!(index.search_all("johnny", Some(ContactField::FirstName)).contains("1"));
        assert_well_formed(&index);
    }

    #[test]
    fn delete_leaves_sibling_branches_intact() {
        let mut index = name_index();
        let mara = contact("0", "Mara", "Stone");
        let mark = contact("1", "Mark", "Stern");
        index.insert(&mara).unwrap();
        index.insert(&mark).unwrap();

        index.delete(&mara);

        assert!(index.search("mara", None).is_none());
        assert!(index.search_all("mark", Some(ContactField::FirstName)).contains("1"));
        assert_well_formed(&index);
    }

    #[test]
    fn delete_of_shared_key_keeps_remaining_record() {
        let mut index = name_index();
        let a = contact("0", "Mara", "Stone");
        let b = contact("1", "Mara", "Stern");
        index.insert(&a).unwrap();
        index.insert(&b).unwrap();

        index.delete(&a);

        let remaining = index.search_all("mara", Some(ContactField::FirstName));
        assert_eq!(remaining.len(), 1);
        assert!(remaining.contains("1"));
        assert_well_formed(&index);
    }

    #[test]
    fn delete_missing_key_is_a_no_op() {
        let mut index = name_index();
        index.insert(&contact("0", "Alice", "Smith")).unwrap();

        index.delete(&contact("9", "Zelda", "Quinn"));
        assert!(index.search_all("alice", None).contains("0"));
        assert_well_formed(&index);
    }

    #[test]
    fn update_moves_the_key() {
        let mut index = name_index();
        let mut alice = contact("0", "Alice", "Smith");
        index.insert(&alice).unwrap();

        alice
            .update_field(ContactField::FirstName, "Alicia")
            .unwrap();
        index
            .update(&alice, ContactField::FirstName, "Alice")
            .unwrap();

        assert!(index.search("alice", Some(ContactField::FirstName)).is_none());
        assert!(index.search_all("alicia", Some(ContactField::FirstName)).contains("0"));
        assert_well_formed(&index);
    }

    #[test]
    fn prefix_search_returns_whole_subtree() {
        let mut index = name_index();
        index.insert(&contact("0", "John", "Stone")).unwrap();
        index.insert(&contact("1", "Johnny", "Stern")).unwrap();
        index.insert(&contact("2", "Joan", "Stark")).unwrap();

        let jo = index.search_all_prefix("jo", Some(ContactField::FirstName));
        assert_eq!(jo.len(), 3);
        let john = index.search_all_prefix("john", Some(ContactField::FirstName));
        assert_eq!(john.len(), 2);
        assert!(john.contains("0") && john.contains("1"));
    }

    #[test]
    fn prefix_ending_mid_fragment_still_matches() {
        let mut index = name_index();
        index.insert(&contact("0", "Alexander", "Smith")).unwrap();

        let hits = index.search_all_prefix("alex", Some(ContactField::FirstName));
        assert!(hits.contains("0"));
    }

    #[test]
    fn prefix_with_no_matches_returns_empty() {
        let mut index = name_index();
        index.insert(&contact("0", "Alice", "Smith")).unwrap();

        assert!(index.search_all_prefix("bob", None).is_empty());
        assert!(index.search_all_prefix("alz", None).is_empty());
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let mut index = name_index();
        index.insert(&contact("0", "Alice", "Smith")).unwrap();
        index.insert(&contact("1", "Bob", "Jones")).unwrap();

        assert_eq!(index.search_all_prefix("", None).len(), 2);
    }

    #[test]
    fn empty_query_finds_nothing() {
        let mut index = name_index();
        index.insert(&contact("0", "Alice", "Smith")).unwrap();

        assert!(index.search("", None).is_none());
        assert!(index.search_all("", None).is_empty());
    }

    #[test]
    fn counts_track_keys_and_nodes() {
        let mut index = FieldIndex::case_insensitive(vec![ContactField::FirstName]);
        let john = contact("0", "John", "Stone");
        let johnny = contact("1", "Johnny", "Stern");
        index.insert(&john).unwrap();
        index.insert(&johnny).unwrap();

        // "john" -> "ny" chain: two nodes, two keys.
        assert_eq!(index.key_count(), 2);
        assert_eq!(index.node_count(), 2);

        index.delete(&john);
        // Chain collapsed to a single "johnny" node.
        assert_eq!(index.key_count(), 1);
        assert_eq!(index.node_count(), 1);
    }

    #[test]
    fn interleaved_mutations_keep_the_tree_compressed() {
        let mut index = name_index();
        let roster = [
            ("0", "Romane", "Stone"),
            ("1", "Romanus", "Stern"),
            ("2", "Rubens", "Stark"),
            ("3", "Ruber", "Quinn"),
            ("4", "Rubicon", "Smith"),
            ("5", "Rubicundus", "Jones"),
        ];
        let contacts: Vec<Contact> = roster
            .iter()
            .map(|&(id, first, last)| contact(id, first, last))
            .collect();

        for c in &contacts {
            index.insert(c).unwrap();
            assert_well_formed(&index);
        }
        for c in contacts.iter().step_by(2) {
            index.delete(c);
            assert_well_formed(&index);
        }
        for c in contacts.iter().step_by(2) {
            index.insert(c).unwrap();
            assert_well_formed(&index);
        }
        for c in &contacts {
            index.delete(c);
            assert_well_formed(&index);
        }
        assert!(index.is_empty());
    }

    #[test]
    fn common_prefix_len_is_a_byte_offset_on_char_boundaries() {
        assert_eq!(common_prefix_len("abroad", "abraham"), 3);
        assert_eq!(common_prefix_len("abc", "abc"), 3);
        assert_eq!(common_prefix_len("abc", "xyz"), 0);
        assert_eq!(common_prefix_len("", "abc"), 0);
        // Two-byte characters: "éé" vs "éx" share one char, two bytes.
        assert_eq!(common_prefix_len("éé", "éx"), 2);
    }
}
