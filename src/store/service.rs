//! Record store: the authoritative id -> record map plus its derived index.
//!
//! Every mutation goes through the store so the index never drifts: inserts
//! index the record's field values, removals unindex them, and field updates
//! hand the index the pre-mutation value so it can move the key.

use std::collections::HashMap;

use super::errors::{StoreError, StoreResult};
use super::id::IdSequence;
use crate::index::FieldIndex;
use crate::observability::{emit, Severity};
use crate::record::{IndexedField, Record, RecordId};

/// In-memory store for one record type, indexed on `T::FIELDS`.
pub struct RecordStore<T: Record> {
    records: HashMap<RecordId, T>,
    index: FieldIndex<T::Field>,
    ids: IdSequence,
}

impl<T: Record> RecordStore<T> {
    /// Creates an empty, case-insensitive store.
    pub fn new() -> Self {
        Self::with_case_sensitivity(false)
    }

    /// Creates an empty store with an explicit index case policy.
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            records: HashMap::new(),
            index: FieldIndex::new(T::FIELDS.to_vec(), case_sensitive),
            ids: IdSequence::new(),
        }
    }

    /// Hands out the id for the next record to be constructed.
    pub fn next_id(&mut self) -> StoreResult<RecordId> {
        self.ids.next_id()
    }

    /// Adds a record, indexing every configured field.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the id is already present, or an index rejection for
    /// an unindexable field value. The store is untouched on error.
    pub fn add(&mut self, record: T) -> StoreResult<RecordId> {
        let id = record.id().to_string();
        if self.records.contains_key(&id) {
            emit(Severity::Warn, "duplicate_id_rejected", &[("id", &id)]);
            return Err(StoreError::DuplicateId { id });
        }
        self.index.insert(&record)?;
        self.ids.observe(&id);
        self.records.insert(id.clone(), record);
        emit(Severity::Info, "record_added", &[("id", &id)]);
        Ok(id)
    }

    /// Adds records in order, stopping at the first failure.
    pub fn add_all(&mut self, records: Vec<T>) -> StoreResult<()> {
        for record in records {
            self.add(record)?;
        }
        Ok(())
    }

    /// Looks up a record by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record carries `id`.
    pub fn get(&self, id: &str) -> StoreResult<&T> {
        self.records.get(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })
    }

    /// All records, in id order.
    pub fn all(&self) -> Vec<&T> {
        let mut records: Vec<&T> = self.records.values().collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes a record, unindexing it first.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record carries `id`.
    pub fn remove(&mut self, id: &str) -> StoreResult<T> {
        let record = self.records.remove(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;
        self.index.delete(&record);
        emit(Severity::Info, "record_removed", &[("id", id)]);
        Ok(record)
    }

    /// Mutates one field of a record and moves its index key.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, or the record's own validation error
    /// for a rejected value; the record and index are untouched on error.
    pub fn update_field(&mut self, id: &str, field: T::Field, value: &str) -> StoreResult<()> {
        let record = self.records.get_mut(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;
        let old_value = record.field_value(field);
        if let Err(rejected) = record.update_field(field, value) {
            emit(
                Severity::Warn,
                "field_update_rejected",
                &[("field", field.name()), ("id", id)],
            );
            return Err(rejected.into());
        }
        self.index.update(record, field, &old_value)?;
        emit(
            Severity::Info,
            "field_updated",
            &[("id", id), ("field", field.name())],
        );
        Ok(())
    }

    /// First record whose `field` value (any field when `None`) exactly
    /// equals `value`. Ties are broken by lowest id.
    pub fn search_exact(&self, value: &str, field: Option<T::Field>) -> Option<&T> {
        let mut ids: Vec<RecordId> = self.index.search_all(value, field).into_iter().collect();
        ids.sort();
        ids.first().and_then(|id| self.records.get(id))
    }

    /// All records whose value exactly equals `value`, in id order.
    pub fn search_all_exact(&self, value: &str, field: Option<T::Field>) -> Vec<&T> {
        self.resolve(self.index.search_all(value, field))
    }

    /// All records whose value starts with `prefix`, in id order.
    pub fn search_all_prefix(&self, prefix: &str, field: Option<T::Field>) -> Vec<&T> {
        self.resolve(self.index.search_all_prefix(prefix, field))
    }

    /// Discards and rebuilds the index by replaying every stored record.
    /// The index is derived state; this is the load-time path and the
    /// recovery path if a caller suspects drift.
    pub fn rebuild_index(&mut self) -> StoreResult<()> {
        self.index = FieldIndex::new(T::FIELDS.to_vec(), self.index.is_case_sensitive());
        for record in self.records.values() {
            self.index.insert(record)?;
        }
        Ok(())
    }

    fn resolve(&self, ids: std::collections::HashSet<RecordId>) -> Vec<&T> {
        let mut ids: Vec<RecordId> = ids.into_iter().collect();
        ids.sort();
        ids.iter().filter_map(|id| self.records.get(id)).collect()
    }
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
