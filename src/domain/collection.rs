//! In-memory mirror of the remote record store.
//!
//! The collection only changes through operations that follow a confirmed
//! server response. Insertion order is preserved; nothing here sorts.

use crate::domain::record::{Record, RecordId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(records);
        collection
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole collection with a freshly fetched list.
    ///
    /// Later duplicates of an id are dropped so ids stay unique.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        let mut seen: HashSet<RecordId> = HashSet::with_capacity(records.len());
        let mut unique: Vec<Record> = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                log::warn!("dropping duplicate record id {} from fetch", record.id);
                continue;
            }
            unique.push(record);
        }
        self.records = unique;
    }

    /// Add a newly created record at the end.
    ///
    /// If the id is already present the existing entry is replaced in place.
    pub fn append(&mut self, record: Record) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            log::warn!("created record id {} already present; replacing", record.id);
            *existing = record;
            return;
        }
        self.records.push(record);
    }

    /// Overwrite the entry with matching id. Returns false when no entry matched.
    pub fn replace(&mut self, id: RecordId, mut record: Record) -> bool {
        record.id = id;
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with matching id, returning it.
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }
}
