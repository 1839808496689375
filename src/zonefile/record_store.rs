// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Priority-aware record deduplication.

use std::collections::HashMap;

use super::{RecordType, ZoneRecord};

/// Holds at most one record per `(name, type)` pair.
///
/// When two records claim the same pair, the one with the strictly higher
/// priority is kept. On equal priority the record added first stays.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: HashMap<(String, RecordType), ZoneRecord>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record to the store.
    ///
    /// Returns true if the record is now the one held for its name and type.
    pub fn add(&mut self, record: ZoneRecord) -> bool {
        let key = (record.name.clone(), record.record_type);
        match self.records.get(&key) {
            Some(existing) if existing.priority >= record.priority => false,
            _ => {
                self.records.insert(key, record);
                true
            }
        }
    }

    /// The record held for `name` and `record_type`, if any.
    #[must_use]
    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&ZoneRecord> {
        self.records.get(&(name.to_string(), record_type))
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Snapshot of the held records, in no particular order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ZoneRecord> {
        self.records.values().cloned().collect()
    }

    /// Number of held records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "record_store_tests.rs"]
mod record_store_tests;
