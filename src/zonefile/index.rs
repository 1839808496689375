// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Insertion-ordered lease grouping.
//!
//! Groups keep the order in which their key was first seen, so the records
//! generated from them come out in a stable order for a given lease list.

use std::collections::HashMap;

use crate::lease::Lease;

/// Leases grouped by a string key, iterated in first-seen key order.
#[derive(Debug, Default)]
pub struct LeaseIndex<'a> {
    positions: HashMap<String, usize>,
    groups: Vec<(String, Vec<&'a Lease>)>,
}

impl<'a> LeaseIndex<'a> {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lease to the group of `key`, creating the group if needed.
    pub fn insert(&mut self, key: String, lease: &'a Lease) {
        if let Some(&position) = self.positions.get(&key) {
            self.groups[position].1.push(lease);
        } else {
            self.positions.insert(key.clone(), self.groups.len());
            self.groups.push((key, vec![lease]));
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no lease was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over `(key, leases)` groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Lease])> + '_ {
        self.groups
            .iter()
            .map(|(key, leases)| (key.as_str(), leases.as_slice()))
    }
}

/// Group leases having a non-empty hostname by that hostname.
pub fn by_hostname<'a, I>(leases: I) -> LeaseIndex<'a>
where
    I: IntoIterator<Item = &'a Lease>,
{
    let mut index = LeaseIndex::new();
    for lease in leases {
        if let Some(hostname) = lease.hostname() {
            index.insert(hostname.to_string(), lease);
        }
    }
    index
}

/// Group leases by canonical MAC record name.
pub fn by_mac<'a, I>(leases: I) -> LeaseIndex<'a>
where
    I: IntoIterator<Item = &'a Lease>,
{
    let mut index = LeaseIndex::new();
    for lease in leases {
        index.insert(lease.mac_record_name(), lease);
    }
    index
}

/// Group leases inside a reverse zone subnet by hostname.
///
/// Only leases with a non-empty hostname whose address starts with
/// `ptr_subnet` are kept.
pub fn by_reverse_subnet<'a, I>(leases: I, ptr_subnet: &str) -> LeaseIndex<'a>
where
    I: IntoIterator<Item = &'a Lease>,
{
    by_hostname(
        leases
            .into_iter()
            .filter(|lease| lease.ipv4.starts_with(ptr_subnet)),
    )
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod index_tests;
