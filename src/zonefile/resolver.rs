// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ambiguity resolution for leases colliding on the same key.

use crate::lease::Lease;

/// Collapse a group of leases sharing a hostname into one authoritative lease.
///
/// - A single lease is returned as is.
/// - Among several leases, the only static one wins over any dynamic ones.
/// - Otherwise (no static lease, or more than one) the group is ambiguous and
///   `None` is returned.
///
/// An empty group resolves to `None`.
#[must_use]
pub fn resolve_group<'a>(leases: &[&'a Lease]) -> Option<&'a Lease> {
    match leases {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut statics = leases.iter().filter(|lease| lease.is_static());
            match (statics.next(), statics.next()) {
                (Some(authoritative), None) => Some(*authoritative),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
