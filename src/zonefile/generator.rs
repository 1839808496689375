// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record generation rules for forward and reverse zones.
//!
//! Records are produced in a fixed order for a given lease list: the
//! hostname pass, then the MAC pass for forward zones, or the PTR pass for
//! reverse zones. Within a pass, records follow the first-seen order of
//! their grouping key.

use std::collections::HashSet;

use tracing::debug;

use crate::config::{RecordToggles, ZoneConfig, ZoneKind};
use crate::constants::{DEFAULT_RECORD_PRIORITY, STATIC_RECORD_PRIORITY};
use crate::lease::Lease;

use super::index::{by_hostname, by_mac, by_reverse_subnet};
use super::resolver::resolve_group;
use super::{RecordStore, RecordType, ZoneRecord};

/// Generate the ordered records of `zone` from the leases of one cycle.
///
/// `store` is cleared first and then used to collapse hostname and PTR
/// records claiming the same name and type. MAC records only compete with
/// hostname records: a MAC with several static addresses still yields one
/// record per address.
pub fn generate_records(
    zone: &ZoneConfig,
    leases: &[Lease],
    store: &mut RecordStore,
) -> Vec<ZoneRecord> {
    store.clear();

    let eligible: Vec<&Lease> = leases
        .iter()
        .filter(|lease| lease.is_well_formed())
        .filter(|lease| !zone.static_only || lease.is_static())
        .collect();

    match &zone.kind {
        ZoneKind::Default { records } => forward_records(zone, *records, &eligible, store),
        ZoneKind::Reverse { ptr_subnet } => {
            let ptr = ptr_records(zone, ptr_subnet, &eligible);
            dedupe(ptr, store)
        }
    }
}

fn forward_records(
    zone: &ZoneConfig,
    toggles: RecordToggles,
    leases: &[&Lease],
    store: &mut RecordStore,
) -> Vec<ZoneRecord> {
    let mut records = Vec::new();

    if toggles.include_hostname {
        records = dedupe(hostname_records(zone, leases), store);
    }
    if toggles.include_mac {
        merge_mac_records(&mut records, mac_records(leases), store);
    }

    records
}

/// Append MAC records, settling names already claimed by the hostname pass.
///
/// A MAC record is dropped when the store holds its name and type at equal
/// or higher priority. A strictly higher MAC record evicts the held record.
/// Repeated names coming from the MAC pass alone are all kept.
fn merge_mac_records(records: &mut Vec<ZoneRecord>, mac: Vec<ZoneRecord>, store: &RecordStore) {
    let mut evicted: HashSet<ZoneRecord> = HashSet::new();

    let kept: Vec<ZoneRecord> = mac
        .into_iter()
        .filter(|record| match store.get(&record.name, record.record_type) {
            Some(held) if held.priority >= record.priority => {
                debug!(
                    name = %record.name,
                    value = %record.value,
                    "Dropping MAC record shadowed by hostname record"
                );
                false
            }
            Some(held) => {
                evicted.insert(held.clone());
                true
            }
            None => true,
        })
        .collect();

    records.retain(|record| !evicted.contains(record));
    records.extend(kept);
}

fn hostname_records(zone: &ZoneConfig, leases: &[&Lease]) -> Vec<ZoneRecord> {
    let index = by_hostname(leases.iter().copied());
    let mut records = Vec::with_capacity(index.len());

    for (hostname, group) in index.iter() {
        match resolve_group(group) {
            Some(lease) => records.push(ZoneRecord {
                name: hostname.to_string(),
                record_type: RecordType::A,
                value: lease.ipv4.clone(),
                priority: lease_priority(lease),
            }),
            None => debug!(
                zone = %zone.key,
                hostname,
                leases = group.len(),
                "Skipping ambiguous hostname"
            ),
        }
    }

    records
}

fn mac_records(leases: &[&Lease]) -> Vec<ZoneRecord> {
    let index = by_mac(leases.iter().copied());
    let mut records = Vec::with_capacity(index.len());

    for (mac, group) in index.iter() {
        let statics: Vec<&Lease> = group.iter().copied().filter(|l| l.is_static()).collect();
        let selected = if statics.is_empty() {
            group.to_vec()
        } else {
            statics
        };

        records.extend(selected.into_iter().map(|lease| ZoneRecord {
            name: mac.to_string(),
            record_type: RecordType::A,
            value: lease.ipv4.clone(),
            priority: lease_priority(lease),
        }));
    }

    records
}

fn ptr_records(zone: &ZoneConfig, ptr_subnet: &str, leases: &[&Lease]) -> Vec<ZoneRecord> {
    let index = by_reverse_subnet(leases.iter().copied(), ptr_subnet);
    let mut records = Vec::with_capacity(index.len());

    for (hostname, group) in index.iter() {
        let Some(lease) = resolve_group(group) else {
            debug!(
                zone = %zone.key,
                hostname,
                leases = group.len(),
                "Skipping ambiguous reverse hostname"
            );
            continue;
        };

        records.push(ZoneRecord {
            name: ptr_name(&lease.ipv4, ptr_subnet),
            record_type: RecordType::PTR,
            value: format!("{hostname}.{}", zone.domain),
            priority: lease_priority(lease),
        });
    }

    records
}

/// PTR owner name of `ipv4` relative to a reverse zone of `ptr_subnet`.
///
/// ```
/// use hibiscus::zonefile::generator::ptr_name;
///
/// assert_eq!(ptr_name("10.0.1.4", "10.0."), "4.1");
/// ```
#[must_use]
pub fn ptr_name(ipv4: &str, ptr_subnet: &str) -> String {
    let host_part = ipv4.strip_prefix(ptr_subnet).unwrap_or(ipv4);
    host_part.split('.').rev().collect::<Vec<_>>().join(".")
}

fn lease_priority(lease: &Lease) -> u8 {
    if lease.is_static() {
        STATIC_RECORD_PRIORITY
    } else {
        DEFAULT_RECORD_PRIORITY
    }
}

/// Run `records` through the store and keep the winners in generation order.
fn dedupe(records: Vec<ZoneRecord>, store: &mut RecordStore) -> Vec<ZoneRecord> {
    for record in &records {
        store.add(record.clone());
    }

    let mut winners: HashSet<ZoneRecord> = store.to_vec().into_iter().collect();
    records
        .into_iter()
        .filter(|record| winners.remove(record))
        .collect()
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod generator_tests;
