// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DHCP lease model shared by lease providers and the zonefile engine.

use serde::{Deserialize, Serialize};

use crate::constants::MAC_SEPARATOR;

/// Kind of a DHCP lease.
///
/// Static leases are reservations configured on the firewall and are
/// authoritative over dynamic ones when both claim the same name or MAC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseType {
    /// Reserved (static mapping) lease
    Static,
    /// Lease handed out from the dynamic pool
    Dynamic,
}

/// An IPv4 address lease observed on the firewall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    /// Hostname announced by the client or set on the reservation
    pub hostname: Option<String>,

    /// Firewall interface description the lease belongs to (e.g., "LAN")
    pub interface: String,

    /// Leased IPv4 address in dotted-quad notation
    pub ipv4: String,

    /// Client MAC address, in whatever notation the provider reports
    pub mac: String,

    /// Static or dynamic lease
    #[serde(rename = "type")]
    pub lease_type: LeaseType,
}

impl Lease {
    /// Returns true for reserved leases.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.lease_type == LeaseType::Static
    }

    /// Hostname of the lease, if it has a non-empty one.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|h| !h.is_empty())
    }

    /// Returns true if the lease carries both an address and a MAC.
    ///
    /// Leases failing this check never take part in record generation.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.ipv4.is_empty() && !self.mac.is_empty()
    }

    /// Record name derived from the MAC address.
    #[must_use]
    pub fn mac_record_name(&self) -> String {
        canonical_mac(&self.mac)
    }
}

/// Canonicalize a MAC address into a DNS label.
///
/// The result is lowercase with octets separated by `-`, whichever notation
/// the input used (`AA:BB:CC:DD:EE:FF`, `aabb.ccdd.eeff`, `AABBCCDDEEFF`).
/// Input that does not hold exactly 12 hex digits is lowercased with its
/// `:` and `.` separators replaced.
///
/// # Examples
///
/// ```
/// use hibiscus::lease::canonical_mac;
///
/// assert_eq!(canonical_mac("AA:BB:CC:DD:EE:FF"), "aa-bb-cc-dd-ee-ff");
/// assert_eq!(canonical_mac("aabb.ccdd.eeff"), "aa-bb-cc-dd-ee-ff");
/// ```
#[must_use]
pub fn canonical_mac(mac: &str) -> String {
    let digits: Vec<char> = mac
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let only_separators = mac
        .chars()
        .all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '-' | '.'));

    if digits.len() == 12 && only_separators {
        return digits
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(&MAC_SEPARATOR.to_string());
    }

    mac.to_ascii_lowercase()
        .replace([':', '.'], &MAC_SEPARATOR.to_string())
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod lease_tests;
