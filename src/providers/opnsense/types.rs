// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! OPNsense `dhcpv4/leases/searchLease` payloads.

use std::collections::HashMap;

use serde::Deserialize;

use crate::lease::{Lease, LeaseType};

/// Response of the `searchLease` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLeaseResponse {
    /// Current page
    #[serde(default)]
    pub current: u64,
    /// Physical interface name to firewall interface description
    #[serde(default)]
    pub interfaces: HashMap<String, String>,
    /// Rows in this page
    #[serde(default)]
    pub row_count: u64,
    /// Lease rows
    #[serde(default)]
    pub rows: Vec<OpnsenseLease>,
    /// Total number of rows
    #[serde(default)]
    pub total: u64,
}

/// Kind of lease as reported by OPNsense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpnsenseLeaseType {
    /// Static mapping
    Static,
    /// Dynamic pool lease
    Dynamic,
    /// Missing, or anything newer firmware may add
    #[default]
    #[serde(other)]
    Unknown,
}

/// Connection status of a lease client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpnsenseLeaseStatus {
    /// Client seen recently
    Online,
    /// Client not seen recently
    Offline,
    /// Anything else
    #[serde(other)]
    Unknown,
}

/// One lease row.
///
/// Only the fields used to build a [`Lease`] are required to be meaningful;
/// `address` and `mac` are optional here so that a broken row can be skipped
/// instead of failing the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpnsenseLease {
    /// Leased IPv4 address
    #[serde(default)]
    pub address: Option<String>,
    /// Client MAC address
    #[serde(default)]
    pub mac: Option<String>,
    /// Hostname of the lease
    #[serde(default)]
    pub hostname: Option<String>,
    /// Hostname announced by the client
    #[serde(default, rename = "client-hostname")]
    pub client_hostname: Option<String>,
    /// Reservation description
    #[serde(default)]
    pub descr: Option<String>,
    /// Physical interface
    #[serde(default, rename = "if")]
    pub interface: Option<String>,
    /// Firewall interface description (e.g., "LAN")
    #[serde(default)]
    pub if_descr: String,
    /// Lease start
    #[serde(default)]
    pub starts: Option<String>,
    /// Lease end
    #[serde(default)]
    pub ends: Option<String>,
    /// Client status
    #[serde(default)]
    pub status: Option<OpnsenseLeaseStatus>,
    /// Lease kind
    #[serde(default, rename = "type")]
    pub lease_type: OpnsenseLeaseType,
}

impl OpnsenseLease {
    /// Convert the row into a [`Lease`].
    ///
    /// Returns `None` when the address or MAC is missing or empty, or when
    /// the hostname contains whitespace or control characters.
    #[must_use]
    pub fn to_lease(&self) -> Option<Lease> {
        let ipv4 = self.address.as_deref().filter(|a| !a.is_empty())?;
        let mac = self.mac.as_deref().filter(|m| !m.is_empty())?;
        if self.hostname.as_deref().is_some_and(|h| {
            h.chars().any(|c| c.is_whitespace() || c.is_control())
        }) {
            return None;
        }

        Some(Lease {
            hostname: self.hostname.clone().filter(|h| !h.is_empty()),
            interface: self.if_descr.clone(),
            ipv4: ipv4.to_string(),
            mac: mac.to_string(),
            lease_type: match self.lease_type {
                OpnsenseLeaseType::Static => LeaseType::Static,
                OpnsenseLeaseType::Dynamic | OpnsenseLeaseType::Unknown => LeaseType::Dynamic,
            },
        })
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
