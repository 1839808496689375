// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! OPNsense DHCPv4 lease provider.
//!
//! Leases are read from the `dhcpv4/leases/searchLease` endpoint of the
//! OPNsense API and filtered down to the interfaces of the configured zones.

pub mod client;
pub mod types;

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{OpnsenseSettings, ZoneConfig};
use crate::errors::ProviderError;
use crate::lease::Lease;
use crate::retry::retry_provider_call;

use super::LeaseProvider;
use client::OpnsenseApiClient;

/// Lease provider backed by an OPNsense firewall.
#[derive(Debug, Clone)]
pub struct OpnsenseProvider {
    client: OpnsenseApiClient,
    interfaces: BTreeSet<String>,
}

impl OpnsenseProvider {
    /// Create a provider returning the leases of the interfaces used by `zones`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Client`] if the HTTP client cannot be built.
    pub fn new(settings: &OpnsenseSettings, zones: &[ZoneConfig]) -> Result<Self, ProviderError> {
        Ok(Self {
            client: OpnsenseApiClient::new(settings)?,
            interfaces: zones
                .iter()
                .map(|zone| zone.firewall_interface.clone())
                .collect(),
        })
    }

    /// Firewall interfaces whose leases are returned.
    #[must_use]
    pub fn interfaces(&self) -> &BTreeSet<String> {
        &self.interfaces
    }
}

#[async_trait]
impl LeaseProvider for OpnsenseProvider {
    fn name(&self) -> &'static str {
        "opnsense"
    }

    async fn init(&self) -> Result<(), ProviderError> {
        retry_provider_call(
            || self.client.check_credentials(),
            "check OPNsense credentials",
        )
        .await?;

        info!(
            url = %self.client.base_url(),
            interfaces = ?self.interfaces,
            "Connected to OPNsense API"
        );
        Ok(())
    }

    async fn get_leases(&self) -> Result<Vec<Lease>, ProviderError> {
        let response =
            retry_provider_call(|| self.client.search_leases(), "search OPNsense leases").await?;

        let mut leases = Vec::with_capacity(response.rows.len());
        for row in response
            .rows
            .iter()
            .filter(|row| self.interfaces.contains(&row.if_descr))
        {
            match row.to_lease() {
                Some(lease) => leases.push(lease),
                None => warn!(
                    interface = %row.if_descr,
                    address = ?row.address,
                    mac = ?row.mac,
                    hostname = ?row.hostname,
                    "Skipping OPNsense lease without address or MAC, or with a malformed hostname"
                ),
            }
        }

        debug!(
            rows = response.rows.len(),
            leases = leases.len(),
            "Filtered OPNsense leases by zone interface"
        );
        Ok(leases)
    }

    async fn release(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
