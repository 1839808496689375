// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Lease sources.
//!
//! A [`LeaseProvider`] returns the current DHCP leases of a router for every
//! configured zone interface. The refresh loop only depends on this trait,
//! so tests and alternative routers plug in without touching zonefile code.

pub mod opnsense;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::lease::Lease;

pub use opnsense::OpnsenseProvider;

/// Source of DHCP leases.
#[async_trait]
pub trait LeaseProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Validate connectivity and credentials before the first cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the provider cannot be used.
    async fn init(&self) -> Result<(), ProviderError>;

    /// Fetch the current leases of every configured zone interface.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the leases cannot be fetched or decoded.
    async fn get_leases(&self) -> Result<Vec<Lease>, ProviderError>;

    /// Release resources held by the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if cleanup fails.
    async fn release(&self) -> Result<(), ProviderError>;
}
