// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Hibiscus - DHCP leases to BIND zonefiles
//!
//! Hibiscus reads the DHCP leases of an OPNsense firewall and turns them into
//! authoritative BIND zonefiles, regenerating them on a schedule and writing
//! to disk only when their content actually changes.
//!
//! ## Overview
//!
//! - Colliding leases are resolved to a single fact, or to no record at all
//!   when they stay ambiguous
//! - Forward zones get A records by hostname and by MAC address
//! - Reverse zones get PTR records for a configured subnet prefix
//! - The zone serial alone never causes a rewrite
//!
//! ## Modules
//!
//! - [`config`] - Command-line settings and `ZONE_<ID>_<FIELD>` zone configuration
//! - [`lease`] - Lease model shared by providers and the zonefile engine
//! - [`providers`] - Lease sources, including the OPNsense API
//! - [`zonefile`] - Record generation, rendering and change-only commits
//! - [`refresher`] - Single-flight refresh cycles and daemon loop
//! - [`healthchecks`] - Job reporting to a Healthchecks.io endpoint
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use hibiscus::config::parse_zone_configurations;
//! use hibiscus::lease::{Lease, LeaseType};
//! use hibiscus::zonefile::Zonefile;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let zones = parse_zone_configurations(std::env::vars(), Path::new("/var/lib/bind"))?;
//! let leases = vec![Lease {
//!     hostname: Some("server1".to_string()),
//!     interface: "LAN".to_string(),
//!     ipv4: "10.0.0.1".to_string(),
//!     mac: "aa:bb:cc:dd:ee:ff".to_string(),
//!     lease_type: LeaseType::Static,
//! }];
//!
//! for zone in zones {
//!     let mut zonefile = Zonefile::new(zone);
//!     zonefile.set_leases(&leases);
//!     zonefile.commit().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod healthchecks;
pub mod lease;
pub mod metrics;
pub mod providers;
pub mod refresher;
pub mod retry;
pub mod zonefile;
