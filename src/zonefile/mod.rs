// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zonefile generation from DHCP leases.
//!
//! This module turns the leases of one refresh cycle into a BIND zonefile and
//! commits it to disk when its content actually changed. It handles:
//!
//! - Collapsing colliding leases into a single authoritative fact ([`resolver`])
//! - Grouping leases by hostname, MAC, or reverse subnet ([`index`])
//! - Applying forward/reverse record rules ([`generator`])
//! - Enforcing one record per name and type ([`record_store`])
//! - Rendering zonefile text ([`render`]) with a time-based serial ([`serial`])
//! - Writing only when something besides the serial changed ([`commit`])
//!
//! # Example
//!
//! ```rust,no_run
//! use hibiscus::config::ZoneConfig;
//! use hibiscus::lease::Lease;
//! use hibiscus::zonefile::{Zonefile, ZoneCommitStatus};
//!
//! # async fn example(zone: ZoneConfig, leases: Vec<Lease>) -> anyhow::Result<()> {
//! let mut zonefile = Zonefile::new(zone);
//! zonefile.set_leases(&leases);
//!
//! if zonefile.commit().await? == ZoneCommitStatus::Changed {
//!     println!("zonefile updated");
//! }
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod generator;
pub mod index;
pub mod record_store;
pub mod render;
pub mod resolver;
pub mod serial;

pub use record_store::RecordStore;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ZoneConfig;
use crate::errors::CommitError;
use crate::lease::Lease;

/// DNS record types produced by Hibiscus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// Reverse pointer record
    #[allow(clippy::upper_case_acronyms)]
    PTR,
}

impl RecordType {
    /// Record type mnemonic as written in zonefiles.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::PTR => "PTR",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single resource record of a generated zone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Owner name relative to the zone origin
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// IPv4 literal for A records, target FQDN for PTR records
    pub value: String,
    /// Tie-break when two records claim the same name and type (higher wins)
    pub priority: u8,
}

/// Outcome of committing a zonefile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneCommitStatus {
    /// The file was (re)written
    Changed,
    /// The file on disk already had the same content
    Unchanged,
}

impl ZoneCommitStatus {
    /// Status label used in logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// One zone's zonefile for a single refresh cycle.
///
/// Records are rebuilt from scratch by every call to [`Zonefile::set_leases`];
/// the only state carried between cycles is the file on disk.
#[derive(Debug)]
pub struct Zonefile {
    zone: ZoneConfig,
    records: Vec<ZoneRecord>,
    store: RecordStore,
    status: Option<ZoneCommitStatus>,
}

impl Zonefile {
    /// Create an empty zonefile for a zone.
    #[must_use]
    pub fn new(zone: ZoneConfig) -> Self {
        Self {
            zone,
            records: Vec::new(),
            store: RecordStore::new(),
            status: None,
        }
    }

    /// Zone configuration backing this zonefile.
    #[must_use]
    pub fn zone(&self) -> &ZoneConfig {
        &self.zone
    }

    /// Replace the records of this zonefile with those generated from `leases`.
    pub fn set_leases(&mut self, leases: &[Lease]) {
        self.records = generator::generate_records(&self.zone, leases, &mut self.store);
        debug!(
            zone = %self.zone.key,
            leases = leases.len(),
            records = self.records.len(),
            "Generated zone records"
        );
    }

    /// Generated records, in rendering order.
    #[must_use]
    pub fn records(&self) -> &[ZoneRecord] {
        &self.records
    }

    /// Status of the last commit, if any.
    #[must_use]
    pub fn status(&self) -> Option<ZoneCommitStatus> {
        self.status
    }

    /// Render the zonefile with the given serial.
    #[must_use]
    pub fn render(&self, serial: &str) -> String {
        render::render_zonefile(&self.zone, &self.records, serial)
    }

    /// Commit the zonefile using the current time as serial.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError`] if the zonefile needs to be written and the write fails.
    pub async fn commit(&mut self) -> Result<ZoneCommitStatus, CommitError> {
        let serial = serial::current_serial();
        self.commit_with_serial(&serial).await
    }

    /// Commit the zonefile with an explicit serial.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError`] if the zonefile needs to be written and the write fails.
    pub async fn commit_with_serial(
        &mut self,
        serial: &str,
    ) -> Result<ZoneCommitStatus, CommitError> {
        let candidate = self.render(serial);
        let status = commit::commit_zonefile(&self.zone.output_path, &candidate, serial).await?;
        self.status = Some(status);
        Ok(status)
    }
}
