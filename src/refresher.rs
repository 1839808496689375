// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Refresh cycles.
//!
//! A cycle fetches leases once, then regenerates and commits every zone
//! concurrently. At most one cycle runs at a time: a tick that fires while a
//! cycle is still in flight is skipped, never queued.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::ZoneConfig;
use crate::errors::{CommitError, CycleError};
use crate::healthchecks::Healthchecks;
use crate::lease::Lease;
use crate::metrics;
use crate::providers::LeaseProvider;
use crate::zonefile::{ZoneCommitStatus, Zonefile};

/// Result of committing one zone during a cycle.
#[derive(Debug)]
pub struct ZoneOutcome {
    /// Zone key
    pub zone: String,
    /// Number of generated records
    pub records: usize,
    /// Commit status or the write error
    pub result: Result<ZoneCommitStatus, CommitError>,
}

/// Summary of a completed refresh cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// Leases returned by the provider
    pub leases: usize,
    /// Per-zone outcomes, in configuration order
    pub zones: Vec<ZoneOutcome>,
    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl CycleReport {
    /// Keys of the zones whose file was rewritten.
    #[must_use]
    pub fn changed(&self) -> Vec<&str> {
        self.zones
            .iter()
            .filter(|outcome| matches!(outcome.result, Ok(ZoneCommitStatus::Changed)))
            .map(|outcome| outcome.zone.as_str())
            .collect()
    }

    /// Zone key and error message of every failed zone.
    #[must_use]
    pub fn failures(&self) -> Vec<(String, String)> {
        self.zones
            .iter()
            .filter_map(|outcome| match &outcome.result {
                Err(e) => Some((outcome.zone.clone(), e.to_string())),
                Ok(_) => None,
            })
            .collect()
    }
}

/// Clears the busy flag when a cycle ends, including on panic.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives refresh cycles for a fixed set of zones.
pub struct Refresher {
    provider: Arc<dyn LeaseProvider>,
    zones: Vec<ZoneConfig>,
    healthchecks: Healthchecks,
    busy: AtomicBool,
}

impl Refresher {
    /// Create a refresher for `zones` fed by `provider`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LeaseProvider>,
        zones: Vec<ZoneConfig>,
        healthchecks: Healthchecks,
    ) -> Self {
        Self {
            provider,
            zones,
            healthchecks,
            busy: AtomicBool::new(false),
        }
    }

    /// Configured zones.
    #[must_use]
    pub fn zones(&self) -> &[ZoneConfig] {
        &self.zones
    }

    /// Returns true while a cycle is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run a cycle unless one is already in flight.
    ///
    /// Returns `None` when the cycle was skipped.
    pub async fn try_run_cycle(&self) -> Option<Result<CycleReport, CycleError>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Previous refresh cycle still running, skipping");
            metrics::record_cycle_skipped();
            return None;
        }
        let _guard = BusyGuard(&self.busy);

        Some(self.run_cycle().await)
    }

    /// Run one refresh cycle, reporting it to the health-check endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::LeaseSource`] if leases could not be fetched, in
    /// which case no zonefile was touched, or [`CycleError::Zones`] if some
    /// zones failed to commit after all zones were processed.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let start = Instant::now();
        let result = self.healthchecks.wrap(self.execute(start)).await;

        match &result {
            Ok(report) => {
                metrics::record_cycle_success(report.duration);
                info!(
                    leases = report.leases,
                    zones = report.zones.len(),
                    changed = ?report.changed(),
                    duration = ?report.duration,
                    "Refresh cycle completed"
                );
            }
            Err(e) => {
                metrics::record_cycle_error(start.elapsed());
                error!(error = %e, duration = ?start.elapsed(), "Refresh cycle failed");
            }
        }

        result
    }

    async fn execute(&self, start: Instant) -> Result<CycleReport, CycleError> {
        let leases = self.provider.get_leases().await.inspect_err(|e| {
            metrics::record_provider_error(e.kind());
        })?;
        metrics::record_leases_fetched(leases.len());
        debug!(
            provider = self.provider.name(),
            leases = leases.len(),
            "Fetched leases"
        );

        let zones = join_all(self.zones.iter().map(|zone| refresh_zone(zone, &leases))).await;

        let report = CycleReport {
            leases: leases.len(),
            zones,
            duration: start.elapsed(),
        };

        let failures = report.failures();
        if failures.is_empty() {
            Ok(report)
        } else {
            Err(CycleError::Zones { failures })
        }
    }

    /// Run a cycle every `period` until `shutdown` resolves.
    ///
    /// The first cycle starts immediately. Each tick spawns its cycle, so a
    /// slow cycle makes the following ticks skip instead of delaying them.
    /// In-flight cycles are awaited before returning.
    pub async fn run_daemon<F>(self: Arc<Self>, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = JoinSet::new();
        tokio::pin!(shutdown);

        info!(interval = ?period, "Running in daemon mode");

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, stopping refresh loop");
                    break;
                }
                _ = ticker.tick() => {
                    let refresher = Arc::clone(&self);
                    cycles.spawn(async move {
                        // Failures are logged and counted by run_cycle
                        let _ = refresher.try_run_cycle().await;
                    });
                }
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Refresh cycle task aborted");
                    }
                }
            }
        }

        while let Some(joined) = cycles.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Refresh cycle task aborted");
            }
        }
    }
}

/// Regenerate and commit one zone from the leases of its interface.
async fn refresh_zone(zone: &ZoneConfig, leases: &[Lease]) -> ZoneOutcome {
    let zone_leases: Vec<Lease> = leases
        .iter()
        .filter(|lease| lease.interface == zone.firewall_interface)
        .cloned()
        .collect();

    let mut zonefile = Zonefile::new(zone.clone());
    zonefile.set_leases(&zone_leases);
    let records = zonefile.records().len();
    metrics::record_zone_records(&zone.key, records);

    let result = zonefile.commit().await;
    match &result {
        Ok(status) => {
            metrics::record_zone_commit(&zone.key, status.as_str());
            match status {
                ZoneCommitStatus::Changed => info!(
                    zone = %zone.key,
                    kind = zone.kind_name(),
                    records,
                    path = %zone.output_path.display(),
                    "Updated zonefile"
                ),
                ZoneCommitStatus::Unchanged => {
                    debug!(zone = %zone.key, records, "Zonefile is up-to-date");
                }
            }
        }
        Err(e) => {
            metrics::record_zone_commit(&zone.key, "error");
            error!(zone = %zone.key, error = %e, "Failed to commit zonefile");
        }
    }

    ZoneOutcome {
        zone: zone.key.clone(),
        records,
        result,
    }
}

#[cfg(test)]
#[path = "refresher_tests.rs"]
mod refresher_tests;
