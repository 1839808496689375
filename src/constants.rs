// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for Hibiscus.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Zone Configuration Constants
// ============================================================================

/// Prefix shared by all zone configuration environment variables
pub const ZONE_ENV_PREFIX: &str = "ZONE_";

/// Environment variable holding the TTL applied to every zone
pub const RECORD_TTL_ENV: &str = "RECORD_TTL";

/// Default TTL for generated records (5 minutes)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 300;

/// Default record sources for forward zones
pub const DEFAULT_ZONE_INCLUDE: &str = "hostname,mac";

/// Suffix of reverse lookup zones
pub const IN_ADDR_ARPA: &str = "in-addr.arpa";

/// Prefix of generated zonefile names
pub const ZONEFILE_PREFIX: &str = "db.";

// ============================================================================
// SOA Timing Constants
// ============================================================================

/// SOA refresh interval (1 hour)
pub const SOA_REFRESH_SECS: u32 = 3600;

/// SOA retry interval (10 minutes)
pub const SOA_RETRY_SECS: u32 = 600;

/// SOA expire time (7 days)
pub const SOA_EXPIRE_SECS: u32 = 604_800;

/// SOA negative caching TTL (5 minutes)
pub const SOA_NEGATIVE_TTL_SECS: u32 = 300;

// ============================================================================
// Zonefile Rendering Constants
// ============================================================================

/// Marker that follows the serial number in a rendered SOA record
pub const SERIAL_MARKER: &str = "; Serial";

/// Separator between the serial digits and [`SERIAL_MARKER`]
pub const SERIAL_SEPARATOR: &str = "  ";

/// Separator between zonefile columns
pub const COLUMN_SEPARATOR: &str = "  ";

/// Separator used in canonical MAC record names
pub const MAC_SEPARATOR: char = '-';

// ============================================================================
// Record Priority Constants
// ============================================================================

/// Priority of records derived from dynamic leases
pub const DEFAULT_RECORD_PRIORITY: u8 = 0;

/// Priority of records derived from static leases
pub const STATIC_RECORD_PRIORITY: u8 = 1;

// ============================================================================
// OPNsense API Constants
// ============================================================================

/// Lease search endpoint, relative to the API base URL
pub const OPNSENSE_LEASES_PATH: &str = "dhcpv4/leases/searchLease";

/// HTTP request timeout for OPNsense API calls
pub const OPNSENSE_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Health Check Constants
// ============================================================================

/// HTTP request timeout for health check pings
pub const HEALTHCHECKS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";
