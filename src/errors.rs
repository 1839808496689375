// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for Hibiscus.
//!
//! This module provides specialized error types for:
//! - Zone configuration loading (fatal, reported before any cycle runs)
//! - Lease provider operations (HTTP API failures, authentication, decoding)
//! - Zonefile commits (filesystem write failures)
//! - Refresh cycles (aggregating the above per cycle)
//!
//! Ambiguous lease groups are deliberately absent here: they are a normal
//! outcome of record generation and never surface as an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building zone configurations and runtime settings.
///
/// All of these are fatal: the process refuses to start with a malformed
/// configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable or flag is not set
    #[error("Required configuration variable '{name}' is not set")]
    MissingVariable {
        /// Name of the missing variable (e.g., `ZONE_LAN_DOMAIN`)
        name: String,
    },

    /// A variable is set but its value is not acceptable
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// Name of the offending variable
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The output directory does not exist or cannot be written
    #[error("Output directory '{}' is not usable: {reason}", path.display())]
    OutputDirectory {
        /// Configured output directory
        path: PathBuf,
        /// Specific reason for the failure
        reason: String,
    },
}

/// Errors that can occur while talking to a lease provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status
    #[error("Lease provider returned HTTP {status} for {url}")]
    Http {
        /// HTTP status code returned by the API
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// The request could not be sent or the connection failed
    #[error("Failed to reach lease provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API accepted the request but the credentials were rejected
    ///
    /// OPNsense answers HTTP 200 with an HTML login page when the API key
    /// is wrong, so this is detected from the response content type.
    #[error("Lease provider rejected the API credentials for {url}")]
    InvalidCredentials {
        /// Base URL of the provider
        url: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode lease provider response: {reason}")]
    Decode {
        /// Decoder error message
        reason: String,
    },

    /// The HTTP client could not be built from the settings
    #[error("Failed to build lease provider client: {reason}")]
    Client {
        /// Builder error message
        reason: String,
    },
}

impl ProviderError {
    /// Returns true if this error is transient and the request should be retried.
    ///
    /// Rate limiting (429), server errors (5xx) and transport failures are
    /// transient. Client errors, credential failures and malformed payloads
    /// are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Transport(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            Self::InvalidCredentials { .. } | Self::Decode { .. } | Self::Client { .. } => false,
        }
    }

    /// Short, stable label for this error, used as a metrics label value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Transport(_) => "transport",
            Self::InvalidCredentials { .. } => "credentials",
            Self::Decode { .. } => "decode",
            Self::Client { .. } => "client",
        }
    }
}

/// Errors that can occur while committing a zonefile to disk.
#[derive(Error, Debug)]
pub enum CommitError {
    /// Writing the rendered zonefile failed
    #[error("Failed to write zonefile '{}': {source}", path.display())]
    Write {
        /// Output path of the zonefile
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort or degrade a whole refresh cycle.
#[derive(Error, Debug)]
pub enum CycleError {
    /// Leases could not be fetched; no zonefile was touched
    #[error("Failed to fetch leases: {0}")]
    LeaseSource(#[from] ProviderError),

    /// Some zones failed to commit; their siblings completed
    #[error("{} zone(s) failed to commit: {}", failures.len(), failures.iter().map(|(key, err)| format!("{key}: {err}")).collect::<Vec<_>>().join("; "))]
    Zones {
        /// Zone key and error message for each failed zone
        failures: Vec<(String, String)>,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
