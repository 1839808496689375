// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change-only zonefile writes.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::CommitError;

use super::serial::replace_serial;
use super::ZoneCommitStatus;

/// Write `candidate` to `path` unless the file already holds the same content.
///
/// The existing file has its serial replaced by `serial` before comparison,
/// so a file whose only difference is an older serial is left untouched.
/// A missing or unreadable file counts as no content.
///
/// # Errors
///
/// Returns [`CommitError::Write`] if the candidate has to be written and the
/// write fails. Nothing is read back after a failed write.
pub async fn commit_zonefile(
    path: &Path,
    candidate: &str,
    serial: &str,
) -> Result<ZoneCommitStatus, CommitError> {
    let existing = tokio::fs::read_to_string(path).await.ok();

    if let Some(existing) = existing {
        if replace_serial(&existing, serial) == candidate {
            debug!(path = %path.display(), "Zonefile unchanged");
            return Ok(ZoneCommitStatus::Unchanged);
        }
    }

    tokio::fs::write(path, candidate)
        .await
        .map_err(|source| CommitError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), serial, "Wrote zonefile");
    Ok(ZoneCommitStatus::Changed)
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod commit_tests;
