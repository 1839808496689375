// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Healthchecks.io style job reporting.
//!
//! Each refresh cycle pings `<url>/start` before running and `<url>/` or
//! `<url>/fail` once done. Reporting never affects the cycle itself: failed
//! pings are logged and dropped.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use tracing::{debug, error};

use crate::constants::HEALTHCHECKS_TIMEOUT_SECS;

/// Reporter for a health-check endpoint; a no-op when no URL is configured.
#[derive(Debug, Clone)]
pub struct Healthchecks {
    client: HttpClient,
    endpoint: Option<String>,
}

impl Healthchecks {
    /// Create a reporter for `endpoint`, or a disabled one for `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: Option<String>) -> Result<Self, reqwest::Error> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(HEALTHCHECKS_TIMEOUT_SECS))
            .build()?;

        let endpoint = endpoint.map(|url| url.trim_end_matches('/').to_string());
        if endpoint.is_none() {
            debug!("No health-check URL set, reporting is disabled");
        }

        Ok(Self { client, endpoint })
    }

    /// A reporter that never sends anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            client: HttpClient::new(),
            endpoint: None,
        }
    }

    /// Returns true if reports are sent.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Report the start of a job.
    pub async fn start(&self) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        match self.client.post(format!("{endpoint}/start")).send().await {
            Ok(_) => debug!("Health-check start report sent"),
            Err(e) => error!(error = %e, "Failed to send health-check start report"),
        }
    }

    /// Report the end of a job, with an optional plain-text body.
    pub async fn end(&self, success: bool, body: &str) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let url = if success {
            format!("{endpoint}/")
        } else {
            format!("{endpoint}/fail")
        };

        let result = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await;

        match result {
            Ok(_) => debug!(success, "Health-check report sent"),
            Err(e) => error!(error = %e, "Failed to send health-check report"),
        }
    }

    /// Bracket `job` with start and end reports.
    ///
    /// A failed job is reported with its error message as body.
    ///
    /// # Errors
    ///
    /// Returns the error of `job` unchanged.
    pub async fn wrap<T, E, F>(&self, job: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.is_enabled() {
            return job.await;
        }

        self.start().await;
        let result = job.await;
        match &result {
            Ok(_) => self.end(true, "").await,
            Err(e) => self.end(false, &e.to_string()).await,
        }
        result
    }
}

#[cfg(test)]
#[path = "healthchecks_tests.rs"]
mod healthchecks_tests;
