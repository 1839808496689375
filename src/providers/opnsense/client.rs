// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Minimal OPNsense REST API client.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::config::OpnsenseSettings;
use crate::constants::{OPNSENSE_LEASES_PATH, OPNSENSE_REQUEST_TIMEOUT_SECS};
use crate::errors::ProviderError;

use super::types::SearchLeaseResponse;

/// HTTP client for the OPNsense API, authenticated with an API key pair.
#[derive(Debug, Clone)]
pub struct OpnsenseApiClient {
    client: HttpClient,
    base_url: String,
}

impl OpnsenseApiClient {
    /// Build a client sending JSON `Accept` and Basic auth headers on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Client`] if the headers or the client cannot be built.
    pub fn new(settings: &OpnsenseSettings) -> Result<Self, ProviderError> {
        let credentials = BASE64.encode(format!("{}:{}", settings.api_key, settings.api_secret));

        let mut authorization = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| ProviderError::Client {
                reason: e.to_string(),
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        let client = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(OPNSENSE_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the API, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn leases_url(&self) -> String {
        format!("{}/{OPNSENSE_LEASES_PATH}", self.base_url)
    }

    /// Verify that the API key pair is accepted.
    ///
    /// OPNsense answers a rejected key with HTTP 200 and an HTML login page,
    /// so the response must also be JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidCredentials`] on a non-JSON answer,
    /// [`ProviderError::Http`] on a non-success status, or
    /// [`ProviderError::Transport`] if the API cannot be reached.
    pub async fn check_credentials(&self) -> Result<(), ProviderError> {
        let url = self.leases_url();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if !is_json {
            return Err(ProviderError::InvalidCredentials {
                url: self.base_url.clone(),
            });
        }

        debug!(url = %self.base_url, "OPNsense credentials accepted");
        Ok(())
    }

    /// Fetch every DHCPv4 lease known to the firewall.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] on a non-success status,
    /// [`ProviderError::Decode`] if the body is not a lease search result, or
    /// [`ProviderError::Transport`] if the API cannot be reached.
    pub async fn search_leases(&self) -> Result<SearchLeaseResponse, ProviderError> {
        let url = self.leases_url();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let leases: SearchLeaseResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
                reason: e.to_string(),
            })?;

        debug!(
            url = %url,
            rows = leases.rows.len(),
            total = leases.total,
            "Fetched OPNsense leases"
        );

        Ok(leases)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
