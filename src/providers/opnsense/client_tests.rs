// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `client.rs`

#[cfg(test)]
mod tests {
    use super::super::OpnsenseApiClient;
    use crate::config::OpnsenseSettings;
    use crate::errors::ProviderError;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LEASES_PATH: &str = "/api/dhcpv4/leases/searchLease";

    fn settings(server: &MockServer) -> OpnsenseSettings {
        OpnsenseSettings {
            url: format!("{}/api", server.uri()),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_requests_carry_auth_and_accept_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LEASES_PATH))
            // base64("key:secret")
            .and(header("Authorization", "Basic a2V5OnNlY3JldA=="))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpnsenseApiClient::new(&settings(&server)).unwrap();
        let response = client.search_leases().await.unwrap();

        assert!(response.rows.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        let server = MockServer::start().await;
        let mut settings = settings(&server);
        settings.url.push('/');

        let client = OpnsenseApiClient::new(&settings).unwrap();
        assert_eq!(client.base_url(), format!("{}/api", server.uri()));
    }

    #[tokio::test]
    async fn test_check_credentials_accepts_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LEASES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": [] })))
            .mount(&server)
            .await;

        let client = OpnsenseApiClient::new(&settings(&server)).unwrap();
        client.check_credentials().await.unwrap();
    }

    #[tokio::test]
    async fn test_check_credentials_rejects_html_login_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LEASES_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html>Login</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let client = OpnsenseApiClient::new(&settings(&server)).unwrap();
        let error = client.check_credentials().await.unwrap_err();

        assert!(matches!(error, ProviderError::InvalidCredentials { .. }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LEASES_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = OpnsenseApiClient::new(&settings(&server)).unwrap();
        let error = client.search_leases().await.unwrap_err();

        assert!(matches!(error, ProviderError::Http { status: 503, .. }));
        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LEASES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
            .mount(&server)
            .await;

        let client = OpnsenseApiClient::new(&settings(&server)).unwrap();
        let error = client.search_leases().await.unwrap_err();

        assert!(matches!(error, ProviderError::Decode { .. }));
    }
}
