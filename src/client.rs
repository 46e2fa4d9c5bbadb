//! Authenticated HTTP transport for the Perigon API.
//!
//! [`QueryClient`] owns the bearer credential, the base endpoint, and a
//! `reqwest` client configured with a bounded request timeout. It issues
//! one request per call and knows nothing about individual search
//! surfaces; the wire-field naming and response shapes live in
//! [`crate::endpoints`].
//!
//! # Error surfacing
//!
//! Non-success statuses are logged with the raw (truncated) response body
//! and returned as [`QueryError::HttpStatus`] so the operator sees exactly
//! what the provider said. Bodies that fail to decode as JSON become
//! [`QueryError::MalformedResponse`]; timeouts become
//! [`QueryError::Timeout`].

use once_cell::sync::Lazy;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::Credentials;
use crate::error::QueryError;
use crate::utils::{looks_truncated, truncate_for_log};

/// Default deadline applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response-body prefix echoed into logs.
const LOG_BODY_MAX: usize = 300;

static PERIGON_BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://api.perigon.io").expect("default base URL is valid"));

/// The production API endpoint, used when no `--base-url` override is
/// given.
pub fn default_base_url() -> &'static Url {
    &PERIGON_BASE_URL
}

/// Stateless request/response client for the Perigon API.
///
/// Every call is independent; the client holds no cache and no mutable
/// state, so it can be shared freely across concurrent lookups.
pub struct QueryClient {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: Url,
    timeout: Duration,
}

impl QueryClient {
    /// Build a client around an already-resolved credential.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        credentials: Credentials,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QueryError::from_reqwest)?;
        Ok(QueryClient {
            http,
            credentials,
            base_url,
            timeout,
        })
    }

    /// Issue an authenticated GET and decode the JSON response body.
    #[instrument(level = "debug", skip_all, fields(path = path))]
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, QueryError> {
        let t0 = Instant::now();
        let response = self
            .http
            .get(self.endpoint_url(path))
            .bearer_auth(self.credentials.api_key())
            .header(CONTENT_TYPE, "application/json")
            .query(params)
            .send()
            .await
            .map_err(QueryError::from_reqwest)?;
        self.decode(path, response, t0).await
    }

    /// Issue an authenticated POST with a JSON body and decode the
    /// response.
    #[instrument(level = "debug", skip_all, fields(path = path))]
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, QueryError> {
        let t0 = Instant::now();
        let response = self
            .http
            .post(self.endpoint_url(path))
            .bearer_auth(self.credentials.api_key())
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(QueryError::from_reqwest)?;
        self.decode(path, response, t0).await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn decode(
        &self,
        path: &str,
        response: reqwest::Response,
        t0: Instant,
    ) -> Result<Value, QueryError> {
        let status = response.status();
        let body = response.text().await.map_err(QueryError::from_reqwest)?;
        let elapsed_ms = t0.elapsed().as_millis() as u128;

        if !status.is_success() {
            error!(
                path,
                status = status.as_u16(),
                elapsed_ms,
                body = %truncate_for_log(&body, LOG_BODY_MAX),
                "Error response from API"
            );
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            path,
            status = status.as_u16(),
            elapsed_ms,
            bytes = body.len(),
            "API request succeeded"
        );

        serde_json::from_str(&body).map_err(|e| {
            warn!(
                path,
                error = %e,
                preview = %truncate_for_log(&body, LOG_BODY_MAX),
                "Response body is not valid JSON"
            );
            let reason = if looks_truncated(&e) {
                format!("truncated body: {e}")
            } else {
                e.to_string()
            };
            QueryError::MalformedResponse(reason)
        })
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer, timeout: Duration) -> QueryClient {
        QueryClient::new(
            Credentials::from_key("test-key"),
            Url::parse(&server.uri()).unwrap(),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/all"))
            .and(header("authorization", "Bearer test-key"))
            .and(query_param("q", "trump"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        let value = client
            .get_json("/v1/all", &[("q", "trump".to_string())])
            .await
            .unwrap();
        assert!(value.get("articles").is_some());
    }

    #[tokio::test]
    async fn test_http_error_surfaces_status_and_body_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/all"))
            .respond_with(ResponseTemplate::new(500).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        let err = client.get_json("/v1/all", &[]).await.unwrap_err();
        match err {
            QueryError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector/news/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        let err = client
            .post_json("/v1/vector/news/all", &json!({"prompt": "ai"}))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/all"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"articles": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_millis(50));
        let err = client.get_json("/v1/all", &[]).await.unwrap_err();
        assert!(matches!(err, QueryError::Timeout));
    }

    #[tokio::test]
    async fn test_base_url_with_trailing_slash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/", server.uri())).unwrap();
        let client =
            QueryClient::new(Credentials::from_key("k"), base, Duration::from_secs(5)).unwrap();
        assert!(client.get_json("/v1/all", &[]).await.is_ok());
    }
}
