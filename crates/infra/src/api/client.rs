//! Signed Onshape API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use partsync_core::ports::PartMetadataClient;
use partsync_domain::{
    ApiCredentials, PartSyncError, PropertyUpdate, ResolvedReference, Result,
};

use crate::api::{errors, signing};
use crate::http::HttpClient;

/// Versioned JSON media type the Onshape API expects
const ACCEPT_HEADER: &str = "application/vnd.onshape.v1+json;charset=UTF-8;qs=0.1";
/// Header carrying the per-request nonce
const NONCE_HEADER: &str = "On-Nonce";

/// Configuration for [`OnshapeClient`]
#[derive(Debug, Clone)]
pub struct OnshapeClientConfig {
    /// Base URL for API calls
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OnshapeClientConfig {
    fn default() -> Self {
        Self { base_url: "https://cad.onshape.com".to_string(), timeout: Duration::from_secs(30) }
    }
}

/// Signed HTTP transport for the Onshape REST API
///
/// Holds the session credentials read-only; all concurrent row tasks
/// share one client. Performs no retries.
pub struct OnshapeClient {
    http_client: HttpClient,
    base_url: String,
    credentials: ApiCredentials,
}

impl OnshapeClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        Self::with_config(credentials, OnshapeClientConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_config(credentials: ApiCredentials, config: OnshapeClientConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http_client, base_url: config.base_url, credentials })
    }

    /// Base URL this client addresses.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a signed request and decode the JSON body, if any.
    ///
    /// Returns `None` for HTTP 204 responses, which carry no body.
    ///
    /// # Errors
    /// - `PartSyncError::Network` for transport-level failures
    /// - `PartSyncError::Transport` for non-2xx responses, with the
    ///   server's error detail where available
    /// - `PartSyncError::Signing` if the signature cannot be produced
    #[instrument(skip(self, body), fields(%method, url))]
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let parsed = Url::parse(url)
            .map_err(|err| PartSyncError::InvalidInput(format!("invalid request URL {url}: {err}")))?;
        let path = parsed.path();
        let query = parsed.query().unwrap_or("");

        let nonce = signing::generate_nonce();
        let date = signing::http_date();
        let signature = signing::request_signature(
            method.as_str(),
            &nonce,
            &date,
            path,
            query,
            &self.credentials.secret_key,
        )?;

        let mut request = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, ACCEPT_HEADER)
            .header(header::CONTENT_TYPE, signing::CONTENT_TYPE)
            .header(NONCE_HEADER, &nonce)
            .header(header::DATE, &date)
            .header(
                header::AUTHORIZATION,
                format!("On {}:HmacSHA256:{}", self.credentials.access_key, signature),
            );
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http_client.send(request).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received Onshape API response");

        if !status.is_success() {
            return Err(errors::transport_error(response).await);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let value = response.json().await.map_err(|err| {
            PartSyncError::Internal(format!("failed to decode response body: {err}"))
        })?;
        Ok(Some(value))
    }

    /// Execute a signed GET and require a JSON body.
    pub(crate) async fn get_json(&self, url: &str) -> Result<Value> {
        self.execute(Method::GET, url, None).await?.ok_or_else(|| {
            PartSyncError::Internal("expected a JSON response body, got none".to_string())
        })
    }
}

#[async_trait]
impl PartMetadataClient for OnshapeClient {
    async fn update_part_metadata(
        &self,
        reference: &ResolvedReference,
        properties: &[PropertyUpdate],
    ) -> Result<()> {
        // The backend rejects metadata mutation on microversions, so the
        // endpoint is addressed through the normalized selector.
        let selector = reference.selector.for_update();
        let url = format!(
            "{}/api/metadata/d/{}/{}/{}/e/{}/partid/{}",
            self.base_url,
            reference.document_id,
            selector.code(),
            reference.revision_id,
            reference.element_id,
            reference.part_id,
        );
        let payload = serde_json::json!({ "properties": properties });

        self.execute(Method::POST, &url, Some(&payload)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use partsync_domain::RevisionSelector;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn credentials() -> ApiCredentials {
        ApiCredentials {
            access_key: "test-access".to_string(),
            secret_key: "test-secret".to_string(),
        }
    }

    fn client(base_url: String) -> OnshapeClient {
        OnshapeClient::with_config(
            credentials(),
            OnshapeClientConfig { base_url, ..Default::default() },
        )
        .expect("client")
    }

    fn reference(selector: RevisionSelector) -> ResolvedReference {
        ResolvedReference {
            document_id: "doc1".to_string(),
            selector,
            revision_id: "rev1".to_string(),
            element_id: "el1".to_string(),
            part_id: "JHD".to_string(),
        }
    }

    fn name_update() -> Vec<PropertyUpdate> {
        vec![PropertyUpdate {
            property_id: "57f3fb8efa8c52439d51f041".to_string(),
            value: "Bracket".to_string(),
        }]
    }

    #[tokio::test]
    async fn update_sends_wire_exact_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/metadata/d/doc1/w/rev1/e/el1/partid/JHD"))
            .and(header("Accept", ACCEPT_HEADER))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "properties": [
                    {"propertyId": "57f3fb8efa8c52439d51f041", "value": "Bracket"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri());
        client
            .update_part_metadata(&reference(RevisionSelector::Workspace), &name_update())
            .await
            .expect("update succeeds");
    }

    #[tokio::test]
    async fn authorization_header_carries_a_valid_signature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client(server.uri());
        client
            .update_part_metadata(&reference(RevisionSelector::Workspace), &name_update())
            .await
            .expect("update succeeds");

        // Recompute the signature from the nonce and date the client
        // actually sent; the header must match byte for byte.
        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        let nonce = request.headers.get("On-Nonce").unwrap().to_str().unwrap();
        let date = request.headers.get("Date").unwrap().to_str().unwrap();
        let authorization =
            request.headers.get("Authorization").unwrap().to_str().unwrap();

        assert!(nonce.len() >= 20);
        let expected = signing::request_signature(
            "POST",
            nonce,
            date,
            "/api/metadata/d/doc1/w/rev1/e/el1/partid/JHD",
            "",
            "test-secret",
        )
        .expect("signature");
        assert_eq!(authorization, format!("On test-access:HmacSHA256:{expected}"));
    }

    #[tokio::test]
    async fn microversion_reference_addresses_the_workspace_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/metadata/d/doc1/w/rev1/e/el1/partid/JHD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri());
        client
            .update_part_metadata(&reference(RevisionSelector::Microversion), &name_update())
            .await
            .expect("update succeeds");
    }

    #[tokio::test]
    async fn version_reference_passes_through_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/metadata/d/doc1/v/rev1/e/el1/partid/JHD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri());
        client
            .update_part_metadata(&reference(RevisionSelector::Version), &name_update())
            .await
            .expect("update succeeds");
    }

    #[tokio::test]
    async fn no_content_response_yields_no_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let result = client
            .execute(Method::GET, &format!("{}/api/documents", server.uri()), None)
            .await
            .expect("204 is not an error");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn json_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "metadata service exploded"})),
            )
            .mount(&server)
            .await;

        let client = client(server.uri());
        let err = client
            .update_part_metadata(&reference(RevisionSelector::Workspace), &name_update())
            .await
            .expect_err("must fail");

        match err {
            PartSyncError::Transport { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "metadata service exploded");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn plain_text_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such part"))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let err = client
            .update_part_metadata(&reference(RevisionSelector::Workspace), &name_update())
            .await
            .expect_err("must fail");

        match err {
            PartSyncError::Transport { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such part");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn query_string_participates_in_the_signature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = client(server.uri());
        client
            .execute(
                Method::GET,
                &format!("{}/api/documents?limit=50&filter=1", server.uri()),
                None,
            )
            .await
            .expect("request succeeds");

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        let nonce = request.headers.get("On-Nonce").unwrap().to_str().unwrap();
        let date = request.headers.get("Date").unwrap().to_str().unwrap();
        let authorization =
            request.headers.get("Authorization").unwrap().to_str().unwrap();

        let expected = signing::request_signature(
            "GET",
            nonce,
            date,
            "/api/documents",
            "limit=50&filter=1",
            "test-secret",
        )
        .expect("signature");
        assert!(authorization.ends_with(&expected));
    }
}
