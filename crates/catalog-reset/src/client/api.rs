//! Workspace REST API client.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use super::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::credentials::{CredentialResolver, EndpointCredentials};
use crate::error::ResetError;

/// Authenticated client for the workspace management API.
///
/// A 404 answer is reported as `Ok(None)`: removing or probing something that
/// is already gone succeeds, which keeps every cleanup step repeatable.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: EndpointCredentials,
}

impl ApiClient {
    /// Create a client backed by `reqwest` with the given request timeout.
    pub fn new(credentials: EndpointCredentials, timeout: Duration) -> Result<Self, ResetError> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(credentials: EndpointCredentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Resolve credentials and build a `reqwest`-backed client.
    ///
    /// No transport exists until resolution succeeds, so a credentials error
    /// means nothing was sent.
    pub fn connect(resolver: &CredentialResolver, timeout: Duration) -> Result<Self, ResetError> {
        let credentials = resolver.resolve()?.clone();
        Self::new(credentials, timeout)
    }

    /// Resolve credentials and build a client over `transport`.
    pub fn connect_with_transport(
        resolver: &CredentialResolver,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ResetError> {
        let credentials = resolver.resolve()?.clone();
        Ok(Self::with_transport(credentials, transport))
    }

    /// Workspace base URL.
    pub fn host(&self) -> &str {
        self.credentials.host()
    }

    /// Call an API endpoint and return its decoded JSON body.
    ///
    /// Returns `Ok(None)` for a 404 or an empty success body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, ResetError> {
        self.request_with_headers(method, path, query, body, HeaderMap::new())
            .await
    }

    /// Like [`ApiClient::request`], with extra headers.
    ///
    /// An extra header replaces a default header of the same name; defaults
    /// that are not overridden are always sent.
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
        extra_headers: HeaderMap,
    ) -> Result<Option<serde_json::Value>, ResetError> {
        let mut headers = self.default_headers()?;
        for (name, value) in extra_headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let url = format!("{}{}", self.host(), path);
        tracing::debug!(method = %method, url = %url, "Workspace API request");

        let request = HttpRequest {
            method,
            url,
            headers,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        };

        let response = self.transport.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "Resource not found");
            return Ok(None);
        }

        if !response.status.is_success() {
            return Err(ResetError::Api {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        if response.body.is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&response.body)
            .map_err(|e| ResetError::Decode(format!("Invalid JSON from {}: {}", path, e)))?;
        Ok(Some(value))
    }

    fn default_headers(&self) -> Result<HeaderMap, ResetError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.credentials.token()))
            .map_err(|_| {
                ResetError::Credentials("Access token contains invalid header characters".to_string())
            })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}
