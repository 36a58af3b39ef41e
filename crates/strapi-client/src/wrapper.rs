//! Wrapper around the connector.
//!
//! Resolves endpoints against the configured base URL, sends requests via
//! the [`Connector`], drains each response body exactly once and turns the
//! result into parsed data or a classified error.

use std::sync::Arc;

use crate::connector::{Connector, Session};
use crate::error::Result;
use crate::request::{Method, Request};
use crate::response::classify_response;

/// Sends requests through a [`Connector`] and classifies the responses.
#[derive(Clone)]
pub struct ConnectorWrapper {
    api_url: String,
    connector: Arc<dyn Connector>,
}

impl std::fmt::Debug for ConnectorWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorWrapper")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ConnectorWrapper {
    /// Create a wrapper for the given base URL and connector.
    ///
    /// The base URL is validated and normalized to end with exactly one
    /// trailing `/`; passing an already-normalized URL is a no-op.
    pub fn new(api_url: impl Into<String>, connector: Arc<dyn Connector>) -> Result<Self> {
        let api_url = normalize_api_url(api_url.into())?;
        Ok(Self { api_url, connector })
    }

    /// The normalized base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resolve an endpoint against the base URL.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint.trim_start_matches('/'))
    }

    /// Create a GET request for an endpoint.
    pub fn get(&self, endpoint: &str) -> Request {
        Request::new(Method::Get, self.endpoint_url(endpoint))
    }

    /// Create a POST request for an endpoint.
    pub fn post(&self, endpoint: &str) -> Request {
        Request::new(Method::Post, self.endpoint_url(endpoint))
    }

    /// Create a PUT request for an endpoint.
    pub fn put(&self, endpoint: &str) -> Request {
        Request::new(Method::Put, self.endpoint_url(endpoint))
    }

    /// Create a DELETE request for an endpoint.
    pub fn delete(&self, endpoint: &str) -> Request {
        Request::new(Method::Delete, self.endpoint_url(endpoint))
    }

    /// Send a request and return the parsed JSON payload.
    ///
    /// The response body is consumed exactly once on every path. When it
    /// cannot be read at all, the status reason phrase stands in so the
    /// classifier still has something to report.
    pub async fn execute(
        &self,
        request: Request,
        session: Option<&Session>,
    ) -> Result<serde_json::Value> {
        let action = request.action();
        let response = self.connector.send(&request, session).await?;
        let status = response.status();

        let body = match response.text().await {
            Ok(text) => text,
            Err(_) => reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("<no response body>")
                .to_string(),
        };

        classify_response(status, &body, &action)
    }
}

fn normalize_api_url(mut api_url: String) -> Result<String> {
    url::Url::parse(&api_url)?;
    if !api_url.ends_with('/') {
        api_url.push('/');
    }
    Ok(api_url)
}
