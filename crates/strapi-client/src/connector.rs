//! The connector abstraction and its reqwest-backed default.
//!
//! A [`Connector`] sends one request and returns the raw response. It is the
//! seam for swapping transports: wrap [`DefaultConnector`] to add logging,
//! retries, metrics or caching without touching anything above it.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::Request;
use crate::response::RawResponse;

/// A pooled HTTP session handle.
///
/// Wraps a `reqwest::Client` built from a [`ClientConfig`]. Sharing one
/// `Session` across calls reuses its connection pool; dropping it releases
/// the pool.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    /// Build a new session from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Sends one HTTP request and returns the raw, unparsed response.
///
/// Implementations must not classify API errors; a non-2xx status is still
/// an `Ok(RawResponse)`. Only failures that prevented a response from being
/// obtained at all are `Err`.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Send `request`, reusing `session` when one is supplied.
    async fn send(&self, request: &Request, session: Option<&Session>) -> Result<RawResponse>;
}

/// Default connector. Used if no custom connector was given.
#[derive(Debug, Clone, Default)]
pub struct DefaultConnector {
    config: ClientConfig,
}

impl DefaultConnector {
    /// Create a connector with the given transport configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_via(&self, session: &Session, request: &Request) -> Result<RawResponse> {
        let mut req = session
            .client()
            .request(request.method.to_reqwest(), &request.url);

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        if self.config.enable_tracing {
            debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            debug!(status = response.status().as_u16(), "Response received");
        }

        Ok(RawResponse::from_http(response))
    }
}

#[async_trait]
impl Connector for DefaultConnector {
    async fn send(&self, request: &Request, session: Option<&Session>) -> Result<RawResponse> {
        match session {
            Some(session) => self.send_via(session, request).await,
            None => {
                // Transient session: opened for this call, released on drop
                // whether the send succeeds or fails.
                let session = Session::new(&self.config)?;
                self.send_via(&session, request).await
            }
        }
    }
}
