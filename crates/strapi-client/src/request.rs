//! HTTP request description.
//!
//! `Request` is a plain value so that custom [`Connector`](crate::Connector)
//! implementations can inspect every part of it when executing the call.

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// The wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request, ready for a connector to send.
///
/// Query parameters are kept as an ordered pair list; values are sent as-is
/// and URL-encoded by the transport, never earlier.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Query parameters in insertion order, unencoded.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
    /// Optional bearer token for the Authorization header.
    pub bearer_token: Option<String>,
}

impl Request {
    /// Create a new request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            bearer_token: None,
        }
    }

    /// Add a single query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add query parameters, preserving their order.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the bearer token for authentication.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the bearer token if one is available.
    pub fn bearer_auth_opt(mut self, token: Option<&str>) -> Self {
        self.bearer_token = token.map(str::to_owned);
        self
    }

    /// Human-readable description of the attempted call, for error messages.
    pub fn action(&self) -> String {
        format!("send {} to {}", self.method, self.url)
    }
}
