//! Error types for strapi-api-entries.

/// Result type alias for strapi-api-entries operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for strapi-api-entries operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The underlying client error, when this error came from the HTTP layer.
    pub fn as_client(&self) -> Option<&strapi_api_client::Error> {
        match &self.kind {
            ErrorKind::Client(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the API reported a 404 for the requested entry.
    pub fn is_not_found(&self) -> bool {
        self.as_client().is_some_and(|e| e.is_not_found())
    }

    /// Returns true if the API rejected the request body or parameters (400).
    pub fn is_validation(&self) -> bool {
        self.as_client().is_some_and(|e| e.is_validation())
    }

    /// Returns true for 401/403 responses and failed authorization.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth(_))
            || self.as_client().is_some_and(|e| e.is_auth_error())
    }

    /// Returns true if an upsert matched more than one entry.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.kind, ErrorKind::AmbiguousKeys { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Error from the underlying HTTP client layer.
    #[error("{0}")]
    Client(strapi_api_client::Error),

    /// Authorization did not produce a usable token.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// An upsert key filter matched more than one entry.
    #[error("Keys are ambiguous, found {count} records")]
    AmbiguousKeys { count: u64 },

    /// An upsert key field is absent from the provided data.
    #[error("Upsert key not present in data: {field}")]
    MissingKey { field: String },

    /// The API answered with a shape this client cannot use.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// The blocking runtime could not be created.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<strapi_api_client::Error> for Error {
    fn from(err: strapi_api_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err),
            source: None,
        }
    }
}
