//! Error types for strapi-api-client.

/// Result type alias for strapi-api-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for strapi-api-client operations.
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

    /// Returns true if this error is a 404 from the API.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }

    /// Returns true if this error is a 400 from the API.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    /// Returns true if this is an authentication/authorization error (401 or 403).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Unauthorized(_) | ErrorKind::Forbidden(_)
        )
    }

    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// The HTTP status this error was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Validation(_) => Some(400),
            ErrorKind::Unauthorized(_) => Some(401),
            ErrorKind::Forbidden(_) => Some(403),
            ErrorKind::NotFound(_) => Some(404),
            ErrorKind::Api { status, .. } => Some(*status),
            ErrorKind::JsonParsing { status, .. } => Some(*status),
            ErrorKind::Transport(_) | ErrorKind::Config(_) => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Request body or parameters rejected (HTTP 400).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx API response.
    #[error("API error: {status} {message}")]
    Api { status: u16, message: String },

    /// Response body was not valid JSON.
    #[error("Unable to parse response as JSON, status code: {status}, response: {body}")]
    JsonParsing { status: u16, body: String },

    /// Request failed before any response was obtained (DNS, connection, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorKind {
    /// Map an HTTP status to the matching error kind.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => ErrorKind::Validation(message),
            401 => ErrorKind::Unauthorized(message),
            403 => ErrorKind::Forbidden(message),
            404 => ErrorKind::NotFound(message),
            _ => ErrorKind::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}
