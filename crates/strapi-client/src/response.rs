//! HTTP response handling and error classification.

use bytes::Bytes;
use serde::Deserialize;

use crate::error::{Error, ErrorKind, Result};

/// Internal response backend.
#[derive(Debug)]
enum InnerResponse {
    /// A live response whose body has not been read yet.
    Http(reqwest::Response),
    /// An already-buffered body, used by custom connectors and test doubles.
    Parts(Bytes),
}

/// Raw HTTP response: status plus an unconsumed body.
///
/// The body can be read exactly once; [`RawResponse::text`] consumes the
/// response, so a double read is a compile error rather than a runtime bug.
#[derive(Debug)]
pub struct RawResponse {
    status: u16,
    inner: InnerResponse,
}

impl RawResponse {
    /// Wrap a live reqwest response.
    pub fn from_http(response: reqwest::Response) -> Self {
        Self {
            status: response.status().as_u16(),
            inner: InnerResponse::Http(response),
        }
    }

    /// Build a response from already-buffered parts.
    pub fn from_parts(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            inner: InnerResponse::Parts(body.into()),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the response body as text, consuming the response.
    pub async fn text(self) -> Result<String> {
        match self.inner {
            InnerResponse::Http(resp) => resp.text().await.map_err(Into::into),
            InnerResponse::Parts(body) => Ok(String::from_utf8_lossy(&body).into_owned()),
        }
    }
}

/// Error envelope returned by the API for failed requests.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// The error object inside a failure envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Classify a decoded response into parsed data or a typed error.
///
/// Pure given its inputs: `status` and the body text decide the outcome,
/// `action` only feeds error messages. A body that is not valid JSON wins
/// over any status-based mapping, since the envelope cannot be inspected.
pub fn classify_response(status: u16, body: &str, action: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            return Err(Error::with_source(
                ErrorKind::JsonParsing {
                    status,
                    body: body.to_string(),
                },
                err,
            ));
        }
    };

    if (200..300).contains(&status) {
        return Ok(value);
    }

    let message = match serde_json::from_value::<ErrorResponse>(value) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => format!("Unable to {action}, error {status}"),
    };

    Err(Error::new(ErrorKind::from_status(status, message)))
}
