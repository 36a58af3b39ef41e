//! # strapi-api-client
//!
//! Core HTTP client infrastructure for the Strapi REST API.
//!
//! This crate provides the transport layer underneath the entry-level API:
//! - A pluggable [`Connector`] abstraction with a reqwest-backed default
//! - Response handling with exactly-once body consumption
//! - Error classification from HTTP status + error envelope
//! - Base-URL normalization and request building
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Application Layer                   │
//! │                 (strapi-api-entries)                │
//! └─────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  ConnectorWrapper                   │
//! │  - Resolves endpoints against the base URL          │
//! │  - Drains each response body exactly once           │
//! │  - Classifies status + body into typed errors       │
//! └─────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────┐
//! │             Connector (DefaultConnector)            │
//! │  - One send() per request, raw response out         │
//! │  - Session reuse or transient per-call session      │
//! │  - Swappable: logging, retry, metrics, caching      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strapi_api_client::{ConnectorWrapper, DefaultConnector};
//!
//! let wrapper = ConnectorWrapper::new(
//!     "http://localhost:1337/api",
//!     Arc::new(DefaultConnector::default()),
//! )?;
//!
//! let value = wrapper
//!     .execute(wrapper.get("posts").bearer_auth("token"), None)
//!     .await?;
//! ```

mod config;
mod connector;
mod error;
mod request;
mod response;
mod wrapper;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use connector::{Connector, DefaultConnector, Session};
pub use error::{Error, ErrorKind, Result};
pub use request::{Method, Request};
pub use response::{classify_response, ErrorDetail, ErrorResponse, RawResponse};
pub use wrapper::ConnectorWrapper;

/// Default API base URL of a local Strapi instance.
pub const DEFAULT_API_URL: &str = "http://localhost:1337/api/";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("strapi-api/", env!("CARGO_PKG_VERSION"));
