//! # strapi-api
//!
//! A Strapi REST API client library for Rust.
//!
//! This library provides typed access to Strapi collections with
//! bearer-token authentication, transparent pagination batching and
//! classified errors.
//!
//! ## Crates
//!
//! - **strapi-api-client** - Core HTTP infrastructure: the pluggable
//!   connector, response handling, error classification
//! - **strapi-api-entries** - Entry operations: CRUD, upsert, batch
//!   pagination, authentication, and the blocking variant
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strapi_api::{EntriesQuery, ParamValue, StrapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = StrapiClient::with_api_url("http://localhost:1337/api")?;
//!     client.authorize("author@strapi.io", "strapi").await?;
//!
//!     let posts = client
//!         .get_entries(
//!             "posts",
//!             &EntriesQuery::new()
//!                 .with_filters(ParamValue::nested([("name", ParamValue::eq("The Name"))])),
//!         )
//!         .await?;
//!
//!     for entry in posts.data.unwrap_or_default() {
//!         println!("{}", entry.id);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export crates for convenient access
#[cfg(feature = "client")]
pub use strapi_api_client as client;
#[cfg(feature = "entries")]
pub use strapi_api_entries as entries;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use strapi_api_client::{ClientConfig, Connector, DefaultConnector, Session};
#[cfg(feature = "entries")]
pub use strapi_api_entries::{
    BlockingStrapiClient, EntriesQuery, Entry, EntryQuery, ParamValue, PublicationState,
    StrapiClient,
};
