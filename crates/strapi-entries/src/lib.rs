//! # strapi-api-entries
//!
//! Entry operations for the Strapi REST API.
//!
//! ## Features
//!
//! - **CRUD** - get, list, create, update, delete entries in any collection
//! - **Upsert** - create-or-update keyed on chosen attribute fields
//! - **Batch mode** - transparently fetch and concatenate all pages
//! - **Query directives** - filters, sort, populate, field selection and
//!   publication state, flattened to bracket-notation parameters
//! - **Authentication** - local login plus bearer-token injection
//! - **Blocking variant** - the same surface without an async runtime
//!
//! ## Example
//!
//! ```rust,ignore
//! use strapi_api_entries::{EntriesQuery, ParamValue, StrapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), strapi_api_entries::Error> {
//!     let mut client = StrapiClient::with_api_url("http://localhost:1337/api")?;
//!     client.authorize("author@strapi.io", "strapi").await?;
//!
//!     // One page
//!     let posts = client.get_entries("posts", &EntriesQuery::new()).await?;
//!
//!     // Every page, stitched together
//!     let all = client
//!         .get_all_entries("posts", &EntriesQuery::new(), 100)
//!         .await?;
//!
//!     // Create-or-update by name
//!     client
//!         .upsert_entry(
//!             "posts",
//!             serde_json::json!({"name": "Unique Name", "description": "blabla"}),
//!             &["name"],
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod blocking;
mod client;
mod error;
mod params;
mod types;

pub use blocking::BlockingStrapiClient;
pub use client::{
    EntriesQuery, EntryQuery, StrapiClient, StrapiClientBuilder, DEFAULT_BATCH_SIZE,
};
pub use error::{Error, ErrorKind, Result};
pub use params::{stringify_parameters, ParamValue, PublicationState};
pub use types::{EntriesResponse, Entry, EntryResponse, Meta, Pagination};

// Core types needed to configure or extend the client.
pub use strapi_api_client::{ClientConfig, Connector, DefaultConnector, Session};
