//! Blocking variant of the entry client.
//!
//! A thin scheduling adapter: every method drives its async twin on a
//! private current-thread runtime, so the two variants cannot drift apart.
//! Must not be used from inside an async context.

use crate::client::{EntriesQuery, EntryQuery, StrapiClient, StrapiClientBuilder};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{EntriesResponse, EntryResponse};

/// Blocking REST API client for Strapi entry collections.
///
/// Each call occupies the calling thread for the duration of the request.
/// For parallelism, give each thread its own client.
#[derive(Debug)]
pub struct BlockingStrapiClient {
    inner: StrapiClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingStrapiClient {
    /// Create a blocking client against the default local API URL.
    pub fn new() -> Result<Self> {
        Self::from_async(StrapiClient::new()?)
    }

    /// Create a blocking client against the given API base URL.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self> {
        Self::from_async(StrapiClient::with_api_url(api_url)?)
    }

    /// Create a client builder; finish with [`Self::from_async`].
    pub fn builder() -> StrapiClientBuilder {
        StrapiClient::builder()
    }

    /// Wrap an async client in a blocking adapter.
    pub fn from_async(inner: StrapiClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| {
                Error::with_source(
                    ErrorKind::Runtime("failed to build blocking runtime".to_string()),
                    err,
                )
            })?;
        Ok(Self { inner, runtime })
    }

    /// The normalized API base URL.
    pub fn api_url(&self) -> &str {
        self.inner.api_url()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.inner.token()
    }

    /// Replace the bearer token used for subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.inner.set_token(token);
    }

    /// Log in with local credentials and store the returned token.
    pub fn authorize(&mut self, identifier: &str, password: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.authorize(identifier, password))
    }

    /// Get one entry by id.
    pub fn get_entry(&self, plural_api_id: &str, document_id: i64) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.get_entry(plural_api_id, document_id))
    }

    /// Get one entry by id, with population and field selection.
    pub fn get_entry_with(
        &self,
        plural_api_id: &str,
        document_id: i64,
        query: &EntryQuery,
    ) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.get_entry_with(plural_api_id, document_id, query))
    }

    /// Get one page of entries.
    pub fn get_entries(
        &self,
        plural_api_id: &str,
        query: &EntriesQuery,
    ) -> Result<EntriesResponse> {
        self.runtime
            .block_on(self.inner.get_entries(plural_api_id, query))
    }

    /// Get every page of entries, concatenated in page order.
    pub fn get_all_entries(
        &self,
        plural_api_id: &str,
        query: &EntriesQuery,
        batch_size: u64,
    ) -> Result<EntriesResponse> {
        self.runtime
            .block_on(self.inner.get_all_entries(plural_api_id, query, batch_size))
    }

    /// Create a new entry.
    pub fn create_entry(
        &self,
        plural_api_id: &str,
        data: serde_json::Value,
    ) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.create_entry(plural_api_id, data))
    }

    /// Update entry fields.
    pub fn update_entry(
        &self,
        plural_api_id: &str,
        document_id: i64,
        data: serde_json::Value,
    ) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.update_entry(plural_api_id, document_id, data))
    }

    /// Delete an entry by id. Returns the deleted entry.
    pub fn delete_entry(&self, plural_api_id: &str, document_id: i64) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.delete_entry(plural_api_id, document_id))
    }

    /// Create an entry, or update the one matching `keys`.
    pub fn upsert_entry(
        &self,
        plural_api_id: &str,
        data: serde_json::Value,
        keys: &[&str],
    ) -> Result<EntryResponse> {
        self.runtime
            .block_on(self.inner.upsert_entry(plural_api_id, data, keys))
    }
}
