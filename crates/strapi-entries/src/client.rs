//! Strapi entry client: CRUD, upsert, authentication, batch pagination.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use strapi_api_client::{
    ClientConfig, Connector, ConnectorWrapper, DefaultConnector, Request, Session, DEFAULT_API_URL,
};

use crate::error::{Error, ErrorKind, Result};
use crate::params::{stringify_parameters, ParamValue, PublicationState};
use crate::types::{EntriesResponse, EntryResponse};

/// Default page size used by batch mode.
pub const DEFAULT_BATCH_SIZE: u64 = 100;

/// Query directives for fetching a single entry.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    /// Relations to expand inline.
    pub populate: Option<ParamValue>,
    /// Attribute names to select.
    pub fields: Option<Vec<String>>,
}

impl EntryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand the given relations inline.
    pub fn with_populate(mut self, populate: impl Into<ParamValue>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    /// Select only the given attributes.
    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Query directives for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntriesQuery {
    /// Sort directives, e.g. `["name:desc"]`.
    pub sort: Option<Vec<String>>,
    /// Filter tree, flattened to `filters[...]` parameters.
    pub filters: Option<ParamValue>,
    /// Relations to expand inline.
    pub populate: Option<ParamValue>,
    /// Attribute names to select.
    pub fields: Option<Vec<String>>,
    /// Pagination directives, e.g. `{page, pageSize}` or `{limit}`.
    pub pagination: Option<ParamValue>,
    /// Draft/published visibility.
    pub publication_state: Option<PublicationState>,
}

impl EntriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by the given directives.
    pub fn with_sort<I>(mut self, sort: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.sort = Some(sort.into_iter().map(Into::into).collect());
        self
    }

    /// Filter entries by the given tree.
    pub fn with_filters(mut self, filters: impl Into<ParamValue>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Expand the given relations inline.
    pub fn with_populate(mut self, populate: impl Into<ParamValue>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    /// Select only the given attributes.
    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Request a specific page window.
    pub fn with_pagination(mut self, pagination: impl Into<ParamValue>) -> Self {
        self.pagination = Some(pagination.into());
        self
    }

    /// Select draft vs. published visibility.
    pub fn with_publication_state(mut self, state: PublicationState) -> Self {
        self.publication_state = Some(state);
        self
    }

    /// Flatten into wire pairs. Assembly order is fixed so identical
    /// queries always serialize identically.
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let sort = self.sort.clone().map(ParamValue::List);
        params.extend(stringify_parameters("sort", sort.as_ref()));
        params.extend(stringify_parameters("filters", self.filters.as_ref()));
        params.extend(stringify_parameters("pagination", self.pagination.as_ref()));
        params.extend(stringify_parameters("populate", self.populate.as_ref()));
        let fields = self.fields.clone().map(ParamValue::List);
        params.extend(stringify_parameters("fields", fields.as_ref()));
        let publication_state = self.publication_state.map(ParamValue::from);
        params.extend(stringify_parameters(
            "publicationState",
            publication_state.as_ref(),
        ));
        params
    }
}

/// REST API client for Strapi entry collections.
///
/// Only the bearer token is mutable after construction; it is not
/// synchronized. Share one client per concurrent context, or guard
/// `authorize`/`set_token` externally.
///
/// # Example
///
/// ```rust,ignore
/// use strapi_api_entries::{EntriesQuery, ParamValue, StrapiClient};
///
/// let mut client = StrapiClient::with_api_url("http://localhost:1337/api")?;
/// client.authorize("author@strapi.io", "strapi").await?;
///
/// let posts = client
///     .get_entries(
///         "posts",
///         &EntriesQuery::new()
///             .with_filters(ParamValue::nested([("name", ParamValue::eq("The Name"))]))
///             .with_sort(["name:desc"]),
///     )
///     .await?;
/// ```
#[derive(Clone)]
pub struct StrapiClient {
    wrapper: ConnectorWrapper,
    config: ClientConfig,
    token: Option<String>,
}

impl std::fmt::Debug for StrapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrapiClient")
            .field("api_url", &self.wrapper.api_url())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Builder for [`StrapiClient`].
pub struct StrapiClientBuilder {
    api_url: String,
    token: Option<String>,
    config: ClientConfig,
    connector: Option<Arc<dyn Connector>>,
}

impl Default for StrapiClientBuilder {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            config: ClientConfig::default(),
            connector: None,
        }
    }
}

impl StrapiClientBuilder {
    /// Set the API base URL. A trailing `/` is appended if missing.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Start with an existing bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the transport configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom connector instead of the reqwest-backed default.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<StrapiClient> {
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(DefaultConnector::new(self.config.clone())));
        let wrapper = ConnectorWrapper::new(self.api_url, connector).map_err(Error::from)?;
        Ok(StrapiClient {
            wrapper,
            config: self.config,
            token: self.token,
        })
    }
}

impl StrapiClient {
    /// Create a client against the default local API URL.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client against the given API base URL.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self> {
        Self::builder().with_api_url(api_url).build()
    }

    /// Create a client builder.
    pub fn builder() -> StrapiClientBuilder {
        StrapiClientBuilder::default()
    }

    /// The normalized API base URL.
    pub fn api_url(&self) -> &str {
        self.wrapper.api_url()
    }

    /// The transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the bearer token used for subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Log in with local credentials and store the returned token.
    ///
    /// Fails if the response carries no token; the previous token is kept
    /// in that case.
    #[instrument(skip(self, identifier, password))]
    pub async fn authorize(&mut self, identifier: &str, password: &str) -> Result<()> {
        let body = serde_json::json!({
            "identifier": identifier,
            "password": password,
        });
        let value = self
            .wrapper
            .execute(self.wrapper.post("auth/local").json(body), None)
            .await
            .map_err(Error::from)?;
        let auth: AuthResponse = parse_response(value, "authorization response")?;

        match auth.jwt {
            Some(jwt) if !jwt.is_empty() => {
                debug!("Stored bearer token from authorization");
                self.token = Some(jwt);
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::Auth(
                "no JWT token in response".to_string(),
            ))),
        }
    }

    /// Get one entry by id.
    pub async fn get_entry(&self, plural_api_id: &str, document_id: i64) -> Result<EntryResponse> {
        self.get_entry_with(plural_api_id, document_id, &EntryQuery::default())
            .await
    }

    /// Get one entry by id, with population and field selection.
    #[instrument(skip(self, query))]
    pub async fn get_entry_with(
        &self,
        plural_api_id: &str,
        document_id: i64,
        query: &EntryQuery,
    ) -> Result<EntryResponse> {
        let mut params = Vec::new();
        params.extend(stringify_parameters("populate", query.populate.as_ref()));
        let fields = query.fields.clone().map(ParamValue::List);
        params.extend(stringify_parameters("fields", fields.as_ref()));

        let endpoint = format!("{plural_api_id}/{document_id}");
        let value = self
            .execute(self.wrapper.get(&endpoint).query_pairs(params), None)
            .await?;
        parse_response(value, "entry")
    }

    /// Get one page of entries.
    #[instrument(skip(self, query))]
    pub async fn get_entries(
        &self,
        plural_api_id: &str,
        query: &EntriesQuery,
    ) -> Result<EntriesResponse> {
        let value = self
            .execute(
                self.wrapper.get(plural_api_id).query_pairs(query.to_params()),
                None,
            )
            .await?;
        parse_response(value, "entries list")
    }

    /// Get every page of entries, concatenated in page order.
    ///
    /// All page requests share one session, opened before the loop and
    /// released when the call returns, on success and failure alike. The
    /// loop terminates against the page count reported by the most recent
    /// page, so a server adjusting counts under concurrent writes moves
    /// the goalposts rather than breaking the loop. Any page failure
    /// aborts the whole call; no partial result is returned.
    #[instrument(skip(self, query))]
    pub async fn get_all_entries(
        &self,
        plural_api_id: &str,
        query: &EntriesQuery,
        batch_size: u64,
    ) -> Result<EntriesResponse> {
        let mut params = query.to_params();
        let session = Session::new(&self.config).map_err(Error::from)?;

        let mut result = self
            .fetch_page(plural_api_id, &mut params, 1, batch_size, &session)
            .await?;
        let mut page: u64 = 2;

        loop {
            let page_count = result
                .meta
                .pagination
                .as_ref()
                .ok_or_else(|| {
                    Error::new(ErrorKind::UnexpectedResponse(
                        "batch response without pagination metadata".to_string(),
                    ))
                })?
                .page_count;
            if page > page_count {
                break;
            }

            let next = self
                .fetch_page(plural_api_id, &mut params, page, batch_size, &session)
                .await?;
            let EntriesResponse { data, meta } = next;
            if let (Some(collected), Some(data)) = (result.data.as_mut(), data) {
                collected.extend(data);
            }
            result.meta = meta;
            page += 1;
        }

        debug!(
            pages = page - 1,
            entries = result.data.as_ref().map(|d| d.len()).unwrap_or(0),
            "Fetched all pages"
        );
        Ok(result)
    }

    /// Create a new entry.
    #[instrument(skip(self, data))]
    pub async fn create_entry(
        &self,
        plural_api_id: &str,
        data: serde_json::Value,
    ) -> Result<EntryResponse> {
        let body = serde_json::json!({ "data": data });
        let value = self
            .execute(self.wrapper.post(plural_api_id).json(body), None)
            .await?;
        parse_response(value, "created entry")
    }

    /// Update entry fields. Attributes absent from `data` keep their
    /// server-side values.
    #[instrument(skip(self, data))]
    pub async fn update_entry(
        &self,
        plural_api_id: &str,
        document_id: i64,
        data: serde_json::Value,
    ) -> Result<EntryResponse> {
        let endpoint = format!("{plural_api_id}/{document_id}");
        let body = serde_json::json!({ "data": data });
        let value = self
            .execute(self.wrapper.put(&endpoint).json(body), None)
            .await?;
        parse_response(value, "updated entry")
    }

    /// Delete an entry by id. Returns the deleted entry.
    #[instrument(skip(self))]
    pub async fn delete_entry(
        &self,
        plural_api_id: &str,
        document_id: i64,
    ) -> Result<EntryResponse> {
        let endpoint = format!("{plural_api_id}/{document_id}");
        let value = self.execute(self.wrapper.delete(&endpoint), None).await?;
        parse_response(value, "deleted entry")
    }

    /// Create an entry, or update the one whose `keys` fields equal the
    /// corresponding values in `data`.
    ///
    /// The match probe and the write are two round trips; concurrent
    /// upserts on the same keys can race. Matching more than one entry is
    /// an [`ErrorKind::AmbiguousKeys`] error and nothing is written.
    #[instrument(skip(self, data))]
    pub async fn upsert_entry(
        &self,
        plural_api_id: &str,
        data: serde_json::Value,
        keys: &[&str],
    ) -> Result<EntryResponse> {
        let mut filters = Vec::with_capacity(keys.len());
        for &key in keys {
            let value = data.get(key).ok_or_else(|| {
                Error::new(ErrorKind::MissingKey {
                    field: key.to_string(),
                })
            })?;
            filters.push((key.to_string(), ParamValue::eq(filter_value(value))));
        }

        let probe = EntriesQuery {
            filters: Some(ParamValue::Nested(filters)),
            fields: Some(vec!["id".to_string()]),
            pagination: Some(ParamValue::nested([
                ("page", ParamValue::from(1u64)),
                ("pageSize", ParamValue::from(2u64)),
            ])),
            ..EntriesQuery::default()
        };
        let current = self.get_entries(plural_api_id, &probe).await?;

        let total = current
            .meta
            .pagination
            .as_ref()
            .ok_or_else(|| {
                Error::new(ErrorKind::UnexpectedResponse(
                    "match probe without pagination metadata".to_string(),
                ))
            })?
            .total;

        if total > 1 {
            return Err(Error::new(ErrorKind::AmbiguousKeys { count: total }));
        }

        if total == 1 {
            let document_id = current
                .data
                .as_ref()
                .and_then(|entries| entries.first())
                .map(|entry| entry.id)
                .ok_or_else(|| {
                    Error::new(ErrorKind::UnexpectedResponse(
                        "match probe reported one entry but returned none".to_string(),
                    ))
                })?;
            self.update_entry(plural_api_id, document_id, data).await
        } else {
            self.create_entry(plural_api_id, data).await
        }
    }

    /// Send a request with the stored bearer token attached.
    async fn execute(
        &self,
        request: Request,
        session: Option<&Session>,
    ) -> Result<serde_json::Value> {
        self.wrapper
            .execute(request.bearer_auth_opt(self.token.as_deref()), session)
            .await
            .map_err(Error::from)
    }

    async fn fetch_page(
        &self,
        plural_api_id: &str,
        params: &mut Vec<(String, String)>,
        page: u64,
        batch_size: u64,
        session: &Session,
    ) -> Result<EntriesResponse> {
        let pagination = ParamValue::nested([
            ("page", ParamValue::from(page)),
            ("pageSize", ParamValue::from(batch_size)),
        ]);
        for (key, value) in stringify_parameters("pagination", Some(&pagination)) {
            set_param(params, &key, value);
        }

        let request = self.wrapper.get(plural_api_id).query_pairs(params.clone());
        let value = self.execute(request, Some(session)).await?;
        parse_response(value, "entries page")
    }
}

/// Replace a parameter in place, or append it. Keeps an existing key's
/// position, so re-paginated batch requests serialize stably.
fn set_param(params: &mut Vec<(String, String)>, key: &str, value: String) {
    if let Some(slot) = params.iter_mut().find(|(name, _)| name == key) {
        slot.1 = value;
    } else {
        params.push((key.to_string(), value));
    }
}

/// Stringify a JSON value for use in an equality filter.
fn filter_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_response<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| Error::with_source(ErrorKind::UnexpectedResponse(what.to_string()), err))
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    jwt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Match, Mock, MockServer, ResponseTemplate};

    fn entry_body(id: i64, attributes: serde_json::Value) -> serde_json::Value {
        serde_json::json!({"data": {"id": id, "attributes": attributes}, "meta": {}})
    }

    fn entries_body(
        ids: &[i64],
        page: u64,
        page_size: u64,
        page_count: u64,
        total: u64,
    ) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "attributes": {"name": format!("n{id}")}}))
            .collect();
        serde_json::json!({
            "data": data,
            "meta": {"pagination": {
                "page": page, "pageSize": page_size, "pageCount": page_count, "total": total
            }}
        })
    }

    async fn client_for(server: &MockServer) -> StrapiClient {
        StrapiClient::with_api_url(format!("{}/api", server.uri())).unwrap()
    }

    /// Matches requests that carry no Authorization header at all.
    struct NoAuthHeader;

    impl Match for NoAuthHeader {
        fn matches(&self, request: &wiremock::Request) -> bool {
            !request.headers.contains_key("authorization")
        }
    }

    #[tokio::test]
    async fn test_get_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts/7"))
            .and(NoAuthHeader)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(7, serde_json::json!({"title": "T"}))),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.get_entry("posts", 7).await.unwrap();
        let entry = response.data.unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.attributes["title"], "T");
    }

    #[tokio::test]
    async fn test_get_entry_with_populate_and_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts/7"))
            .and(query_param("populate", "*"))
            .and(query_param("fields", "description"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(7, serde_json::json!({"description": "d"}))),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = EntryQuery::new()
            .with_populate(ParamValue::scalar("*"))
            .with_fields(["description"]);
        let response = client.get_entry_with("posts", 7, &query).await.unwrap();
        assert!(response.data.is_some());
    }

    #[tokio::test]
    async fn test_get_entry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "data": null,
                "error": {"status": 404, "name": "NotFoundError", "message": "Not Found", "details": {}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_entry("posts", 999).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_entries_flattens_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("sort", "name:desc"))
            .and(query_param("filters[name][$eq]", "The Name"))
            .and(query_param("publicationState", "preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&[1], 1, 25, 1, 1)))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = EntriesQuery::new()
            .with_sort(["name:desc"])
            .with_filters(ParamValue::nested([("name", ParamValue::eq("The Name"))]))
            .with_publication_state(PublicationState::Preview);
        let response = client.get_entries("posts", &query).await.unwrap();
        assert_eq!(response.data.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts/1"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(entry_body(1, serde_json::json!({}))),
            )
            .mount(&server)
            .await;

        let mut client = client_for(&server).await;
        client.set_token("secret-token");
        client.get_entry("posts", 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_authorize_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/local"))
            .and(body_json(serde_json::json!({
                "identifier": "author@strapi.io",
                "password": "strapi"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jwt": "issued-token",
                "user": {"id": 1}
            })))
            .mount(&server)
            .await;

        let mut client = client_for(&server).await;
        client.authorize("author@strapi.io", "strapi").await.unwrap();
        assert_eq!(client.token(), Some("issued-token"));
    }

    #[tokio::test]
    async fn test_authorize_without_jwt_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/local"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": {"id": 1}})),
            )
            .mount(&server)
            .await;

        let mut client = client_for(&server).await;
        let err = client.authorize("author@strapi.io", "strapi").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Auth(_)));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .and(body_json(serde_json::json!({"data": {"title": "T"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(7, serde_json::json!({"title": "T"}))),
            )
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/posts/7"))
            .and(body_json(serde_json::json!({"data": {"title": "U"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(7, serde_json::json!({"title": "U"}))),
            )
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/posts/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(7, serde_json::json!({"title": "U"}))),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        let created = client
            .create_entry("posts", serde_json::json!({"title": "T"}))
            .await
            .unwrap();
        assert_eq!(created.data.unwrap().id, 7);

        let updated = client
            .update_entry("posts", 7, serde_json::json!({"title": "U"}))
            .await
            .unwrap();
        assert_eq!(updated.data.unwrap().attributes["title"], "U");

        let deleted = client.delete_entry("posts", 7).await.unwrap();
        assert_eq!(deleted.data.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_get_all_entries_concatenates_pages() {
        let server = MockServer::start().await;

        let pages: Vec<(u64, Vec<i64>)> = vec![(1, vec![1, 2]), (2, vec![3, 4]), (3, vec![5])];
        for (page, ids) in &pages {
            Mock::given(method("GET"))
                .and(path("/api/items"))
                .and(query_param("pagination[page]", page.to_string()))
                .and(query_param("pagination[pageSize]", "2"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(entries_body(ids, *page, 2, 3, 5)),
                )
                .mount(&server)
                .await;
        }

        let client = client_for(&server).await;
        let response = client
            .get_all_entries("items", &EntriesQuery::default(), 2)
            .await
            .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data.iter().map(|e| e.id).collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
        let pagination = response.meta.pagination.unwrap();
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.total, 5);
    }

    #[tokio::test]
    async fn test_get_all_entries_aborts_on_page_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(query_param("pagination[page]", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(entries_body(&[1, 2], 1, 2, 3, 5)),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(query_param("pagination[page]", "2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"status": 500, "name": "InternalServerError", "message": "boom"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .get_all_entries("items", &EntriesQuery::default(), 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_client().map(|e| e.status()),
            Some(Some(500))
        ));
    }

    #[tokio::test]
    async fn test_upsert_creates_when_no_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("filters[name][$eq]", "Unique"))
            .and(query_param("pagination[pageSize]", "2"))
            .and(query_param("fields", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&[], 1, 2, 0, 0)))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .and(body_json(serde_json::json!({
                "data": {"name": "Unique", "description": "blabla"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(11, serde_json::json!({"name": "Unique"}))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client
            .upsert_entry(
                "posts",
                serde_json::json!({"name": "Unique", "description": "blabla"}),
                &["name"],
            )
            .await
            .unwrap();
        assert_eq!(response.data.unwrap().id, 11);
    }

    #[tokio::test]
    async fn test_upsert_updates_single_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("filters[name][$eq]", "Unique"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entries_body(&[5], 1, 2, 1, 1)))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/posts/5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry_body(5, serde_json::json!({"name": "Unique"}))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client
            .upsert_entry("posts", serde_json::json!({"name": "Unique"}), &["name"])
            .await
            .unwrap();
        assert_eq!(response.data.unwrap().id, 5);
    }

    #[tokio::test]
    async fn test_upsert_ambiguous_match_writes_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(entries_body(&[5, 6], 1, 2, 1, 2)),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(wiremock::matchers::path_regex(r"^/api/posts/\d+$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .upsert_entry("posts", serde_json::json!({"name": "Dup"}), &["name"])
            .await
            .unwrap_err();
        assert!(err.is_ambiguous());
        assert!(matches!(err.kind, ErrorKind::AmbiguousKeys { count: 2 }));
    }

    #[tokio::test]
    async fn test_upsert_missing_key_fails_before_any_request() {
        let client = StrapiClient::new().unwrap();
        let err = client
            .upsert_entry("posts", serde_json::json!({"title": "T"}), &["name"])
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingKey { .. }));
    }

    mod batch_session {
        use super::*;
        use async_trait::async_trait;
        use std::collections::VecDeque;
        use std::sync::Mutex;
        use strapi_api_client::{Connector, RawResponse, Request as CoreRequest};

        /// Serves scripted bodies and records whether each call carried a
        /// shared session.
        struct ScriptedConnector {
            responses: Mutex<VecDeque<String>>,
            sessions_seen: Mutex<Vec<bool>>,
        }

        impl ScriptedConnector {
            fn new(responses: Vec<serde_json::Value>) -> Self {
                Self {
                    responses: Mutex::new(
                        responses.into_iter().map(|v| v.to_string()).collect(),
                    ),
                    sessions_seen: Mutex::new(Vec::new()),
                }
            }
        }

        #[async_trait]
        impl Connector for ScriptedConnector {
            async fn send(
                &self,
                _request: &CoreRequest,
                session: Option<&Session>,
            ) -> strapi_api_client::Result<RawResponse> {
                self.sessions_seen.lock().unwrap().push(session.is_some());
                let body = self
                    .responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("more requests than scripted responses");
                Ok(RawResponse::from_parts(200, body))
            }
        }

        #[tokio::test]
        async fn test_batch_shares_one_session_across_pages() {
            let connector = Arc::new(ScriptedConnector::new(vec![
                entries_body(&[1, 2], 1, 2, 2, 3),
                entries_body(&[3], 2, 2, 2, 3),
            ]));
            let client = StrapiClient::builder()
                .with_connector(connector.clone())
                .build()
                .unwrap();

            let response = client
                .get_all_entries("items", &EntriesQuery::default(), 2)
                .await
                .unwrap();

            assert_eq!(response.data.unwrap().len(), 3);
            assert_eq!(*connector.sessions_seen.lock().unwrap(), vec![true, true]);
        }

        #[tokio::test]
        async fn test_batch_follows_latest_page_count() {
            // The server grows its page count mid-batch; the loop keeps
            // going because termination reads the most recent meta.
            let connector = Arc::new(ScriptedConnector::new(vec![
                entries_body(&[1, 2], 1, 2, 2, 4),
                entries_body(&[3, 4], 2, 2, 3, 5),
                entries_body(&[5], 3, 2, 3, 5),
            ]));
            let client = StrapiClient::builder()
                .with_connector(connector.clone())
                .build()
                .unwrap();

            let response = client
                .get_all_entries("items", &EntriesQuery::default(), 2)
                .await
                .unwrap();

            let data = response.data.unwrap();
            assert_eq!(data.len(), 5);
            assert_eq!(connector.sessions_seen.lock().unwrap().len(), 3);
            assert_eq!(response.meta.pagination.unwrap().page_count, 3);
        }

        #[tokio::test]
        async fn test_single_page_calls_use_no_shared_session() {
            let connector = Arc::new(ScriptedConnector::new(vec![entries_body(&[1], 1, 25, 1, 1)]));
            let client = StrapiClient::builder()
                .with_connector(connector.clone())
                .build()
                .unwrap();

            client
                .get_entries("items", &EntriesQuery::default())
                .await
                .unwrap();
            assert_eq!(*connector.sessions_seen.lock().unwrap(), vec![false]);
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = StrapiClient::builder()
            .with_token("super-secret")
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
