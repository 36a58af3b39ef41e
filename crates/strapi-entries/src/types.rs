//! Entry and response-envelope types.

use serde::{Deserialize, Serialize};

/// One record in a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Server-assigned identifier, unique per collection.
    pub id: i64,
    /// Field values, shaped by the remote schema and opaque to this client.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Entry {
    /// Merge `id` into the attribute map, yielding one flat record.
    ///
    /// An attribute literally named `id` wins over the entry id, matching
    /// the wire envelope's own precedence.
    pub fn into_flattened(self) -> serde_json::Map<String, serde_json::Value> {
        let mut record = serde_json::Map::with_capacity(self.attributes.len() + 1);
        record.insert("id".to_string(), serde_json::Value::from(self.id));
        record.extend(self.attributes);
        record
    }
}

/// Server-reported pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total: u64,
}

/// Response metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Success envelope for single-entry operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryResponse {
    #[serde(default)]
    pub data: Option<Entry>,
    #[serde(default)]
    pub meta: Meta,
}

/// Success envelope for list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub data: Option<Vec<Entry>>,
    #[serde(default)]
    pub meta: Meta,
}
