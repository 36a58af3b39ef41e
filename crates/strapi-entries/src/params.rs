//! Query-parameter values and bracket-notation flattening.
//!
//! Strapi encodes nested query directives as bracket paths, e.g.
//! `filters[name][$eq]=value` or `populate[colors][populate]=colorAnimation`.
//! [`stringify_parameters`] turns a [`ParamValue`] tree into those flat
//! pairs. Values are never URL-encoded here; that is the transport's job.

/// A query-parameter value: a nested map, a scalar, or a list of strings.
///
/// Nested entries keep their insertion order, and flattening walks them
/// depth-first, so the wire order of parameters is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Nested mapping, flattened with `[key]` path segments.
    Nested(Vec<(String, ParamValue)>),
    /// A single value, emitted as-is.
    Scalar(String),
    /// A list of values, emitted comma-joined under one key.
    List(Vec<String>),
}

impl ParamValue {
    /// Build a nested mapping from key/value pairs.
    pub fn nested<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        ParamValue::Nested(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        ParamValue::Scalar(value.into())
    }

    /// Build a list value.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }

    /// An `$eq` equality filter on the given value.
    pub fn eq(value: impl Into<String>) -> Self {
        ParamValue::nested([("$eq", ParamValue::scalar(value))])
    }

    /// A `$ne` inequality filter on the given value.
    pub fn ne(value: impl Into<String>) -> Self {
        ParamValue::nested([("$ne", ParamValue::scalar(value))])
    }

    /// A `$contains` substring filter on the given value.
    pub fn contains(value: impl Into<String>) -> Self {
        ParamValue::nested([("$contains", ParamValue::scalar(value))])
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::list(values)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<PublicationState> for ParamValue {
    fn from(value: PublicationState) -> Self {
        ParamValue::Scalar(value.as_str().to_string())
    }
}

/// Draft/published visibility of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    /// Only published entries (the server default).
    Live,
    /// Both draft and published entries.
    Preview,
}

impl PublicationState {
    /// The wire value of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationState::Live => "live",
            PublicationState::Preview => "preview",
        }
    }
}

impl std::fmt::Display for PublicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flatten a parameter value into bracket-notation query pairs.
///
/// - nested maps recurse, appending `[key]` to the path for each level
/// - scalars yield a single `name=value` pair
/// - lists yield one comma-joined pair
/// - `None` and empty lists yield nothing, omitting the parameter
///
/// Pure: identical input yields identical pairs in identical order.
pub fn stringify_parameters(name: &str, value: Option<&ParamValue>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Some(value) = value {
        flatten_value(name, value, &mut out);
    }
    out
}

fn flatten_value(path: &str, value: &ParamValue, out: &mut Vec<(String, String)>) {
    match value {
        ParamValue::Nested(entries) => {
            for (key, value) in entries {
                flatten_value(&format!("{path}[{key}]"), value, out);
            }
        }
        ParamValue::Scalar(value) => out.push((path.to_string(), value.clone())),
        ParamValue::List(values) => {
            if !values.is_empty() {
                out.push((path.to_string(), values.join(",")));
            }
        }
    }
}
