//! Ordered query parameters and the wire encoding policy.
//!
//! Every value is percent-encoded exactly once. A [`QueryValue::Plain`]
//! value is encoded when it is written to the URL, a
//! [`QueryValue::Encoded`] value is already wire-ready and written
//! verbatim. List-valued parameters (`sort`, `include`, filters) are built
//! with [`encode_joined`]: each element is encoded on its own, then the
//! encoded elements are joined with a literal comma. A comma inside an
//! element therefore shows up as `%2C` and stays distinguishable from the
//! list separator.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A single query parameter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// Raw text, percent-encoded when emitted.
    Plain(String),
    /// Already percent-encoded text, emitted verbatim.
    Encoded(String),
}

impl QueryValue {
    /// Returns the value exactly as it appears on the wire.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Plain(value) => urlencoding::encode(value).into_owned(),
            Self::Encoded(value) => value.clone(),
        }
    }

    /// Returns `true` if the value carries no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(value) | Self::Encoded(value) => value.is_empty(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Plain(value.to_string())
    }
}

impl Serialize for QueryValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_wire())
    }
}

/// An insertion-ordered map of query parameters.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::query::{QueryParams, QueryValue};
///
/// let mut params = QueryParams::new();
/// params.insert("include", QueryValue::Encoded("author,comments".to_string()));
/// params.insert("q", "air france");
///
/// assert_eq!(params.to_query_string(), "include=author,comments&q=air%20france");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(IndexMap<String, QueryValue>);

impl QueryParams {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a parameter, keeping the original position of
    /// an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Inserts a parameter only when the key is not present yet.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> bool {
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    /// Removes a parameter, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.shift_remove(key)
    }

    /// Returns the value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Returns the wire form of the value for `key`, if any.
    #[must_use]
    pub fn wire_value(&self, key: &str) -> Option<String> {
        self.0.get(key).map(QueryValue::to_wire)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.0.iter()
    }

    /// Returns the parameter names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders `key=value` pairs joined with `&`, without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{}={}", encode_key(key), value.to_wire()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, QueryValue);
    type IntoIter = indexmap::map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Percent-encodes each element, then joins the results with a literal comma.
///
/// # Example
///
/// ```rust
/// use jsonapi_orchestrator::query::encode_joined;
///
/// assert_eq!(encode_joined(["it, digital", "business"]), "it%2C%20digital,business");
/// ```
pub fn encode_joined<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| urlencoding::encode(value.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Percent-encodes a parameter name, leaving the structural `[` and `]`
/// of bracketed keys such as `filter[company][name]` intact.
#[must_use]
pub fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(index) = rest.find(['[', ']']) {
        encoded.push_str(&urlencoding::encode(&rest[..index]));
        encoded.push_str(&rest[index..=index]);
        rest = &rest[index + 1..];
    }
    encoded.push_str(&urlencoding::encode(rest));
    encoded
}
