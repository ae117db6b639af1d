//! # Records — Film Property Bags
//!
//! A film is stored as an open mapping from property name to a [`Scalar`].
//! The engine only interprets a handful of well-known keys (see [`fields`]);
//! everything else passes through to the response untouched, except storage
//! metadata keys which are stripped during projection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known property names.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const YEAR: &str = "year";
    pub const AWARDS: &str = "awards";
    pub const NOMINATIONS: &str = "nominations";
    pub const IS_BEST_PICTURE: &str = "isBestPicture";
    pub const NUMBER_OF_REFERENCES: &str = "numberOfReferences";
    /// Resource type of a container or entry. Storage metadata.
    pub const RESOURCE_TYPE: &str = "sling:resourceType";
}

/// Namespaces whose keys are storage metadata, never part of a film.
pub const STORAGE_PREFIXES: [&str; 2] = ["jcr:", "sling:"];

/// Returns `true` if `key` belongs to a reserved storage namespace.
pub fn is_storage_key(key: &str) -> bool {
    STORAGE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// A single property value.
///
/// Serialized untagged: integers stay JSON numbers and booleans stay JSON
/// booleans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON value into a scalar.
    ///
    /// Returns `None` for values outside the scalar model: arrays, objects,
    /// null, and numbers that do not fit an `i64`.
    pub fn from_json(value: &serde_json::Value) -> Option<Scalar> {
        match value {
            serde_json::Value::Bool(b) => Some(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => n.as_i64().map(Scalar::Int),
            serde_json::Value::String(s) => Some(Scalar::Str(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

/// One film: an open, string-keyed property bag.
///
/// Keys are kept sorted so that serialization is byte-for-byte deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    props: BTreeMap<String, Scalar>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.props.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.props.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// String value of `key`, or `None` if absent or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Scalar::as_str)
    }

    /// Integer value of `key`, or `None` if absent or not an integer.
    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Scalar::as_int)
    }

    /// Boolean value of `key`, or `None` if absent or not a boolean.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Scalar::as_bool)
    }

    /// Remove every storage metadata key (`jcr:*`, `sling:*`).
    pub fn strip_storage_keys(&mut self) {
        self.props.retain(|key, _| !is_storage_key(key));
    }

    /// Consume the record and return its projection.
    pub fn projected(mut self) -> Self {
        self.strip_storage_keys();
        self
    }
}

impl FromIterator<(String, Scalar)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self {
            props: iter.into_iter().collect(),
        }
    }
}
