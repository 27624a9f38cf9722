//! Error map: one message per field key

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an error-map key is derived from a field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKeying {
    /// Key by the full dotted path (`address.street`)
    #[default]
    FullPath,
    /// Key by the first segment only (`address`), the flat layout
    TopLevel,
}

impl ErrorKeying {
    /// Error-map key for `path`
    pub fn key_for<'a>(&self, path: &'a str) -> &'a str {
        match self {
            ErrorKeying::FullPath => path,
            ErrorKeying::TopLevel => path.split('.').next().unwrap_or(path),
        }
    }
}

/// Field key -> single error message
///
/// Ordered by key so that iteration and serialized output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for `key`, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    /// Set the message for `key` only if it has none yet
    ///
    /// Returns true if the message was stored.
    pub fn insert_first(&mut self, key: impl Into<String>, message: impl Into<String>) -> bool {
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, message.into());
        true
    }

    /// Clear the message for `key`
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Message for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check if `key` has a message
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Check if there are no errors
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with an error
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate (key, message) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys with an error, in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, String>> for ErrorMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        ErrorMap(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ErrorMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
