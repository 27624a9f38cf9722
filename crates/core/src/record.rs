//! The form's domain value

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::path;

/// A form record
///
/// Newtype around serde_json::Value providing:
/// - Read access to the underlying tree via Deref
/// - Path-addressed `get` / `set`
/// - Serialization/deserialization support
///
/// There is no `DerefMut`: every mutation goes through
/// [`Record::set`] so that a shared snapshot can only change by being
/// replaced.
///
/// # Examples
///
/// ```
/// use formstore_core::Record;
/// use serde_json::json;
///
/// let mut record = Record::from(json!({"address": {"street": ""}}));
/// record.set("address.street", json!("Main"));
/// assert_eq!(record.get("address.street"), Some(&json!("Main")));
/// assert_eq!(record.get("address.zip"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Create an empty record (an empty mapping)
    pub fn object() -> Self {
        Record(Value::Object(Map::new()))
    }

    /// Create from a serde_json::Value
    pub fn from_value(value: Value) -> Self {
        Record(value)
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &Value {
        &self.0
    }

    /// Read the value at `path`
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::read(&self.0, path)
    }

    /// Read the value at `path`, `Value::Null` when absent
    pub fn get_or_null(&self, path: &str) -> Value {
        path::read_or_null(&self.0, path)
    }

    /// Write `value` at `path` in place
    ///
    /// See [`path::write`] for the exact semantics.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        path::write(&mut self.0, path, value)
    }

    /// Serialize to compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Serialize to pretty JSON string
    pub fn to_json_string_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.to_json_string())
    }
}

impl FromStr for Record {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(Record)
    }
}

impl Deref for Record {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Default is an empty mapping, the shape every form starts from
impl Default for Record {
    fn default() -> Self {
        Self::object()
    }
}

impl From<Value> for Record {
    fn from(v: Value) -> Self {
        Record(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        v.0
    }
}
