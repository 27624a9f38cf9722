//! Dotted paths into a record
//!
//! This module defines:
//! - FieldPath: validated, buildable dotted path (e.g. "address.street" or "hobbies.2.title")
//! - PathSegment: individual path component (Key or Index)
//! - `read` / `write`: the path resolver over an untyped `serde_json::Value` tree
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object property | `name` |
//! | `key.key` | Nested property | `address.city` |
//! | `key.n` | List element by position | `hobbies.0` |
//! | (empty) | Root | `` |
//!
//! A numeric segment only means "position" when the node it is applied to is
//! a list. On an object it is a plain key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of `null` holes a single write may insert when it
/// addresses a position past the end of a list.
pub const MAX_LIST_GAP: usize = 1024;

// =============================================================================
// FieldPath and PathSegment
// =============================================================================

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty segment in path (leading, trailing or doubled dot)
    #[error("empty segment in path at position {0}")]
    EmptySegment(usize),
}

/// A segment in a dotted path
///
/// Digit-only segments without a leading zero classify as `Index`.
/// Whether an `Index` addresses a list position or an object key is decided
/// by the node it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// List position
    Index(usize),
}

impl PathSegment {
    /// Classify a raw segment
    pub fn classify(raw: &str) -> Self {
        match list_index(raw) {
            Some(i) => PathSegment::Index(i),
            None => PathSegment::Key(raw.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{}", k),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A validated dotted path
///
/// The resolver itself accepts any `&str`; `FieldPath` is what call sites
/// use to build paths without typos in the separators.
///
/// # Examples
///
/// ```
/// use formstore_core::FieldPath;
///
/// let title = FieldPath::root().key("hobbies").index(2).key("title");
/// assert_eq!(title.as_str(), "hobbies.2.title");
///
/// let parsed: FieldPath = "hobbies.2.title".parse().unwrap();
/// assert_eq!(parsed, title);
///
/// let hobbies = FieldPath::root().key("hobbies");
/// assert!(hobbies.is_ancestor_of(&title));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
}

impl FieldPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        FieldPath { raw: String::new() }
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl AsRef<str>) -> Self {
        self.push_key(key);
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.push_index(idx);
        self
    }

    /// Push a key segment (mutating)
    pub fn push_key(&mut self, key: impl AsRef<str>) {
        if !self.raw.is_empty() {
            self.raw.push('.');
        }
        self.raw.push_str(key.as_ref());
    }

    /// Push an index segment (mutating)
    pub fn push_index(&mut self, idx: usize) {
        self.push_key(idx.to_string());
    }

    /// The dotted string form
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the path segments
    pub fn segments(&self) -> Vec<PathSegment> {
        self.raw_segments().map(PathSegment::classify).collect()
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.raw_segments().count()
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.raw.is_empty()
    }

    /// First segment, the top-level field name (None if root)
    pub fn top_level(&self) -> Option<&str> {
        self.raw_segments().next()
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<FieldPath> {
        if self.raw.is_empty() {
            return None;
        }
        let raw = match self.raw.rsplit_once('.') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        Some(FieldPath { raw })
    }

    /// Get the last segment (None if root)
    pub fn last_segment(&self) -> Option<PathSegment> {
        self.raw_segments().last().map(PathSegment::classify)
    }

    /// Check if this path is an ancestor of another (or equal)
    ///
    /// The root path is an ancestor of all paths.
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        let mine: Vec<&str> = self.raw_segments().collect();
        let theirs: Vec<&str> = other.raw_segments().collect();
        mine.len() <= theirs.len() && mine.iter().zip(theirs.iter()).all(|(a, b)| a == b)
    }

    /// Check if this path is a descendant of another (or equal)
    pub fn is_descendant_of(&self, other: &FieldPath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Check if two paths overlap (one is ancestor/descendant of the other)
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.is_ancestor_of(other) || self.is_descendant_of(other)
    }

    fn raw_segments(&self) -> impl Iterator<Item = &str> {
        // "".split('.') yields one empty segment; the root has none.
        self.raw.split('.').filter(|_| !self.raw.is_empty())
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    /// Parse a dotted path
    ///
    /// The empty string is the root. Any empty segment is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(FieldPath::root());
        }

        let mut position = 0;
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(PathParseError::EmptySegment(position));
            }
            position += segment.len() + 1;
        }

        Ok(FieldPath { raw: s.to_string() })
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// =============================================================================
// Path Resolver
// =============================================================================

/// Read the value at `path`
///
/// Returns `None` as soon as a node along the path is missing. Never panics.
/// The empty path addresses the root.
pub fn read<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(record);
    }
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => list_index(segment).and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Read the value at `path`, with `Value::Null` standing in for "absent"
pub fn read_or_null(record: &Value, path: &str) -> Value {
    read(record, path).cloned().unwrap_or(Value::Null)
}

/// Write `value` at `path`, mutating the nodes along the way in place
///
/// Intermediate segments that are missing or hold a scalar are replaced by
/// empty mappings. A position past the end of a list grows the list with
/// `null` holes (at most [`MAX_LIST_GAP`] of them).
///
/// Returns `false` when the path cannot be represented in the tree (a key
/// addressed into a list, or an oversized gap); the record is then left
/// unchanged from the failing node down.
///
/// Callers that need copy-on-write must pass an owned copy.
pub fn write(record: &mut Value, path: &str, value: Value) -> bool {
    if path.is_empty() {
        *record = value;
        return true;
    }

    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut node = record;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            node = match descend(node, segment) {
                Some(next) => next,
                None => {
                    tracing::warn!(target: "formstore::path", path, segment, "Path not writable, skipping");
                    return false;
                }
            };
        }
    }

    let written = assign(node, last, value);
    if !written {
        tracing::warn!(target: "formstore::path", path, segment = last, "Path not writable, skipping");
    }
    written
}

/// Parse a list position: base-10 digits, no sign, no leading zero
fn list_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn ensure_container(value: &mut Value) -> &mut Value {
    if !is_container(value) {
        *value = Value::Object(Map::new());
    }
    value
}

/// Make room for position `index`; false if the gap is too large
fn grow_to(items: &mut Vec<Value>, index: usize) -> bool {
    if index < items.len() {
        return true;
    }
    if index - items.len() > MAX_LIST_GAP {
        return false;
    }
    items.resize(index + 1, Value::Null);
    true
}

fn descend<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => Some(ensure_container(
            map.entry(segment.to_string()).or_insert(Value::Null),
        )),
        Value::Array(items) => {
            let index = list_index(segment)?;
            if !grow_to(items, index) {
                return None;
            }
            Some(ensure_container(&mut items[index]))
        }
        other => {
            *other = Value::Object(Map::new());
            descend(other, segment)
        }
    }
}

fn assign(node: &mut Value, segment: &str, value: Value) -> bool {
    match node {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            true
        }
        Value::Array(items) => match list_index(segment) {
            Some(index) if grow_to(items, index) => {
                items[index] = value;
                true
            }
            _ => false,
        },
        other => {
            let mut map = Map::new();
            map.insert(segment.to_string(), value);
            *other = Value::Object(map);
            true
        }
    }
}
