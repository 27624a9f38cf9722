//! Core types for formstore
//!
//! This crate defines the untyped tree every form operates on:
//! - Record: the form's current value, a newtype over serde_json::Value
//! - FieldPath: validated builder/parser for dotted paths
//! - Path Resolver: `read` / `write` at a dotted path

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod path;
pub mod record;

pub use path::{read, read_or_null, write, FieldPath, PathParseError, PathSegment};
pub use record::Record;

/// Re-export of the JSON value type used for every field value
pub use serde_json::Value;
