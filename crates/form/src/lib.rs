//! Form layer for formstore
//!
//! This crate implements the parts hosts interact with:
//! - FormController: shared handle owning record, errors, disabled set, submitted flag
//! - FieldBinding: one path bound to one rendered input and its validators
//! - FieldArray: list-valued paths with append/remove
//!
//! All state changes go through `FormController` methods. Bindings hold a
//! cloned controller handle and never mutate the record themselves.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod controller;
pub mod error;
pub mod event;
pub mod field;
pub mod options;

pub use array::FieldArray;
pub use controller::{FormBuilder, FormController, SUBMIT_ATTEMPTS};
pub use error::{FormError, Result};
pub use event::{FormEvent, SubmitEvent};
pub use field::{FieldBinding, FieldConfig, FieldKind, FieldView};
pub use options::FormOptions;
