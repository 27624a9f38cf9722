//! Validation layer for formstore
//!
//! This crate provides:
//! - Validator: cloneable handle to a pure `value -> Option<message>` check
//! - Shorthand constructors (required, max_length, number_range, email_format)
//! - Composition with first-failure-wins evaluation
//! - ErrorMap: one message per field key
//! - RuleSet: whole-form validator built from per-path validator lists
//! - CheckSequencer: last-write-wins guard for externally completed checks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod rules;
pub mod sequence;
pub mod validator;

pub use errors::{ErrorKeying, ErrorMap};
pub use rules::RuleSet;
pub use sequence::{CheckSequencer, CheckTicket};
pub use validator::{
    all_errors, compose, custom, email_format, first_error, max_length, number_range, required,
    required_with, EmailFormat, MaxLength, NumberRange, Required, Validate, Validator,
    DEFAULT_REQUIRED_MESSAGE, KIND_CUSTOM, KIND_EMAIL, KIND_MAX_LENGTH, KIND_RANGE, KIND_REQUIRED,
};
