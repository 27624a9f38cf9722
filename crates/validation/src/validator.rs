//! Validators and their composition
//!
//! A validator is a pure check from a field's current value to an optional
//! error message. It holds no reference to the record it was run against.
//!
//! Shorthand validators only judge values of the shape they understand:
//! `max_length` and `email_format` pass anything that is not a string,
//! `number_range` passes anything that is not a number. Attach `required`
//! when absence itself is an error.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Kind tag for `required` validators
pub const KIND_REQUIRED: &str = "required";
/// Kind tag for `max_length` validators
pub const KIND_MAX_LENGTH: &str = "max_length";
/// Kind tag for `number_range` validators
pub const KIND_RANGE: &str = "number_range";
/// Kind tag for `email_format` validators
pub const KIND_EMAIL: &str = "email_format";
/// Kind tag for caller-supplied validators
pub const KIND_CUSTOM: &str = "custom";

/// Message used by [`required`]
pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";

// ---------------------------------------------------------------------------
// Validate trait
// ---------------------------------------------------------------------------

/// A check over a single field value.
///
/// Any `Fn(&Value) -> Option<String> + Send + Sync` closure is a `Validate`.
pub trait Validate: Send + Sync {
    /// Return `Some(message)` when `value` is invalid.
    fn validate(&self, value: &Value) -> Option<String>;

    /// Stable tag naming the rule, for logging and introspection.
    fn kind(&self) -> &'static str {
        KIND_CUSTOM
    }
}

impl<F> Validate for F
where
    F: Fn(&Value) -> Option<String> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Option<String> {
        self(value)
    }
}

/// Cloneable handle to a validator
#[derive(Clone)]
pub struct Validator {
    inner: Arc<dyn Validate>,
}

impl Validator {
    /// Wrap any [`Validate`] implementation
    pub fn new(rule: impl Validate + 'static) -> Self {
        Self {
            inner: Arc::new(rule),
        }
    }

    /// Run the check
    pub fn validate(&self, value: &Value) -> Option<String> {
        self.inner.validate(value)
    }

    /// The rule's kind tag
    pub fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.kind()).finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in validators
// ---------------------------------------------------------------------------

/// Fails on `null`, a missing value, or the empty string.
///
/// Numeric zero and `false` are values, not absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Required {
    /// Message returned on failure
    pub message: String,
}

impl Validate for Required {
    fn validate(&self, value: &Value) -> Option<String> {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        empty.then(|| self.message.clone())
    }

    fn kind(&self) -> &'static str {
        KIND_REQUIRED
    }
}

/// Fails when a string has more than `max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength {
    /// Maximum number of characters allowed
    pub max: usize,
}

impl Validate for MaxLength {
    fn validate(&self, value: &Value) -> Option<String> {
        let s = value.as_str()?;
        (s.chars().count() > self.max).then(|| format!("Maximum length is {}", self.max))
    }

    fn kind(&self) -> &'static str {
        KIND_MAX_LENGTH
    }
}

/// Fails when a number lies outside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
}

impl Validate for NumberRange {
    fn validate(&self, value: &Value) -> Option<String> {
        let n = value.as_f64()?;
        (n < self.min || n > self.max)
            .then(|| format!("Must be between {} and {}", self.min, self.max))
    }

    fn kind(&self) -> &'static str {
        KIND_RANGE
    }
}

/// Fails when a string is not shaped like `token@token.token`.
///
/// No whitespace anywhere, at least one character before the `@`, and a
/// `.` after it with at least one character on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailFormat;

impl EmailFormat {
    fn accepts(s: &str) -> bool {
        if s.chars().any(char::is_whitespace) {
            return false;
        }
        let bytes = s.as_bytes();
        let Some(first) = s.chars().next().map(char::len_utf8) else {
            return false;
        };
        // The earliest '@' past the first character leaves the longest domain, so it decides.
        let Some(at) = s[first..].find('@').map(|i| i + first) else {
            return false;
        };
        bytes.len() >= at + 4 && bytes[at + 2..bytes.len() - 1].contains(&b'.')
    }
}

impl Validate for EmailFormat {
    fn validate(&self, value: &Value) -> Option<String> {
        let s = value.as_str()?;
        (!Self::accepts(s)).then(|| "Invalid email format".to_string())
    }

    fn kind(&self) -> &'static str {
        KIND_EMAIL
    }
}

// ---------------------------------------------------------------------------
// Shorthand constructors
// ---------------------------------------------------------------------------

/// `required` with the default message
pub fn required() -> Validator {
    required_with(DEFAULT_REQUIRED_MESSAGE)
}

/// `required` with a caller-supplied message
pub fn required_with(message: impl Into<String>) -> Validator {
    Validator::new(Required {
        message: message.into(),
    })
}

/// Maximum string length in characters
pub fn max_length(max: usize) -> Validator {
    Validator::new(MaxLength { max })
}

/// Inclusive numeric range
pub fn number_range(min: impl Into<f64>, max: impl Into<f64>) -> Validator {
    Validator::new(NumberRange {
        min: min.into(),
        max: max.into(),
    })
}

/// Simple email shape
pub fn email_format() -> Validator {
    Validator::new(EmailFormat)
}

/// Wrap a closure
pub fn custom<F>(f: F) -> Validator
where
    F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
{
    Validator::new(f)
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Generated validators first, then custom ones, order preserved
pub fn compose(generated: Vec<Validator>, custom: Vec<Validator>) -> Vec<Validator> {
    let mut all = generated;
    all.extend(custom);
    all
}

/// First failing message; later validators are not evaluated
pub fn first_error(validators: &[Validator], value: &Value) -> Option<String> {
    validators.iter().find_map(|v| v.validate(value))
}

/// Every failing message, in order
pub fn all_errors(validators: &[Validator], value: &Value) -> Vec<String> {
    validators.iter().filter_map(|v| v.validate(value)).collect()
}
