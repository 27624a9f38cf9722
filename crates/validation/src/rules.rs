//! Whole-form validation built from per-path rules
//!
//! A `RuleSet` is the usual way to write a form's whole-form validator: an
//! ordered list of `(path, validators)` pairs evaluated against a record.

use formstore_core::path;
use serde_json::Value;

use crate::errors::{ErrorKeying, ErrorMap};
use crate::validator::{all_errors, first_error, Validator};

/// Ordered per-path validator lists
///
/// # Example
///
/// ```
/// use formstore_validation::{email_format, required, RuleSet};
/// use serde_json::json;
///
/// let rules = RuleSet::new()
///     .rule("name", vec![required()])
///     .rule("email", vec![required(), email_format()]);
///
/// let errors = rules.validate(&json!({"name": "Ann", "email": "nope"}));
/// assert_eq!(errors.get("email"), Some("Invalid email format"));
/// assert_eq!(errors.get("name"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Vec<Validator>)>,
    keying: ErrorKeying,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add validators for `path` (builder pattern)
    pub fn rule(mut self, path: impl Into<String>, validators: Vec<Validator>) -> Self {
        self.push(path, validators);
        self
    }

    /// Add validators for `path` (mutating)
    ///
    /// A path added twice keeps both lists; the earlier list is evaluated first.
    pub fn push(&mut self, path: impl Into<String>, validators: Vec<Validator>) {
        self.rules.push((path.into(), validators));
    }

    /// Choose how error keys are derived from rule paths (builder pattern)
    pub fn keying(mut self, keying: ErrorKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Set the keying in place
    pub fn set_keying(&mut self, keying: ErrorKeying) {
        self.keying = keying;
    }

    /// Paths that have rules, in declaration order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(p, _)| p.as_str())
    }

    /// Validators for `path`, concatenated across every `push` for it
    pub fn validators_for(&self, path: &str) -> Vec<Validator> {
        self.rules
            .iter()
            .filter(|(p, _)| p == path)
            .flat_map(|(_, v)| v.iter().cloned())
            .collect()
    }

    /// Number of rule entries
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule; the first failure per error key wins
    pub fn validate(&self, record: &Value) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for (path, validators) in &self.rules {
            let key = self.keying.key_for(path);
            if errors.contains(key) {
                continue;
            }
            let value = path::read_or_null(record, path);
            if let Some(message) = first_error(validators, &value) {
                errors.insert(key, message);
            }
        }
        errors
    }

    /// Every failing message for `path`, in order
    pub fn messages_for(&self, record: &Value, path: &str) -> Vec<String> {
        let value = path::read_or_null(record, path);
        all_errors(&self.validators_for(path), &value)
    }
}
