//! Field bindings
//!
//! A [`FieldBinding`] ties one path of a form to one rendered input. It
//! derives validators from a declarative [`FieldConfig`], appends any
//! custom ones, tracks whether the user has interacted with the input and
//! decides which error message to show.
//!
//! Error display rule:
//! - an entry in the form's error map is always shown
//! - otherwise, once touched, the first failing local validator is shown
//! - an untouched field with no map entry shows nothing

use formstore_core::Value;
use formstore_validation::{
    compose, email_format, first_error, max_length, number_range, required_with, Validator,
};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::debug;

use crate::controller::FormController;

/// Input kind of a field, controlling how raw input is converted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, stored as a string
    #[default]
    Text,
    /// Numeric input; unparsable text is stored as null
    Number,
    /// One of a fixed set of options
    Select {
        /// Accepted values, in display order
        options: Vec<String>,
    },
}

/// Declarative description of one field
///
/// Keys not recognised here are collected into `props` and handed to the
/// renderer untouched.
///
/// ```
/// use formstore_form::{FieldConfig, FieldKind};
///
/// let config: FieldConfig = serde_json::from_str(r#"{
///     "name": "age",
///     "label": "Age",
///     "number_range": [18, 99],
///     "kind": {"type": "number"},
///     "placeholder": "Your age"
/// }"#).unwrap();
/// assert_eq!(config.kind, FieldKind::Number);
/// assert_eq!(config.props["placeholder"], "Your age");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Path of the field in the record
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Value must be present and non-empty
    #[serde(default)]
    pub required: bool,
    /// Value must look like an email address
    #[serde(default)]
    pub email_format: bool,
    /// Inclusive numeric bounds
    #[serde(default)]
    pub number_range: Option<(f64, f64)>,
    /// Maximum length in characters
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Input kind
    #[serde(default)]
    pub kind: FieldKind,
    /// Extra presentation properties
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl FieldConfig {
    /// Create a text field config with no rules
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            email_format: false,
            number_range: None,
            max_length: None,
            kind: FieldKind::Text,
            props: Map::new(),
        }
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require an email-shaped value
    pub fn email_format(mut self) -> Self {
        self.email_format = true;
        self
    }

    /// Require a number within `min..=max`
    pub fn number_range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.number_range = Some((min.into(), max.into()));
        self
    }

    /// Limit the value's length in characters
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the input kind
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a presentation property
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Validators implied by the declarative flags
    ///
    /// Order: required, email format, number range, max length.
    pub fn declarative_validators(&self, required_message: &str) -> Vec<Validator> {
        let mut validators = Vec::new();
        if self.required {
            validators.push(required_with(required_message));
        }
        if self.email_format {
            validators.push(email_format());
        }
        if let Some((min, max)) = self.number_range {
            validators.push(number_range(min, max));
        }
        if let Some(max) = self.max_length {
            validators.push(max_length(max));
        }
        validators
    }
}

/// Everything a renderer needs to draw one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    /// Field path
    pub name: &'a str,
    /// Label text
    pub label: &'a str,
    /// Current value
    pub value: Value,
    /// Message to display, if any
    pub error: Option<String>,
    /// Whether the input should be rendered inert
    pub disabled: bool,
    /// Input kind
    pub kind: &'a FieldKind,
    /// Extra presentation properties
    pub props: &'a Map<String, Value>,
}

type ChangeFn = dyn Fn(&Value) + Send + Sync;

/// One path of a form bound to one input
pub struct FieldBinding {
    form: FormController,
    config: FieldConfig,
    custom: Vec<Validator>,
    on_change: Option<Box<ChangeFn>>,
    touched: bool,
}

impl FieldBinding {
    /// Bind `config` to `form`
    pub fn new(form: &FormController, config: FieldConfig) -> Self {
        Self {
            form: form.clone(),
            config,
            custom: Vec::new(),
            on_change: None,
            touched: false,
        }
    }

    /// Append a custom validator; runs after the declarative ones
    pub fn validator(mut self, validator: Validator) -> Self {
        self.custom.push(validator);
        self
    }

    /// Append several custom validators
    pub fn validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.custom.extend(validators);
        self
    }

    /// Callback invoked with the new value after every committed change
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Field path
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Field config
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current value in the form
    pub fn value(&self) -> Value {
        self.form.value_at(&self.config.name)
    }

    /// Check if the user has changed this field since it was bound
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Check if the form marks this field disabled
    pub fn is_disabled(&self) -> bool {
        self.form.is_disabled(&self.config.name)
    }

    /// Declarative validators followed by custom ones
    pub fn effective_validators(&self) -> Vec<Validator> {
        let generated = self
            .config
            .declarative_validators(&self.form.options().required_message);
        compose(generated, self.custom.clone())
    }

    /// Commit a new value
    ///
    /// Writes through the form, marks the field touched, then notifies the
    /// change callback. Returns false, leaving the field untouched and the
    /// callback silent, if the form refuses the write.
    pub fn change(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if !self.form.update_field(&self.config.name, value.clone()) {
            return false;
        }
        self.touched = true;
        if let Some(on_change) = &self.on_change {
            on_change(&value);
        }
        true
    }

    /// Convert raw input text according to the field kind and commit it
    ///
    /// Returns false, committing nothing, if a select field receives a
    /// value outside its options or the form refuses the write.
    pub fn input(&mut self, raw: &str) -> bool {
        let value = match &self.config.kind {
            FieldKind::Text => Value::String(raw.to_string()),
            FieldKind::Number => parse_number(raw),
            FieldKind::Select { options } => {
                if !options.iter().any(|option| option == raw) {
                    debug!(
                        target: "formstore::form",
                        field = %self.config.name,
                        input = raw,
                        "Rejected input outside select options"
                    );
                    return false;
                }
                Value::String(raw.to_string())
            }
        };
        self.change(value)
    }

    /// Message to display for this field
    pub fn error(&self) -> Option<String> {
        let key = self.form.error_key(&self.config.name);
        if let Some(message) = self.form.error(&key) {
            return Some(message);
        }
        if !self.touched {
            return None;
        }
        first_error(&self.effective_validators(), &self.value())
    }

    /// Build a view of the field and hand it to `render`
    pub fn render<R>(&self, render: impl FnOnce(&FieldView<'_>) -> R) -> R {
        let view = FieldView {
            name: &self.config.name,
            label: &self.config.label,
            value: self.value(),
            error: self.error(),
            disabled: self.is_disabled(),
            kind: &self.config.kind,
            props: &self.config.props,
        };
        render(&view)
    }
}

impl std::fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("config", &self.config)
            .field("custom", &self.custom)
            .field("touched", &self.touched)
            .finish()
    }
}

/// Integers stay integers; blank or unparsable input becomes null
fn parse_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::Null,
    }
}
