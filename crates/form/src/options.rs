//! Form configuration

use formstore_validation::{ErrorKeying, DEFAULT_REQUIRED_MESSAGE};
use serde::{Deserialize, Serialize};

/// Options for a form controller.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use formstore_form::FormOptions;
/// use formstore_validation::ErrorKeying;
///
/// let opts = FormOptions::new()
///     .error_keying(ErrorKeying::TopLevel)
///     .validate_on_change(false);
/// assert!(!opts.validate_on_change);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// How error-map keys are derived from field paths.
    pub error_keying: ErrorKeying,
    /// Re-run whole-form validation after every field write.
    pub validate_on_change: bool,
    /// Message used by `required` validators derived from field configs.
    pub required_message: String,
}

impl FormOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error keying.
    pub fn error_keying(mut self, keying: ErrorKeying) -> Self {
        self.error_keying = keying;
        self
    }

    /// Enable or disable validation on every field write.
    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }

    /// Set the message for derived `required` validators.
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            error_keying: ErrorKeying::FullPath,
            validate_on_change: true,
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
        }
    }
}
