//! formstore: path-addressed form state and validation
//!
//! This crate re-exports the workspace crates behind one public interface:
//! - [`paths`]: records and the dotted-path resolver
//! - [`validation`]: validators, rule sets, error maps, check sequencing
//! - [`form`]: the form controller, field bindings and field arrays
//!
//! # Example
//!
//! ```
//! use formstore::prelude::*;
//! use serde_json::json;
//!
//! let form = FormController::builder(json!({"email": "", "hobbies": []}))
//!     .rules(RuleSet::new().rule("email", vec![required(), email_format()]))
//!     .build();
//!
//! let mut email = FieldBinding::new(&form, FieldConfig::new("email", "Email").required());
//! email.change("ada@example.com");
//! assert_eq!(email.error(), None);
//!
//! let hobbies = FieldArray::new(&form, "hobbies");
//! hobbies.append(json!({"title": "chess"}));
//! assert_eq!(form.value_at(&hobbies.item_path(0, "title")), json!("chess"));
//!
//! form.handle_submit(&mut SubmitEvent::new()).unwrap();
//! assert!(form.is_submitted());
//! ```

pub use formstore_core as paths;
pub use formstore_form as form;
pub use formstore_validation as validation;

pub use formstore_core::{FieldPath, PathParseError, Record, Value};
pub use formstore_form::{
    FieldArray, FieldBinding, FieldConfig, FieldKind, FieldView, FormBuilder, FormController,
    FormError, FormEvent, FormOptions, SubmitEvent,
};
pub use formstore_validation::{CheckTicket, ErrorKeying, ErrorMap, RuleSet, Validator};

/// Everything needed to build and drive a form
pub mod prelude {
    pub use formstore_core::{FieldPath, Record, Value};
    pub use formstore_form::{
        FieldArray, FieldBinding, FieldConfig, FieldKind, FormController, FormError, FormEvent,
        FormOptions, SubmitEvent,
    };
    pub use formstore_validation::{
        custom, email_format, max_length, number_range, required, required_with, ErrorKeying,
        ErrorMap, RuleSet, Validator,
    };
}
