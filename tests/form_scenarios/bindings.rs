//! Field binding scenarios

use crate::test_utils::*;
use formstore::prelude::*;
use serde_json::json;

#[test]
fn test_untouched_fields_render_without_errors() {
    let sample = SampleForm::new();
    for config in field_configs() {
        let binding = FieldBinding::new(&sample.form, config);
        let error = binding.render(|view| view.error.clone());
        assert_eq!(error, None, "{}", binding.name());
    }
}

#[test]
fn test_edit_shows_whole_form_errors_on_other_fields() {
    let sample = SampleForm::new();
    let mut name = sample.binding("name");
    let email = sample.binding("email");

    name.change("Ada");

    // Whole-form validation ran after the write, so email now has an
    // authoritative error even though it was never touched
    assert_eq!(name.error(), None);
    assert_eq!(email.error().as_deref(), Some("This field is required"));
}

#[test]
fn test_validation_sees_value_just_written() {
    let sample = SampleForm::new();
    let mut email = sample.binding("email");

    email.change("ada@example.com");
    assert_eq!(sample.form.error("email"), None);

    email.change("nope");
    assert_eq!(sample.form.error("email").as_deref(), Some("Invalid email format"));
}

#[test]
fn test_local_errors_without_form_validation() {
    let form = FormController::new(initial_values());
    let mut name = FieldBinding::new(&form, FieldConfig::new("name", "Name").required().max_length(3));

    assert_eq!(name.error(), None);
    name.change("Augusta");
    assert_eq!(name.error().as_deref(), Some("Maximum length is 3"));
    name.change("");
    assert_eq!(name.error().as_deref(), Some("This field is required"));
    assert!(form.errors().is_empty());
}

#[test]
fn test_custom_validator_after_declarative() {
    let form = FormController::new(initial_values());
    let mut email = FieldBinding::new(&form, FieldConfig::new("email", "Email").required().email_format())
        .validator(custom(|v: &Value| {
            v.as_str()
                .filter(|s| s.ends_with("@example.com"))
                .map(|_| "Use a real address".to_string())
        }));

    email.change("x@example.com");
    assert_eq!(email.error().as_deref(), Some("Use a real address"));
    email.change("x@lovelace.org");
    assert_eq!(email.error(), None);
}

#[test]
fn test_raw_input_by_kind() {
    let sample = SampleForm::new();
    let mut age = sample.binding("age");
    let mut gender = sample.binding("gender");

    assert!(age.input("36"));
    assert_eq!(sample.form.value_at("age"), json!(36));
    assert!(age.input("thirty"));
    assert_eq!(sample.form.value_at("age"), Value::Null);
    // Null is not a number, so the range check passes it through
    assert_eq!(sample.form.error("age"), None);

    assert!(!gender.input("robot"));
    assert!(gender.input("other"));
    assert_eq!(sample.form.value_at("gender"), json!("other"));
}

#[test]
fn test_disabled_field_view() {
    let sample = SampleForm::new();
    let city = sample.binding("address.city");
    sample.form.disable_field("address.city");
    assert!(city.is_disabled());
    assert!(city.render(|view| view.disabled));
    sample.form.enable_field("address.city");
    assert!(!city.render(|view| view.disabled));
}
