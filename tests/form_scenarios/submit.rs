//! Submit and reset scenarios

use crate::test_utils::*;
use formstore::prelude::*;
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Blocked submit
// ============================================================================

#[test]
fn test_empty_form_submit_is_blocked() {
    let sample = SampleForm::new();
    let mut event = SubmitEvent::new();

    let result = sample.form.handle_submit(&mut event);

    assert!(event.is_default_prevented());
    let errors = match result {
        Err(FormError::SubmitBlocked { errors }) => errors,
        other => panic!("expected blocked submit, got {other:?}"),
    };
    assert_eq!(errors.get("name"), Some("This field is required"));
    assert_eq!(errors.get("email"), Some("This field is required"));
    assert_eq!(errors.get("age"), Some("Must be between 18 and 99"));
    assert_eq!(errors.get("address.city"), Some("This field is required"));
    assert!(!errors.contains("gender"));
    assert_eq!(sample.form.errors(), errors);
    assert!(sample.submitted.lock().is_empty());
    assert!(!sample.form.is_submitted());
}

#[test]
fn test_single_invalid_field_blocks_submit() {
    let sample = SampleForm::new();
    sample.fill_valid();
    sample.form.update_field("email", "ada-at-example");

    let result = sample.form.handle_submit(&mut SubmitEvent::new());
    let errors = match result {
        Err(FormError::SubmitBlocked { errors }) => errors,
        other => panic!("expected blocked submit, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("email"), Some("Invalid email format"));
}

// ============================================================================
// Successful submit
// ============================================================================

#[test]
fn test_valid_form_submits_exact_record() {
    let sample = SampleForm::new();
    sample.fill_valid();
    FieldArray::new(&sample.form, "hobbies").append(json!({"title": "mathematics"}));

    sample.form.handle_submit(&mut SubmitEvent::new()).unwrap();

    assert!(sample.form.is_submitted());
    assert!(sample.form.errors().is_empty());
    let submitted = sample.submitted.lock();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0], *sample.form.values());
    assert_eq!(submitted[0].get_or_null("hobbies.0.title"), json!("mathematics"));
}

#[test]
fn test_age_bounds_are_inclusive() {
    let sample = SampleForm::new();
    sample.fill_valid();
    for (age, ok) in [(17, false), (18, true), (99, true), (100, false)] {
        sample.form.update_field("age", age);
        assert_eq!(sample.form.error("age").is_none(), ok, "age {age}");
    }
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_after_submit() {
    let sample = SampleForm::new();
    sample.fill_valid();
    sample.form.disable_field("email");
    sample.form.handle_submit(&mut SubmitEvent::new()).unwrap();

    sample.form.reset_form();

    assert!(Arc::ptr_eq(&sample.form.values(), &sample.form.initial_values()));
    assert_eq!(sample.form.values().as_inner(), &initial_values());
    assert!(sample.form.errors().is_empty());
    assert!(!sample.form.is_disabled("email"));
    assert!(!sample.form.is_submitted());
}

#[test]
fn test_reset_then_edit_leaves_initial_untouched() {
    let sample = SampleForm::new();
    sample.form.reset_form();
    sample.form.update_field("address.city", "Paris");
    assert_eq!(sample.form.initial_values().get_or_null("address.city"), json!(""));
}

// ============================================================================
// Error keying
// ============================================================================

#[test]
fn test_top_level_keying_flattens_nested_errors() {
    let sample = SampleForm::with_options(FormOptions::new().error_keying(ErrorKeying::TopLevel));
    sample.fill_valid();
    sample.form.update_field("address.city", "");

    assert_eq!(sample.form.error("address").as_deref(), Some("This field is required"));
    assert_eq!(sample.form.error("address.city"), None);
}

// ============================================================================
// Two-field form
// ============================================================================

fn two_field_form() -> (FormController, std::sync::Arc<parking_lot::Mutex<Vec<Record>>>) {
    let calls = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let form = FormController::builder(json!({"name": "", "email": ""}))
        .validate(|record: &Record| {
            ["name", "email"]
                .into_iter()
                .filter(|key| record.get_or_null(key) == json!(""))
                .map(|key| (key, "required"))
                .collect()
        })
        .on_submit(move |record: &Record| sink.lock().push(record.clone()))
        .build();
    (form, calls)
}

#[test]
fn test_two_field_successful_submit() {
    let (form, calls) = two_field_form();
    form.update_field("name", "Ann");
    form.update_field("email", "a@b.com");

    form.handle_submit(&mut SubmitEvent::new()).unwrap();

    assert!(form.errors().is_empty());
    assert_eq!(*calls.lock(), vec![Record::from(json!({"name": "Ann", "email": "a@b.com"}))]);
    assert!(form.is_submitted());
}

#[test]
fn test_two_field_blocked_submit() {
    let (form, calls) = two_field_form();

    assert!(form.handle_submit(&mut SubmitEvent::new()).is_err());

    let expected: ErrorMap = [("email", "required"), ("name", "required")].into_iter().collect();
    assert_eq!(form.errors(), expected);
    assert!(calls.lock().is_empty());
    assert!(!form.is_submitted());
}
