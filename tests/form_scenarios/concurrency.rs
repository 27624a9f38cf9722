//! Shared-handle scenarios across threads

use crate::test_utils::*;
use formstore::prelude::*;
use serde_json::json;
use std::thread;

#[test]
fn test_bindings_on_many_threads_lose_no_updates() {
    let sample = SampleForm::new();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let form = sample.form.clone();
            thread::spawn(move || {
                let hobbies = FieldArray::new(&form, "hobbies");
                for i in 0..25 {
                    hobbies.append(json!({"title": format!("t{t}-{i}")}));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(FieldArray::new(&sample.form, "hobbies").len(), 100);
}

#[test]
fn test_errors_settle_on_last_write() {
    let sample = SampleForm::new();
    sample.fill_valid();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let form = sample.form.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    let email = if (t + i) % 2 == 0 { "ok@example.com" } else { "broken" };
                    form.update_field("email", email);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever the interleaving, a final write decides the error map
    sample.form.update_field("email", "ada@example.com");
    assert!(sample.form.errors().is_empty());
}

#[test]
fn test_external_check_last_ticket_wins() {
    let sample = SampleForm::new();
    let slow = sample.form.begin_check("email");
    let fast = sample.form.begin_check("email");

    let form = sample.form.clone();
    thread::spawn(move || form.finish_check(&fast, Some("Already registered".into())))
        .join()
        .unwrap()
        .unwrap();

    let stale = sample.form.finish_check(&slow, None);
    assert!(matches!(stale, Err(FormError::StaleCheck { .. })));
    assert_eq!(sample.form.error("email").as_deref(), Some("Already registered"));
}
