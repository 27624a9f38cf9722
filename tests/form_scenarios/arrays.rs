//! Field array scenarios

use crate::test_utils::*;
use formstore::prelude::*;
use serde_json::json;

#[test]
fn test_append_then_remove_last_restores_list() {
    let sample = SampleForm::new();
    let hobbies = FieldArray::new(&sample.form, "hobbies");
    hobbies.append(json!({"title": "chess"}));
    let before = hobbies.fields();

    hobbies.append(json!({"title": "go"}));
    hobbies.remove(hobbies.len() - 1);

    assert_eq!(hobbies.fields(), before);
}

#[test]
fn test_item_bindings_follow_item_paths() {
    let sample = SampleForm::new();
    let hobbies = FieldArray::new(&sample.form, "hobbies");
    hobbies.append(json!({"title": ""}));
    hobbies.append(json!({"title": ""}));

    let mut second = FieldBinding::new(
        &sample.form,
        FieldConfig::new(hobbies.item_path(1, "title"), "Hobby").required(),
    );
    second.change("rowing");

    assert_eq!(sample.form.value_at("hobbies.1.title"), json!("rowing"));
    assert_eq!(sample.form.value_at("hobbies.0.title"), json!(""));
}

#[test]
fn test_array_edits_leave_earlier_snapshots_alone() {
    let sample = SampleForm::new();
    let hobbies = FieldArray::new(&sample.form, "hobbies");
    let empty = sample.form.values();

    hobbies.append(json!({"title": "chess"}));
    let one = sample.form.values();
    hobbies.remove(0);

    assert_eq!(empty.get_or_null("hobbies"), json!([]));
    assert_eq!(one.get_or_null("hobbies"), json!([{"title": "chess"}]));
    assert_eq!(sample.form.value_at("hobbies"), json!([]));
}

#[test]
fn test_remove_middle_keeps_order() {
    let form = FormController::new(json!({"tags": ["a", "b", "c", "d"]}));
    let tags = FieldArray::new(&form, "tags");
    tags.remove(1);
    assert_eq!(tags.fields(), vec![json!("a"), json!("c"), json!("d")]);
    tags.remove(10);
    assert_eq!(tags.len(), 3);
}

#[test]
fn test_append_then_remove_restores_original_hobbies() {
    let form = FormController::new(json!({"hobbies": [{"title": "a"}]}));
    let hobbies = FieldArray::new(&form, "hobbies");

    hobbies.append(json!({"title": "b"}));
    assert_eq!(hobbies.len(), 2);
    hobbies.remove(1);

    assert_eq!(form.value_at("hobbies"), json!([{"title": "a"}]));
}
