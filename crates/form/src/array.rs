//! List-valued fields
//!
//! A [`FieldArray`] addresses a path holding a list of items and offers
//! append and remove. Every operation builds a new record from a copy of
//! the current one and swaps it into the form in one step, so snapshots
//! taken earlier are never affected.

use formstore_core::{Record, Value};
use tracing::debug;

use crate::controller::FormController;

/// A list-valued path of a form
#[derive(Debug, Clone)]
pub struct FieldArray {
    form: FormController,
    path: String,
}

impl FieldArray {
    /// Bind the list at `path`
    pub fn new(form: &FormController, path: impl AsRef<str>) -> Self {
        Self {
            form: form.clone(),
            path: path.as_ref().to_string(),
        }
    }

    /// Path of the list
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current items; empty if the path is absent or not a list
    pub fn fields(&self) -> Vec<Value> {
        match self.form.value_at(&self.path) {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.fields().len()
    }

    /// Check if there are no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of `field` inside item `index`, e.g. `hobbies.2.title`
    ///
    /// An empty `field` yields the path of the item itself.
    pub fn item_path(&self, index: usize, field: &str) -> String {
        match (self.path.is_empty(), field.is_empty()) {
            (true, true) => index.to_string(),
            (true, false) => format!("{index}.{field}"),
            (false, true) => format!("{}.{index}", self.path),
            (false, false) => format!("{}.{index}.{field}", self.path),
        }
    }

    /// Add `item` at the end of the list
    ///
    /// A missing or non-list value at the path is treated as an empty list.
    /// Returns false, changing nothing, if the path cannot be written.
    pub fn append(&self, item: impl Into<Value>) -> bool {
        let item = item.into();
        self.form.replace_with(|current| {
            let mut items = list_at(current, &self.path);
            items.push(item);
            let len = items.len();
            let next = with_list(current, &self.path, items)?;
            debug!(target: "formstore::form", path = %self.path, len, "Item appended");
            Some(next)
        })
    }

    /// Remove the item at `index`
    ///
    /// An out-of-range index leaves the items unchanged, though the record
    /// is still replaced. Returns false, changing nothing, if the path
    /// cannot be written.
    pub fn remove(&self, index: usize) -> bool {
        self.form.replace_with(|current| {
            let mut items = list_at(current, &self.path);
            if index < items.len() {
                items.remove(index);
                debug!(target: "formstore::form", path = %self.path, index, "Item removed");
            } else {
                debug!(
                    target: "formstore::form",
                    path = %self.path,
                    index,
                    len = items.len(),
                    "Remove index out of range"
                );
            }
            with_list(current, &self.path, items)
        })
    }
}

fn list_at(record: &Record, path: &str) -> Vec<Value> {
    match record.get(path) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Copy of `current` with `items` at `path`, or `None` if the path cannot
/// be written
fn with_list(current: &Record, path: &str, items: Vec<Value>) -> Option<Record> {
    let mut next = current.clone();
    next.set(path, Value::Array(items)).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FormOptions;
    use formstore_validation::{required, RuleSet};
    use serde_json::json;
    use std::sync::Arc;

    fn form() -> FormController {
        FormController::new(json!({"hobbies": [{"title": "chess"}], "tags": "oops"}))
    }

    #[test]
    fn test_fields_and_len() {
        let form = form();
        let hobbies = FieldArray::new(&form, "hobbies");
        assert_eq!(hobbies.len(), 1);
        assert_eq!(hobbies.fields(), vec![json!({"title": "chess"})]);

        assert!(FieldArray::new(&form, "missing").is_empty());
        assert!(FieldArray::new(&form, "tags").is_empty());
    }

    #[test]
    fn test_append_produces_new_snapshot() {
        let form = form();
        let hobbies = FieldArray::new(&form, "hobbies");
        let before = form.values();

        hobbies.append(json!({"title": "go"}));
        assert_eq!(hobbies.len(), 2);
        assert_eq!(form.value_at("hobbies.1.title"), json!("go"));

        // The earlier snapshot still has one item
        assert_eq!(before.get("hobbies").and_then(Value::as_array).map(Vec::len), Some(1));
        assert!(!Arc::ptr_eq(&before, &form.values()));
    }

    #[test]
    fn test_append_to_missing_or_scalar_path() {
        let form = form();
        FieldArray::new(&form, "skills").append("rust");
        assert_eq!(form.value_at("skills"), json!(["rust"]));

        FieldArray::new(&form, "tags").append("a");
        assert_eq!(form.value_at("tags"), json!(["a"]));
    }

    #[test]
    fn test_remove_shifts_items() {
        let form = form();
        let hobbies = FieldArray::new(&form, "hobbies");
        hobbies.append(json!({"title": "go"}));
        hobbies.append(json!({"title": "tennis"}));

        hobbies.remove(1);
        assert_eq!(
            hobbies.fields(),
            vec![json!({"title": "chess"}), json!({"title": "tennis"})]
        );
    }

    #[test]
    fn test_remove_out_of_range_keeps_items() {
        let form = form();
        let hobbies = FieldArray::new(&form, "hobbies");
        let revision = form.revision();
        assert!(hobbies.remove(5));
        assert_eq!(hobbies.len(), 1);
        assert_eq!(form.revision(), revision + 1);
    }

    #[test]
    fn test_unwritable_path_changes_nothing() {
        let form = FormController::new(json!({"tags": ["a"]}));
        let items = FieldArray::new(&form, "tags.items");

        assert!(!items.append(1));
        assert!(!items.remove(0));
        assert_eq!(form.revision(), 0);
        assert_eq!(*form.values().as_inner(), json!({"tags": ["a"]}));
        assert!(items.is_empty());
    }

    #[test]
    fn test_item_path() {
        let form = form();
        let hobbies = FieldArray::new(&form, "hobbies");
        assert_eq!(hobbies.item_path(2, "title"), "hobbies.2.title");
        assert_eq!(hobbies.item_path(0, ""), "hobbies.0");
        assert_eq!(FieldArray::new(&form, "").item_path(3, "x"), "3.x");
    }

    #[test]
    fn test_structural_edit_revalidates() {
        let form = FormController::builder(json!({"hobbies": []}))
            .rules(RuleSet::new().rule("hobbies.0.title", vec![required()]))
            .build();
        let hobbies = FieldArray::new(&form, "hobbies");

        hobbies.append(json!({"title": ""}));
        assert!(form.error("hobbies.0.title").is_some());
        hobbies.remove(0);
        assert!(form.error("hobbies.0.title").is_some(), "missing item is still required");

        let quiet = FormController::builder(json!({"hobbies": []}))
            .rules(RuleSet::new().rule("hobbies.0.title", vec![required()]))
            .options(FormOptions::new().validate_on_change(false))
            .build();
        FieldArray::new(&quiet, "hobbies").append(json!({"title": ""}));
        assert!(quiet.errors().is_empty());
    }
}
