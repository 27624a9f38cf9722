//! Shared fixtures for the scenario tests

use formstore::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

pub fn initial_values() -> Value {
    json!({
        "name": "",
        "email": "",
        "age": 0,
        "gender": "",
        "address": {"street": "", "city": ""},
        "hobbies": []
    })
}

pub fn field_configs() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("name", "Name").required().max_length(40),
        FieldConfig::new("email", "Email").required().email_format(),
        FieldConfig::new("age", "Age")
            .number_range(18, 99)
            .kind(FieldKind::Number),
        FieldConfig::new("gender", "Gender").kind(FieldKind::Select {
            options: vec!["male".into(), "female".into(), "other".into()],
        }),
        FieldConfig::new("address.street", "Street"),
        FieldConfig::new("address.city", "City").required(),
    ]
}

pub fn rules_for(configs: &[FieldConfig]) -> RuleSet {
    configs.iter().fold(RuleSet::new(), |rules, config| {
        rules.rule(
            config.name.clone(),
            config.declarative_validators("This field is required"),
        )
    })
}

/// The sample form plus a log of every record handed to `on_submit`
pub struct SampleForm {
    pub form: FormController,
    pub submitted: Arc<Mutex<Vec<Record>>>,
}

impl SampleForm {
    pub fn new() -> Self {
        Self::with_options(FormOptions::default())
    }

    pub fn with_options(options: FormOptions) -> Self {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&submitted);
        let form = FormController::builder(initial_values())
            .rules(rules_for(&field_configs()))
            .on_submit(move |record: &Record| sink.lock().push(record.clone()))
            .options(options)
            .build();
        Self { form, submitted }
    }

    pub fn binding(&self, name: &str) -> FieldBinding {
        let config = field_configs()
            .into_iter()
            .find(|config| config.name == name)
            .unwrap_or_else(|| panic!("no field config named {name}"));
        FieldBinding::new(&self.form, config)
    }

    pub fn fill_valid(&self) {
        self.form.update_field("name", "Ada Lovelace");
        self.form.update_field("email", "ada@example.com");
        self.form.update_field("age", 36);
        self.form.update_field("gender", "female");
        self.form.update_field("address.street", "12 St James's Square");
        self.form.update_field("address.city", "London");
    }
}
