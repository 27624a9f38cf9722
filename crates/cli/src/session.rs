//! One form hosted by the shell
//!
//! The session owns the controller, one binding per configured field and
//! the last record handed to the submit callback.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use formstore_core::{FieldPath, Record, Value};
use formstore_form::{
    FieldArray, FieldBinding, FieldConfig, FieldKind, FormController, FormError, FormOptions,
    SubmitEvent,
};
use formstore_validation::RuleSet;
use parking_lot::Mutex;

use crate::command::{Command, HELP};

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print; may be empty
    Text(String),
    /// The user asked to leave
    Quit,
}

pub struct Session {
    form: FormController,
    bindings: Vec<FieldBinding>,
    last_submitted: Arc<Mutex<Option<Record>>>,
}

impl Session {
    /// Build a session; whole-form rules are derived from `fields`
    pub fn new(values: Record, fields: Vec<FieldConfig>, options: FormOptions) -> Self {
        let mut rules = RuleSet::new();
        for config in &fields {
            let validators = config.declarative_validators(&options.required_message);
            if !validators.is_empty() {
                rules.push(config.name.clone(), validators);
            }
        }

        let last_submitted = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last_submitted);
        let form = FormController::builder(values)
            .rules(rules)
            .options(options)
            .on_submit(move |record: &Record| {
                tracing::info!(target: "formstore::cli", "Submitted {}", record);
                *sink.lock() = Some(record.clone());
            })
            .build();

        let bindings = fields
            .into_iter()
            .map(|config| FieldBinding::new(&form, config))
            .collect();

        Self {
            form,
            bindings,
            last_submitted,
        }
    }

    /// Load a session from JSON files
    ///
    /// Missing files fall back to an empty record, no fields and default
    /// options.
    pub fn load(values: Option<&Path>, fields: Option<&Path>, options: Option<&Path>) -> anyhow::Result<Self> {
        let values: Record = match values {
            Some(path) => read_json(path)?,
            None => Record::object(),
        };
        let fields: Vec<FieldConfig> = match fields {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };
        let options: FormOptions = match options {
            Some(path) => read_json(path)?,
            None => FormOptions::default(),
        };
        tracing::debug!(target: "formstore::cli", fields = fields.len(), "Session loaded");
        Ok(Self::new(values, fields, options))
    }

    /// The hosted form
    #[cfg(test)]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Record passed to the most recent successful submit
    pub fn last_submitted(&self) -> Option<Record> {
        self.last_submitted.lock().clone()
    }

    /// Execute one parsed command
    pub fn execute(&mut self, command: Command) -> anyhow::Result<Reply> {
        let text = match command {
            Command::Get(path) => {
                let path = path.unwrap_or_else(FieldPath::root);
                let value = self.form.value_at(path.as_str());
                serde_json::to_string_pretty(&value)?
            }
            Command::Set { path, raw } => self.set(&path, &raw)?,
            Command::Append { path, item } => {
                let list = FieldArray::new(&self.form, &path);
                if !list.append(item) {
                    anyhow::bail!("cannot write {path}");
                }
                format!("{path} now has {} item(s)", list.len())
            }
            Command::Remove { path, index } => {
                let list = FieldArray::new(&self.form, &path);
                let before = list.len();
                if !list.remove(index) {
                    anyhow::bail!("cannot write {path}");
                }
                if index >= before {
                    format!("{path} has no item {index}")
                } else {
                    format!("{path} now has {} item(s)", list.len())
                }
            }
            Command::Validate(Some(path)) => self.validate_field(&path),
            Command::Validate(None) => {
                let errors = self.form.validate_form();
                if errors.is_empty() {
                    "no errors".to_string()
                } else {
                    format_errors(errors.iter())
                }
            }
            Command::Errors => {
                let errors = self.form.errors();
                if errors.is_empty() {
                    "no errors".to_string()
                } else {
                    format_errors(errors.iter())
                }
            }
            Command::Submit => match self.form.handle_submit(&mut SubmitEvent::new()) {
                Ok(()) => {
                    let record = self.last_submitted().unwrap_or_default();
                    format!("submitted:\n{}", record.to_json_string_pretty())
                }
                Err(FormError::SubmitBlocked { errors }) => {
                    format!("submit blocked:\n{}", format_errors(errors.iter()))
                }
                Err(other) => return Err(other.into()),
            },
            Command::Reset => {
                self.form.reset_form();
                "form reset".to_string()
            }
            Command::Disable(path) => {
                self.form.disable_field(path.as_str());
                format!("{path} disabled")
            }
            Command::Enable(path) => {
                self.form.enable_field(path.as_str());
                format!("{path} enabled")
            }
            Command::Show => self.show(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn binding_mut(&mut self, path: &FieldPath) -> Option<&mut FieldBinding> {
        self.bindings
            .iter_mut()
            .find(|binding| binding.name() == path.as_str())
    }

    /// Configured fields convert raw input by kind; other paths take JSON
    /// or fall back to a plain string
    fn set(&mut self, path: &FieldPath, raw: &str) -> anyhow::Result<String> {
        if let Some(binding) = self.binding_mut(path) {
            if !binding.input(raw) {
                if let FieldKind::Select { options } = &binding.config().kind {
                    if !options.iter().any(|option| option == raw) {
                        anyhow::bail!("'{raw}' is not an option for {path}");
                    }
                }
                anyhow::bail!("cannot write {path}");
            }
            let value = binding.value();
            return Ok(match binding.error() {
                Some(message) => format!("{path} = {value}  ! {message}"),
                None => format!("{path} = {value}"),
            });
        }

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        if !self.form.update_field(path.as_str(), value) {
            anyhow::bail!("cannot write {path}");
        }
        Ok(format!("{path} = {}", self.form.value_at(path.as_str())))
    }

    fn validate_field(&self, path: &FieldPath) -> String {
        let validators = self
            .bindings
            .iter()
            .find(|binding| binding.name() == path.as_str())
            .map(FieldBinding::effective_validators)
            .unwrap_or_default();
        let messages = self.form.validate_field(path.as_str(), &validators);
        if messages.is_empty() {
            format!("{path}: ok")
        } else {
            messages
                .iter()
                .map(|message| format!("{path}: {message}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    fn show(&self) -> String {
        let mut out = String::new();
        for binding in &self.bindings {
            let line = binding.render(|view| {
                let mut line = format!("{} [{}] = {}", view.label, view.name, view.value);
                if let FieldKind::Select { options } = view.kind {
                    let _ = write!(line, "  ({})", options.join("|"));
                }
                if view.disabled {
                    line.push_str("  (disabled)");
                }
                if let Some(error) = &view.error {
                    let _ = write!(line, "  ! {error}");
                }
                line
            });
            out.push_str(&line);
            out.push('\n');
        }
        if self.form.is_submitted() {
            out.push_str("(submitted)\n");
        }
        out.trim_end().to_string()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn format_errors<'a>(errors: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    errors
        .map(|(key, message)| format!("{key}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}
