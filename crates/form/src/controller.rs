//! Form controller
//!
//! `FormController` is a cheaply cloneable handle over one form's state:
//! the current record, the error map, the disabled-field set and the
//! submitted flag. Every clone observes and mutates the same state.
//!
//! ## Snapshots
//!
//! The record is held as `Arc<Record>`. A write builds the next record from
//! a copy of the current one and swaps the `Arc`, so a snapshot returned by
//! [`FormController::values`] never changes after it was taken.
//!
//! ## Validation ordering
//!
//! Whole-form validation runs on the snapshot produced by the write that
//! triggered it, outside the state lock. Each write bumps a revision
//! counter and a validation result is applied only if no other write
//! happened in between, so the error map always belongs to the newest
//! record that finished validating.
//!
//! ## Callbacks
//!
//! The validate and submit callbacks are never invoked while the state lock
//! is held. They may freely call back into the controller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use formstore_core::{Record, Value};
use formstore_validation::{all_errors, CheckSequencer, CheckTicket, ErrorMap, RuleSet, Validator};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::{FormError, Result};
use crate::event::FormEvent;
use crate::options::FormOptions;

/// How many times `handle_submit` validates before giving up on a record
/// that keeps changing underneath it
pub const SUBMIT_ATTEMPTS: usize = 3;

type ValidateFn = dyn Fn(&Record) -> ErrorMap + Send + Sync;
type SubmitFn = dyn Fn(&Record) + Send + Sync;

struct FormState {
    values: Arc<Record>,
    initial: Arc<Record>,
    errors: ErrorMap,
    disabled: BTreeMap<String, bool>,
    submitted: bool,
    revision: u64,
    checks: CheckSequencer,
}

struct Shared {
    state: RwLock<FormState>,
    validate: Option<Box<ValidateFn>>,
    on_submit: Option<Box<SubmitFn>>,
    options: FormOptions,
}

/// Shared handle to one form's state
#[derive(Clone)]
pub struct FormController {
    shared: Arc<Shared>,
}

/// Whole-form validation source, resolved at build time
enum Validation {
    Callback(Box<ValidateFn>),
    Rules(RuleSet),
}

/// Builder for [`FormController`]
///
/// ```
/// use formstore_core::Record;
/// use formstore_form::FormController;
/// use formstore_validation::{required, RuleSet};
///
/// let form = FormController::builder(Record::object())
///     .rules(RuleSet::new().rule("name", vec![required()]))
///     .build();
/// form.update_field("name", "");
/// assert!(form.error("name").is_some());
/// ```
pub struct FormBuilder {
    initial: Record,
    validation: Option<Validation>,
    on_submit: Option<Box<SubmitFn>>,
    options: FormOptions,
}

impl FormBuilder {
    /// Whole-form validation callback
    ///
    /// Replaces any rule set given earlier.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> ErrorMap + Send + Sync + 'static,
    {
        self.validation = Some(Validation::Callback(Box::new(f)));
        self
    }

    /// Whole-form validation from a declarative rule set
    ///
    /// The rule set's keying is overridden by the form options. Replaces
    /// any callback given earlier.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.validation = Some(Validation::Rules(rules));
        self
    }

    /// Callback invoked with the record on a successful submit
    pub fn on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.on_submit = Some(Box::new(f));
        self
    }

    /// Form options
    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the controller
    pub fn build(self) -> FormController {
        let keying = self.options.error_keying;
        let validate: Option<Box<ValidateFn>> = match self.validation {
            Some(Validation::Callback(f)) => Some(f),
            Some(Validation::Rules(mut rules)) => {
                rules.set_keying(keying);
                Some(Box::new(move |record: &Record| rules.validate(record)))
            }
            None => None,
        };

        let initial = Arc::new(self.initial);
        let state = FormState {
            values: Arc::clone(&initial),
            initial,
            errors: ErrorMap::new(),
            disabled: BTreeMap::new(),
            submitted: false,
            revision: 0,
            checks: CheckSequencer::new(),
        };

        FormController {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                validate,
                on_submit: self.on_submit,
                options: self.options,
            }),
        }
    }
}

impl FormController {
    /// Create a form with no validation and no submit callback
    pub fn new(initial: impl Into<Record>) -> Self {
        Self::builder(initial).build()
    }

    /// Start building a form
    pub fn builder(initial: impl Into<Record>) -> FormBuilder {
        FormBuilder {
            initial: initial.into(),
            validation: None,
            on_submit: None,
            options: FormOptions::default(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current record snapshot
    pub fn values(&self) -> Arc<Record> {
        Arc::clone(&self.shared.state.read().values)
    }

    /// Record the form was created with; `reset_form` restores this
    pub fn initial_values(&self) -> Arc<Record> {
        Arc::clone(&self.shared.state.read().initial)
    }

    /// Value at `path` in the current record, null if absent
    pub fn value_at(&self, path: &str) -> Value {
        self.shared.state.read().values.get_or_null(path)
    }

    /// Current error map
    pub fn errors(&self) -> ErrorMap {
        self.shared.state.read().errors.clone()
    }

    /// Error message stored under `key`
    pub fn error(&self, key: &str) -> Option<String> {
        self.shared.state.read().errors.get(key).map(str::to_string)
    }

    /// Disabled-field map
    pub fn disabled_fields(&self) -> BTreeMap<String, bool> {
        self.shared.state.read().disabled.clone()
    }

    /// Check if `path` is marked disabled
    pub fn is_disabled(&self, path: &str) -> bool {
        self.shared.state.read().disabled.get(path).copied().unwrap_or(false)
    }

    /// Check if the form was submitted successfully since the last reset
    pub fn is_submitted(&self) -> bool {
        self.shared.state.read().submitted
    }

    /// Number of record replacements since creation
    pub fn revision(&self) -> u64 {
        self.shared.state.read().revision
    }

    /// Form options
    pub fn options(&self) -> &FormOptions {
        &self.shared.options
    }

    /// Error-map key for a field path under the configured keying
    pub fn error_key(&self, path: &str) -> String {
        self.shared.options.error_keying.key_for(path).to_string()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write `value` at `path` and, if enabled, revalidate the whole form
    ///
    /// Returns false if the path could not be written (a key addressed into
    /// a list, or a list position too far past the end). The record is
    /// unchanged in that case.
    pub fn update_field(&self, path: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let (snapshot, revision) = {
            let mut state = self.shared.state.write();
            let mut next = Record::clone(&state.values);
            if !next.set(path, value) {
                return false;
            }
            state.values = Arc::new(next);
            state.revision += 1;
            (Arc::clone(&state.values), state.revision)
        };
        debug!(target: "formstore::form", path, revision, "Field updated");

        if self.shared.options.validate_on_change {
            self.revalidate(&snapshot, revision);
        }
        true
    }

    /// Replace the whole record without validating
    pub fn set_values(&self, values: impl Into<Record>) {
        let mut state = self.shared.state.write();
        state.values = Arc::new(values.into());
        state.revision += 1;
        debug!(target: "formstore::form", revision = state.revision, "Values replaced");
    }

    /// Apply a structural edit to a copy of the current record
    ///
    /// `edit` receives the current record and returns its replacement, or
    /// `None` to refuse the edit; it runs under the state lock and must not
    /// call back into the form. A refused edit leaves the record and the
    /// revision alone and returns false. Otherwise the whole form is
    /// revalidated afterwards if enabled.
    pub(crate) fn replace_with<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&Record) -> Option<Record>,
    {
        let (snapshot, revision) = {
            let mut state = self.shared.state.write();
            let Some(next) = edit(&state.values) else {
                return false;
            };
            state.values = Arc::new(next);
            state.revision += 1;
            (Arc::clone(&state.values), state.revision)
        };
        debug!(target: "formstore::form", revision, "Record replaced");

        if self.shared.options.validate_on_change {
            self.revalidate(&snapshot, revision);
        }
        true
    }

    /// Run the whole-form validator on `snapshot` and store the result
    /// unless a newer write has landed in the meantime
    fn revalidate(&self, snapshot: &Record, revision: u64) -> bool {
        let Some(validate) = &self.shared.validate else {
            return false;
        };
        let errors = validate(snapshot);

        let mut state = self.shared.state.write();
        if state.revision != revision {
            debug!(
                target: "formstore::form",
                validated = revision,
                current = state.revision,
                "Discarding validation of superseded record"
            );
            return false;
        }
        state.errors = errors;
        true
    }

    /// Run the whole-form validator on the current record now
    ///
    /// Returns the resulting error map, which is also stored.
    pub fn validate_form(&self) -> ErrorMap {
        let (snapshot, revision) = {
            let state = self.shared.state.read();
            (Arc::clone(&state.values), state.revision)
        };
        let errors = match &self.shared.validate {
            Some(validate) => validate(&snapshot),
            None => ErrorMap::new(),
        };
        let mut state = self.shared.state.write();
        if state.revision == revision {
            state.errors = errors.clone();
        }
        errors
    }

    /// Run `validators` against the value at `path`
    ///
    /// Every failure message is returned in validator order. The error map
    /// entry for the field is set to the first message, or removed when
    /// all validators pass.
    pub fn validate_field(&self, path: &str, validators: &[Validator]) -> Vec<String> {
        let value = self.value_at(path);
        let messages = all_errors(validators, &value);
        let key = self.error_key(path);

        let mut state = self.shared.state.write();
        match messages.first() {
            Some(first) => state.errors.insert(key, first.clone()),
            None => {
                state.errors.remove(&key);
            }
        }
        messages
    }

    /// Store an error message directly
    pub fn set_error(&self, key: impl Into<String>, message: impl Into<String>) {
        self.shared.state.write().errors.insert(key, message);
    }

    /// Remove an error message
    pub fn clear_error(&self, key: &str) -> Option<String> {
        self.shared.state.write().errors.remove(key)
    }

    /// Mark `path` disabled
    pub fn disable_field(&self, path: impl Into<String>) {
        let path = path.into();
        debug!(target: "formstore::form", path = %path, "Field disabled");
        self.shared.state.write().disabled.insert(path, true);
    }

    /// Mark `path` enabled
    pub fn enable_field(&self, path: impl Into<String>) {
        let path = path.into();
        debug!(target: "formstore::form", path = %path, "Field enabled");
        self.shared.state.write().disabled.insert(path, false);
    }

    /// Validate and, if clean, hand the record to the submit callback
    ///
    /// The event's default action is always suppressed. On validation
    /// failure the error map is replaced, the callback is not invoked and
    /// `FormError::SubmitBlocked` carries the errors.
    ///
    /// The outcome is applied only if no write landed while the validator
    /// ran; otherwise validation is repeated on the newer record, up to
    /// [`SUBMIT_ATTEMPTS`] times, before giving up with
    /// `FormError::SubmitSuperseded`.
    pub fn handle_submit(&self, event: &mut impl FormEvent) -> Result<()> {
        event.prevent_default();

        for attempt in 1..=SUBMIT_ATTEMPTS {
            let (snapshot, revision) = {
                let state = self.shared.state.read();
                (Arc::clone(&state.values), state.revision)
            };
            let errors = match &self.shared.validate {
                Some(validate) => validate(&snapshot),
                None => ErrorMap::new(),
            };

            {
                let mut state = self.shared.state.write();
                if state.revision != revision {
                    debug!(
                        target: "formstore::form",
                        attempt,
                        validated = revision,
                        current = state.revision,
                        "Record changed during submit validation"
                    );
                    continue;
                }
                state.errors = errors.clone();
                if errors.is_empty() {
                    state.submitted = true;
                }
            }

            if !errors.is_empty() {
                info!(target: "formstore::form", errors = errors.len(), "Submit blocked");
                return Err(FormError::SubmitBlocked { errors });
            }
            if let Some(on_submit) = &self.shared.on_submit {
                on_submit(&snapshot);
            }
            info!(target: "formstore::form", revision, "Form submitted");
            return Ok(());
        }

        warn!(target: "formstore::form", attempts = SUBMIT_ATTEMPTS, "Submit superseded by concurrent writes");
        Err(FormError::SubmitSuperseded {
            attempts: SUBMIT_ATTEMPTS,
        })
    }

    /// Restore the initial record and clear all derived state
    pub fn reset_form(&self) {
        let mut state = self.shared.state.write();
        state.values = Arc::clone(&state.initial);
        state.errors = ErrorMap::new();
        state.disabled.clear();
        state.submitted = false;
        state.revision += 1;
        state.checks.clear();
        info!(target: "formstore::form", revision = state.revision, "Form reset");
    }

    // ========================================================================
    // External checks
    // ========================================================================

    /// Start an externally completed check for `path`
    ///
    /// Any check already in flight for the same path becomes stale.
    pub fn begin_check(&self, path: &str) -> CheckTicket {
        self.shared.state.write().checks.begin(path)
    }

    /// Apply the result of an external check
    ///
    /// `Some(message)` stores the message under the field's error key,
    /// `None` clears it. A result from a superseded ticket is discarded.
    pub fn finish_check(&self, ticket: &CheckTicket, outcome: Option<String>) -> Result<()> {
        let key = self.error_key(ticket.field());
        let mut state = self.shared.state.write();
        if !state.checks.finish(ticket) {
            warn!(target: "formstore::form", ticket = %ticket, "Check result superseded, discarding");
            return Err(FormError::StaleCheck {
                ticket: ticket.clone(),
            });
        }
        match outcome {
            Some(message) => state.errors.insert(key, message),
            None => {
                state.errors.remove(&key);
            }
        }
        Ok(())
    }

    /// Check if an external check for `path` is in flight
    pub fn is_checking(&self, path: &str) -> bool {
        self.shared.state.read().checks.is_pending(path)
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("FormController")
            .field("values", &state.values)
            .field("errors", &state.errors)
            .field("disabled", &state.disabled)
            .field("submitted", &state.submitted)
            .field("revision", &state.revision)
            .finish()
    }
}
