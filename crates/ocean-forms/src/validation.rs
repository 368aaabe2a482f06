//! Field validators and the per-form validator registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::values::FormValues;

/// Message recorded when a validator rejects a value without saying why.
pub const DEFAULT_INVALID_MESSAGE: &str = "Invalid value";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Verdict of a single validator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the value was accepted.
    pub valid: bool,
    /// Why the value was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// An accepting verdict.
    pub const fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A rejecting verdict with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Returns whether the value was accepted.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the message to show for a rejected value.
    pub fn error_message(&self) -> Option<&str> {
        if self.valid {
            None
        } else {
            Some(self.message.as_deref().unwrap_or(DEFAULT_INVALID_MESSAGE))
        }
    }
}

/// Validates an email address.
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::invalid("Email is required");
    }

    if !EMAIL_REGEX.is_match(email) {
        return ValidationResult::invalid("Please enter a valid email address");
    }

    ValidationResult::valid()
}

/// Validates a new password.
///
/// The length rule and the composition rule are checked separately, so a
/// short password reports the length message first.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::invalid("Password is required");
    }

    if password.chars().count() < 8 {
        return ValidationResult::invalid("Password must be at least 8 characters long");
    }

    if !is_strong_password(password) {
        return ValidationResult::invalid(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        );
    }

    ValidationResult::valid()
}

fn is_strong_password(password: &str) -> bool {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    has_lower && has_upper && has_digit && password.chars().count() >= 8
}

/// Validates that a value is present. `label` names the field in the message.
pub fn validate_required(value: &str, label: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid(format!("{label} is required"));
    }

    ValidationResult::valid()
}

/// Validates that a confirmation matches the password exactly.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if password != confirmation {
        return ValidationResult::invalid("Passwords do not match");
    }

    ValidationResult::valid()
}

/// A reusable field rule that only looks at the field's own value.
pub trait Validator: Send + Sync {
    /// Checks `value`.
    fn validate(&self, value: &str) -> ValidationResult;
}

/// Rejects empty or whitespace-only values with "{label} is required".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredValidator {
    label: String,
}

impl RequiredValidator {
    /// Creates a validator whose message names the field by `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        validate_required(value, &self.label)
    }
}

/// Checks email addresses with [`validate_email`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        validate_email(value)
    }
}

/// A registered field rule. Receives the field's value and the whole value set.
pub type FieldRule<T> = Arc<dyn Fn(&str, &T) -> ValidationResult + Send + Sync>;

/// Per-field validators for one form. Fields without a rule always pass.
pub struct ValidatorRegistry<T> {
    rules: BTreeMap<String, FieldRule<T>>,
}

impl<T> Clone for ValidatorRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<T> Default for ValidatorRegistry<T> {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }
}

impl<T> fmt::Debug for ValidatorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("fields", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: FormValues> ValidatorRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule that only looks at the field's own value.
    #[must_use]
    pub fn field<F>(self, field: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        self.cross_field(field, move |value, _| rule(value))
    }

    /// Registers a rule that can read the other fields' current values.
    #[must_use]
    pub fn cross_field<F>(mut self, field: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&str, &T) -> ValidationResult + Send + Sync + 'static,
    {
        self.rules.insert(field.into(), Arc::new(rule));
        self
    }

    /// Registers a [`Validator`] as the field's rule.
    #[must_use]
    pub fn validator(self, field: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.field(field, move |value| validator.validate(value))
    }

    /// Returns whether the field has a rule.
    pub fn contains(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    /// Returns the names of the fields with rules.
    pub fn fields(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Runs the field's rule, if any, against `value`.
    pub fn validate_field(&self, field: &str, value: &str, values: &T) -> Option<ValidationResult> {
        self.rules.get(field).map(|rule| rule(value, values))
    }
}

/// Aggregate verdict of [`validate_form`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    /// Whether every rule accepted its field.
    pub is_valid: bool,
    /// Messages for the rejected fields.
    pub errors: ValidationErrors,
}

/// Runs each declared field's rule, if it has one, against the field's
/// current value.
///
/// Rules registered under a name the value set doesn't declare never run, so
/// the error map only ever names declared fields.
pub fn validate_form<T: FormValues>(values: &T, validators: &ValidatorRegistry<T>) -> FormValidation {
    let mut errors = ValidationErrors::new();

    for field in values.field_names() {
        let value = values.get(&field).unwrap_or_default();
        if let Some(message) = validators
            .validate_field(&field, value, values)
            .as_ref()
            .and_then(ValidationResult::error_message)
        {
            errors.set(&field, message);
        }
    }

    FormValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
