//! Error types for forms.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Form-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The field is not part of the form's declared field set.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A submit was started while a previous one is still pending.
    #[error("form submit is already in progress")]
    AlreadySubmitting,
}

/// Errors returned by [`FormEngine::on_submit`](crate::FormEngine::on_submit).
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    /// The engine refused to start the submit.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The caller's submit handler failed. The error is passed through untouched.
    #[error("submit handler failed: {0}")]
    Handler(E),
}

impl<E> SubmitError<E> {
    /// Returns the handler error, if that is what failed.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            Self::Handler(err) => Some(err),
            Self::Form(_) => None,
        }
    }
}

/// Validation messages keyed by field, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Sets the error for a field, replacing any previous message.
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Removes the error for a field, returning the old message.
    pub fn clear(&mut self, field: &str) -> Option<String> {
        self.errors.remove(field)
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether the field currently has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Returns the names of all fields with errors.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in &self.errors {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_previous_message() {
        let mut errors = ValidationErrors::new();
        errors.set("email", "Email is required");
        errors.set("email", "Please enter a valid email address");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_clear() {
        let mut errors = ValidationErrors::new();
        errors.set("name", "Name is required");

        assert_eq!(errors.clear("name"), Some("Name is required".to_string()));
        assert_eq!(errors.clear("name"), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.set("password", "Password is required");
        errors.set("email", "Email is required");

        assert_eq!(
            errors.to_string(),
            "email: Email is required\npassword: Password is required\n"
        );
        assert_eq!(errors.fields(), vec!["email", "password"]);
    }

    #[test]
    fn test_submit_error_passes_handler_error_through() {
        let err: SubmitError<String> = SubmitError::Handler("network down".to_string());
        assert_eq!(err.to_string(), "submit handler failed: network down");
        assert_eq!(err.into_handler_error(), Some("network down".to_string()));

        let err: SubmitError<String> = FormError::AlreadySubmitting.into();
        assert_eq!(err.to_string(), "form submit is already in progress");
        assert!(err.into_handler_error().is_none());
    }
}
