//! # ocean-forms
//!
//! Form state tracking and validation for Ocean Watch.
//!
//! This crate provides:
//! - [`FormEngine`]: field values, per-field errors, touched fields and the
//!   submit lifecycle for any [`FormValues`] type
//! - Validation rules for emails, passwords, required fields and password
//!   confirmation
//! - A [`ValidatorRegistry`] mapping fields to rules, and [`validate_form`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ocean_forms::{form_values, validate_email, validate_required};
//! use ocean_forms::{FormEngine, SubmitOutcome, ValidatorRegistry};
//!
//! #[derive(Debug, Clone, Default)]
//! struct LoginForm {
//!     email: String,
//!     password: String,
//! }
//!
//! form_values!(LoginForm { email, password });
//!
//! let validators = ValidatorRegistry::new()
//!     .field("email", validate_email)
//!     .field("password", |v| validate_required(v, "Password"));
//!
//! let form: FormEngine<LoginForm, String, String> = FormEngine::new(
//!     LoginForm::default(),
//!     validators,
//!     |values: LoginForm| async move { Ok(values.email) },
//! );
//!
//! form.on_field_change("email", "not-an-email").unwrap();
//! assert_eq!(
//!     form.state().error("email"),
//!     Some("Please enter a valid email address"),
//! );
//!
//! form.on_field_change("email", "diver@example.com").unwrap();
//! form.on_field_change("password", "hunter2").unwrap();
//!
//! let outcome = futures::executor::block_on(form.on_submit()).unwrap();
//! assert_eq!(outcome, SubmitOutcome::Submitted("diver@example.com".to_string()));
//! ```
//!
//! ## Validation
//!
//! The rule functions return a [`ValidationResult`]:
//!
//! ```rust
//! use ocean_forms::{validate_password, validate_password_confirmation};
//!
//! assert_eq!(
//!     validate_password("abc").message.as_deref(),
//!     Some("Password must be at least 8 characters long"),
//! );
//! assert!(validate_password("Abcdefg1").is_valid());
//! assert!(!validate_password_confirmation("Secret1!", "secret1!").is_valid());
//! ```
//!
//! Rules that need other fields register with
//! [`ValidatorRegistry::cross_field`] and receive the form's current values.
//! Reusable [`Validator`] objects can be registered with
//! [`ValidatorRegistry::validator`].

mod error;
mod form;
pub mod validation;
mod values;

pub use error::{FormError, Result, SubmitError, ValidationErrors};
pub use form::{FormEngine, FormState, SubmitHandler, SubmitOutcome};
pub use validation::{
    validate_email, validate_form, validate_password, validate_password_confirmation,
    validate_required, EmailValidator, FormValidation, RequiredValidator, ValidationResult,
    Validator, ValidatorRegistry,
};
pub use values::FormValues;
