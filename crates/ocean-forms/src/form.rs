//! Form state and the engine that drives it.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{FormError, Result, SubmitError, ValidationErrors};
use crate::validation::{validate_form, ValidatorRegistry};
use crate::values::FormValues;

/// Snapshot of a form: values, errors, touched fields and submit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState<T> {
    /// Current field values.
    pub values: T,
    /// Messages from the latest failing validation run per field.
    pub errors: ValidationErrors,
    /// Fields that received a user-driven change or a submit attempt.
    pub touched: BTreeSet<String>,
    /// Whether the submit handler is running.
    pub is_submitting: bool,
}

impl<T: FormValues> FormState<T> {
    /// Creates a fresh state holding `values`.
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
            touched: BTreeSet::new(),
            is_submitting: false,
        }
    }

    /// Returns the current value of a field.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field)
    }

    /// Returns the error for a field, if its latest validation failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    /// Returns whether the field has been touched.
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Returns the error for a field only once it has been touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    /// Returns whether no field currently has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Caller-supplied submit handler.
pub type SubmitHandler<T, O, E> = Arc<dyn Fn(T) -> BoxFuture<'static, std::result::Result<O, E>> + Send + Sync>;

/// Result of a submit that the engine did not refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<O> {
    /// Validation failed; the handler was not called.
    Invalid(ValidationErrors),
    /// The handler ran and returned this value.
    Submitted(O),
}

impl<O> SubmitOutcome<O> {
    /// Returns whether the handler ran.
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Returns the handler's output, if it ran.
    pub fn into_submitted(self) -> Option<O> {
        match self {
            Self::Submitted(output) => Some(output),
            Self::Invalid(_) => None,
        }
    }
}

/// Tracks one form's values and validity, and gates submission on validation.
///
/// Cloning gives another handle to the same form, so a rendering layer can
/// keep feeding field changes while a submit is pending.
pub struct FormEngine<T, O, E> {
    initial: T,
    validators: ValidatorRegistry<T>,
    on_submit: SubmitHandler<T, O, E>,
    state: Arc<Mutex<FormState<T>>>,
}

impl<T: Clone, O, E> Clone for FormEngine<T, O, E> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            validators: self.validators.clone(),
            on_submit: Arc::clone(&self.on_submit),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: fmt::Debug, O, E> fmt::Debug for FormEngine<T, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEngine")
            .field("initial", &self.initial)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

impl<T, O, E> FormEngine<T, O, E>
where
    T: FormValues,
    O: Send + 'static,
    E: Send + 'static,
{
    /// Creates an engine over `initial` values.
    ///
    /// Rules registered for a field that `initial` does not declare are never
    /// run.
    pub fn new<F, Fut>(initial: T, validators: ValidatorRegistry<T>, on_submit: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<O, E>> + Send + 'static,
    {
        for field in validators.fields() {
            if !initial.has_field(field) {
                warn!(field, "ignoring rule for undeclared field");
            }
        }

        let handler: SubmitHandler<T, O, E> = Arc::new(move |values| on_submit(values).boxed());
        Self {
            state: Arc::new(Mutex::new(FormState::new(initial.clone()))),
            initial,
            validators,
            on_submit: handler,
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> FormState<T> {
        self.lock().clone()
    }

    /// Returns a snapshot of the current values.
    pub fn values(&self) -> T {
        self.lock().values.clone()
    }

    /// Returns whether a submit is pending.
    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting
    }

    /// Returns the validators this form was built with.
    pub const fn validators(&self) -> &ValidatorRegistry<T> {
        &self.validators
    }

    /// Applies a user-driven change to one field and re-validates it.
    ///
    /// The field's previous error is dropped before the new value is checked,
    /// so the error always reflects the latest value. Other fields are left
    /// alone.
    pub fn on_field_change(&self, field: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let mut state = self.lock();

        if !state.values.set(field, value) {
            return Err(FormError::UnknownField(field.to_string()));
        }

        state.errors.clear(field);
        state.touched.insert(field.to_string());

        let state = &mut *state;
        let current = state.values.get(field).unwrap_or_default();
        if let Some(result) = self.validators.validate_field(field, current, &state.values) {
            if let Some(message) = result.error_message() {
                debug!(field, error = message, "field failed validation");
                state.errors.set(field, message);
            }
        }

        Ok(())
    }

    /// Assigns a field without validating it or marking it touched.
    pub fn set_field_value(&self, field: &str, value: impl Into<String>) -> Result<()> {
        if self.lock().values.set(field, value.into()) {
            Ok(())
        } else {
            Err(FormError::UnknownField(field.to_string()))
        }
    }

    /// Restores the initial values and clears errors and touched fields.
    ///
    /// A submit that is still pending keeps `is_submitting` set until its
    /// handler finishes, so a reset never opens the way for a second submit.
    pub fn reset(&self) {
        self.reset_with(self.initial.clone());
    }

    /// Replaces the values with `values` and clears errors and touched fields.
    pub fn reset_with(&self, values: T) {
        let mut state = self.lock();
        let pending = state.is_submitting;
        *state = FormState::new(values);
        state.is_submitting = pending;
        debug!(pending, "form reset");
    }

    /// Validates every field and, if all pass, runs the submit handler.
    ///
    /// Every declared field is marked touched first. On validation failure the
    /// errors are stored and returned as [`SubmitOutcome::Invalid`]. While the
    /// handler runs `is_submitting` is set; it is cleared again however the
    /// handler finishes, including when this future is dropped. A second
    /// submit while one is pending fails with [`FormError::AlreadySubmitting`].
    pub async fn on_submit(&self) -> std::result::Result<SubmitOutcome<O>, SubmitError<E>> {
        let values = {
            let mut state = self.lock();
            if state.is_submitting {
                warn!("submit rejected while another submit is pending");
                return Err(FormError::AlreadySubmitting.into());
            }

            let fields = state.values.field_names();
            state.touched.extend(fields);

            let report = validate_form(&state.values, &self.validators);
            state.errors = report.errors;
            if !report.is_valid {
                debug!(fields = ?state.errors.fields(), "submit blocked by validation");
                return Ok(SubmitOutcome::Invalid(state.errors.clone()));
            }

            state.is_submitting = true;
            state.values.clone()
        };

        let _guard = SubmittingGuard {
            state: &self.state,
        };
        info!("submitting form");
        match (self.on_submit)(values).await {
            Ok(output) => Ok(SubmitOutcome::Submitted(output)),
            Err(err) => Err(SubmitError::Handler(err)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `is_submitting` when the submit finishes or is abandoned.
struct SubmittingGuard<'a, T> {
    state: &'a Mutex<FormState<T>>,
}

impl<T> Drop for SubmittingGuard<'_, T> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::validation::{validate_email, validate_password, validate_required};

    type Values = BTreeMap<String, String>;

    fn login_values(email: &str, password: &str) -> Values {
        [
            ("email".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn login_validators() -> ValidatorRegistry<Values> {
        ValidatorRegistry::new()
            .field("email", validate_email)
            .field("password", |v| validate_required(v, "Password"))
    }

    fn counting_engine(
        initial: Values,
        calls: Arc<AtomicUsize>,
    ) -> FormEngine<Values, String, String> {
        FormEngine::new(initial, login_validators(), move |values: Values| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(values["email"].clone())
            }
        })
    }

    #[test]
    fn test_initial_state() {
        let engine = counting_engine(login_values("", ""), Arc::default());
        let state = engine.state();

        assert_eq!(state.values, login_values("", ""));
        assert!(state.errors.is_empty());
        assert!(state.touched.is_empty());
        assert!(!state.is_submitting);
        assert!(state.is_valid());
    }

    #[test]
    fn test_field_change_sets_error_iff_rejected() {
        let engine = counting_engine(login_values("", ""), Arc::default());

        engine.on_field_change("email", "a@b").unwrap();
        assert_eq!(
            engine.state().error("email"),
            Some("Please enter a valid email address")
        );

        engine.on_field_change("email", "a@b.com").unwrap();
        assert_eq!(engine.state().error("email"), None);

        engine.on_field_change("email", "").unwrap();
        assert_eq!(engine.state().error("email"), Some("Email is required"));
    }

    #[test]
    fn test_field_change_touches_only_that_field() {
        let engine = counting_engine(login_values("", ""), Arc::default());

        engine.on_field_change("password", "x").unwrap();
        engine.on_field_change("password", "xy").unwrap();
        let state = engine.state();

        assert!(state.is_touched("password"));
        assert!(!state.is_touched("email"));
        assert_eq!(state.touched.len(), 1);
        assert_eq!(state.value("password"), Some("xy"));
    }

    #[test]
    fn test_field_change_leaves_other_errors() {
        let engine = counting_engine(login_values("", ""), Arc::default());

        engine.on_field_change("email", "nope").unwrap();
        engine.on_field_change("password", "").unwrap();
        engine.on_field_change("password", "secret").unwrap();

        let state = engine.state();
        assert_eq!(state.error("email"), Some("Please enter a valid email address"));
        assert_eq!(state.error("password"), None);
    }

    #[test]
    fn test_field_without_rule_always_passes() {
        let values: Values = [("notes".to_string(), String::new())].into_iter().collect();
        let engine: FormEngine<Values, (), String> =
            FormEngine::new(values, ValidatorRegistry::new(), |_| async { Ok(()) });

        engine.on_field_change("notes", "").unwrap();
        assert!(engine.state().errors.is_empty());
        assert!(engine.state().is_touched("notes"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let engine = counting_engine(login_values("", ""), Arc::default());

        assert_eq!(
            engine.on_field_change("nickname", "x"),
            Err(FormError::UnknownField("nickname".to_string()))
        );
        assert_eq!(
            engine.set_field_value("nickname", "x"),
            Err(FormError::UnknownField("nickname".to_string()))
        );
        let state = engine.state();
        assert!(state.touched.is_empty());
        assert_eq!(state.values.len(), 2);
    }

    #[test]
    fn test_set_field_value_skips_validation() {
        let engine = counting_engine(login_values("", ""), Arc::default());

        engine.set_field_value("email", "not-an-email").unwrap();
        let state = engine.state();
        assert_eq!(state.value("email"), Some("not-an-email"));
        assert!(state.errors.is_empty());
        assert!(state.touched.is_empty());
    }

    #[test]
    fn test_reset_restores_values() {
        let engine = counting_engine(login_values("", ""), Arc::default());
        engine.on_field_change("email", "bad").unwrap();

        engine.reset();
        assert_eq!(engine.state(), FormState::new(login_values("", "")));

        engine.on_field_change("password", "x").unwrap();
        engine.reset_with(login_values("a@b.com", "pw"));
        let state = engine.state();
        assert_eq!(state.values, login_values("a@b.com", "pw"));
        assert!(state.errors.is_empty());
        assert!(state.touched.is_empty());
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_visible_error_waits_for_touch() {
        let mut state = FormState::new(login_values("", ""));
        state.errors.set("email", "Email is required");
        assert_eq!(state.visible_error("email"), None);

        state.touched.insert("email".to_string());
        assert_eq!(state.visible_error("email"), Some("Email is required"));
    }

    #[tokio::test]
    async fn test_submit_blocked_by_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(login_values("", "x"), Arc::clone(&calls));

        let outcome = engine.on_submit().await.unwrap();
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let state = engine.state();
        assert!(state.is_touched("email"));
        assert!(state.is_touched("password"));
        assert!(!state.is_submitting);
        assert_eq!(state.errors, errors);
    }

    #[tokio::test]
    async fn test_submit_runs_handler_when_valid() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = counting_engine(login_values("a@b.com", "x"), Arc::clone(&calls));
        engine.set_field_value("email", "bad").unwrap();
        engine.on_field_change("email", "user@example.com").unwrap();

        let outcome = engine.on_submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Submitted("user@example.com".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!engine.is_submitting());
        assert_eq!(engine.state().touched.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_clears_stale_errors() {
        let engine = counting_engine(login_values("", "x"), Arc::default());
        assert!(!engine.on_submit().await.unwrap().is_submitted());

        engine.set_field_value("email", "a@b.com").unwrap();
        assert!(engine.on_submit().await.unwrap().is_submitted());
        assert!(engine.state().errors.is_empty());
    }

    #[tokio::test]
    async fn test_handler_failure_propagates_and_resets() {
        let engine: FormEngine<Values, (), String> = FormEngine::new(
            login_values("a@b.com", "Abcdefg1"),
            ValidatorRegistry::new().field("password", validate_password),
            |_| async { Err("Invalid credentials".to_string()) },
        );

        let err = engine.on_submit().await.unwrap_err();
        assert_eq!(
            err.into_handler_error(),
            Some("Invalid credentials".to_string())
        );
        assert!(!engine.is_submitting());
    }

    #[tokio::test]
    async fn test_pending_submit_flags_and_rejects_reentry() {
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let release_rx = Arc::new(Mutex::new(Some(release_rx)));
        let engine: FormEngine<Values, Values, String> = FormEngine::new(
            login_values("a@b.com", "x"),
            login_validators(),
            move |values| {
                let rx = release_rx.lock().unwrap().take();
                async move {
                    if let Some(rx) = rx {
                        let _ = rx.await;
                    }
                    Ok(values)
                }
            },
        );

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.on_submit().await }
        });
        while !engine.is_submitting() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            engine.on_submit().await,
            Err(SubmitError::Form(FormError::AlreadySubmitting))
        ));

        engine.on_field_change("email", "oops").unwrap();
        assert_eq!(
            engine.state().error("email"),
            Some("Please enter a valid email address")
        );

        release_tx.send(()).unwrap();
        let submitted = pending.await.unwrap().unwrap().into_submitted().unwrap();
        assert_eq!(submitted, login_values("a@b.com", "x"));
        assert!(!engine.is_submitting());
        assert_eq!(engine.state().value("email"), Some("oops"));
    }

    #[tokio::test]
    async fn test_dropped_submit_resets_flag() {
        let engine: FormEngine<Values, (), String> = FormEngine::new(
            login_values("a@b.com", "x"),
            login_validators(),
            |_| futures::future::pending(),
        );

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            engine.on_submit(),
        )
        .await;
        assert!(result.is_err());
        assert!(!engine.is_submitting());
    }

    #[tokio::test]
    async fn test_reset_keeps_pending_submit_exclusive() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let release_rx = Arc::new(Mutex::new(Some(release_rx)));
        let engine: FormEngine<Values, (), String> = FormEngine::new(
            login_values("a@b.com", "x"),
            login_validators(),
            {
                let calls = Arc::clone(&calls);
                move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let rx = release_rx.lock().unwrap().take();
                    async move {
                        if let Some(rx) = rx {
                            let _ = rx.await;
                        }
                        Ok(())
                    }
                }
            },
        );

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.on_submit().await }
        });
        while !engine.is_submitting() {
            tokio::task::yield_now().await;
        }

        engine.reset_with(login_values("c@d.com", "y"));
        let state = engine.state();
        assert_eq!(state.values, login_values("c@d.com", "y"));
        assert!(state.touched.is_empty());
        assert!(state.is_submitting);

        assert!(matches!(
            engine.on_submit().await,
            Err(SubmitError::Form(FormError::AlreadySubmitting))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        release_tx.send(()).unwrap();
        assert!(pending.await.unwrap().unwrap().is_submitted());
        assert!(!engine.is_submitting());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_handler_resets_flag() {
        async fn crash(_: Values) -> std::result::Result<(), String> {
            panic!("submit handler crashed");
        }

        let engine: FormEngine<Values, (), String> =
            FormEngine::new(login_values("a@b.com", "x"), login_validators(), crash);

        let joined = tokio::spawn({
            let engine = engine.clone();
            async move { engine.on_submit().await }
        })
        .await;

        assert!(joined.unwrap_err().is_panic());
        assert!(!engine.is_submitting());

        engine.on_field_change("email", "still@usable.com").unwrap();
        assert_eq!(engine.state().value("email"), Some("still@usable.com"));
    }

    #[tokio::test]
    async fn test_rule_for_undeclared_field_never_blocks_submit() {
        let values: Values = [("email".to_string(), "a@b.com".to_string())]
            .into_iter()
            .collect();
        let rules = ValidatorRegistry::new()
            .field("email", validate_email)
            .field("emial", |v| validate_required(v, "Emial"));
        let engine: FormEngine<Values, (), String> =
            FormEngine::new(values, rules, |_| async { Ok(()) });

        assert!(engine.on_submit().await.unwrap().is_submitted());

        engine.on_field_change("email", "").unwrap();
        let SubmitOutcome::Invalid(errors) = engine.on_submit().await.unwrap() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.fields(), vec!["email"]);
        assert_eq!(engine.state().errors.fields(), vec!["email"]);
    }

    #[test]
    fn test_state_serializes_for_rendering() {
        let mut state = FormState::new(login_values("", ""));
        state.errors.set("email", "Email is required");
        state.touched.insert("email".to_string());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "values": {"email": "", "password": ""},
                "errors": {"email": "Email is required"},
                "touched": ["email"],
                "is_submitting": false,
            })
        );
    }
}
