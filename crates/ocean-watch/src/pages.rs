//! Headless page controllers.
//!
//! Each page owns its form engine and wires the form's submit to the auth
//! service. Failures from the service end up in the page's [`ErrorSlot`];
//! successes move the [`Navigator`] to the next route.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use ocean_auth::{AuthError, AuthResponse, LoginCredentials, MockAuthService, SignupData, UserProfile};
use ocean_forms::{
    form_values, validate_password, validate_password_confirmation, EmailValidator, FormEngine,
    FormState, RequiredValidator, SubmitError, SubmitOutcome, ValidatorRegistry,
};
use tracing::error;

use crate::content::{Catalog, Hazard};

/// Route of the dashboard.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Route of the login page.
pub const LOGIN_ROUTE: &str = "/login";

/// Route of the hazard report page.
pub const UPLOAD_ROUTE: &str = "/upload";

/// Result of submitting a page's form.
pub type PageSubmit = std::result::Result<SubmitOutcome<AuthResponse>, SubmitError<AuthError>>;

/// The page-level error message.
#[derive(Debug, Clone, Default)]
pub struct ErrorSlot {
    message: Arc<Mutex<Option<String>>>,
}

impl ErrorSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs `err` and shows its message.
    pub fn handle_error(&self, err: &dyn fmt::Display) {
        error!(%err, "error occurred");
        *self.lock() = Some(err.to_string());
    }

    /// Clears the message.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Returns the message being shown.
    pub fn error(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.message.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Records route changes requested by pages.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl Navigator {
    /// Creates a navigator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `route`.
    pub fn push(&self, route: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }

    /// Returns the route last moved to.
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Returns every route moved to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Values of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

form_values!(LoginForm { email, password });

/// Values of the signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// New password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
}

form_values!(SignupForm {
    name,
    email,
    password,
    confirm_password,
});

/// Validation rules of the login form.
pub fn login_validators() -> ValidatorRegistry<LoginForm> {
    ValidatorRegistry::new()
        .validator("email", EmailValidator)
        .validator("password", RequiredValidator::new("Password"))
}

/// Validation rules of the signup form.
pub fn signup_validators() -> ValidatorRegistry<SignupForm> {
    ValidatorRegistry::new()
        .validator("name", RequiredValidator::new("Name"))
        .validator("email", EmailValidator)
        .field("password", validate_password)
        .cross_field("confirm_password", |value, form: &SignupForm| {
            validate_password_confirmation(&form.password, value)
        })
}

/// Runs a service call inside a form submit: clears the page error first,
/// shows the failure if there is one, and navigates on success.
async fn run_auth_call<F>(
    call: F,
    errors: ErrorSlot,
    navigator: Navigator,
) -> Result<AuthResponse, AuthError>
where
    F: std::future::Future<Output = Result<AuthResponse, AuthError>>,
{
    errors.clear();
    match call.await {
        Ok(response) => {
            navigator.push(DASHBOARD_ROUTE);
            Ok(response)
        }
        Err(err) => {
            errors.handle_error(&err);
            Err(err)
        }
    }
}

/// The login page.
#[derive(Debug, Clone)]
pub struct LoginPage {
    form: FormEngine<LoginForm, AuthResponse, AuthError>,
    errors: ErrorSlot,
}

impl LoginPage {
    /// Creates the page.
    pub fn new(service: MockAuthService, navigator: Navigator) -> Self {
        let errors = ErrorSlot::new();
        let slot = errors.clone();
        let form = FormEngine::new(LoginForm::default(), login_validators(), move |values: LoginForm| {
            let service = service.clone();
            run_auth_call(
                async move {
                    service
                        .login(LoginCredentials::new(values.email, values.password))
                        .await
                },
                slot.clone(),
                navigator.clone(),
            )
        });
        Self { form, errors }
    }

    /// Returns the form engine.
    pub const fn form(&self) -> &FormEngine<LoginForm, AuthResponse, AuthError> {
        &self.form
    }

    /// Returns the current form state.
    pub fn state(&self) -> FormState<LoginForm> {
        self.form.state()
    }

    /// Returns the page-level error message.
    pub fn error(&self) -> Option<String> {
        self.errors.error()
    }

    /// Applies a keystroke to a field.
    pub fn change(&self, field: &str, value: &str) -> ocean_forms::Result<()> {
        self.form.on_field_change(field, value)
    }

    /// Submits the form.
    pub async fn submit(&self) -> PageSubmit {
        self.form.on_submit().await
    }
}

/// The signup page.
#[derive(Debug, Clone)]
pub struct SignupPage {
    form: FormEngine<SignupForm, AuthResponse, AuthError>,
    errors: ErrorSlot,
}

impl SignupPage {
    /// Creates the page.
    pub fn new(service: MockAuthService, navigator: Navigator) -> Self {
        let errors = ErrorSlot::new();
        let slot = errors.clone();
        let form = FormEngine::new(SignupForm::default(), signup_validators(), move |values: SignupForm| {
            let service = service.clone();
            // The confirmation is only checked locally.
            let data = SignupData::new(values.name, values.email, values.password);
            run_auth_call(
                async move { service.signup(data).await },
                slot.clone(),
                navigator.clone(),
            )
        });
        Self { form, errors }
    }

    /// Returns the form engine.
    pub const fn form(&self) -> &FormEngine<SignupForm, AuthResponse, AuthError> {
        &self.form
    }

    /// Returns the current form state.
    pub fn state(&self) -> FormState<SignupForm> {
        self.form.state()
    }

    /// Returns the page-level error message.
    pub fn error(&self) -> Option<String> {
        self.errors.error()
    }

    /// Applies a keystroke to a field.
    pub fn change(&self, field: &str, value: &str) -> ocean_forms::Result<()> {
        self.form.on_field_change(field, value)
    }

    /// Submits the form.
    pub async fn submit(&self) -> PageSubmit {
        self.form.on_submit().await
    }
}

/// The profile page.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    service: MockAuthService,
    navigator: Navigator,
    errors: ErrorSlot,
}

impl ProfilePage {
    /// Creates the page.
    pub fn new(service: MockAuthService, navigator: Navigator) -> Self {
        Self {
            service,
            navigator,
            errors: ErrorSlot::new(),
        }
    }

    /// Loads the profile to show.
    pub async fn load(&self) -> Option<UserProfile> {
        match self.service.current_user().await {
            Ok(user) => Some(user),
            Err(err) => {
                self.errors.handle_error(&err);
                None
            }
        }
    }

    /// Logs out and returns to the login page.
    pub async fn logout(&self) {
        match self.service.logout().await {
            Ok(()) => self.navigator.push(LOGIN_ROUTE),
            Err(err) => self.errors.handle_error(&err),
        }
    }

    /// Returns the page-level error message.
    pub fn error(&self) -> Option<String> {
        self.errors.error()
    }
}

/// The dashboard: hazard feed plus session-dependent affordances.
#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Catalog,
    service: MockAuthService,
    navigator: Navigator,
}

impl Dashboard {
    /// Creates the dashboard.
    pub const fn new(catalog: Catalog, service: MockAuthService, navigator: Navigator) -> Self {
        Self {
            catalog,
            service,
            navigator,
        }
    }

    /// Returns the loaded listings.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Gives back the loaded listings.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Hazards to show, most recent first.
    pub fn feed(&self) -> Vec<&Hazard> {
        self.catalog.recent_hazards()
    }

    /// Whether the "report a hazard" button is offered.
    pub fn can_report_hazard(&self) -> bool {
        self.service.session().is_logged_in()
    }

    /// Whether the login/signup links are offered.
    pub fn shows_login_links(&self) -> bool {
        !self.can_report_hazard()
    }

    /// Follows the "report a hazard" button: signed-in users go to the
    /// report page, everyone else to the login page. Returns the route.
    pub fn report_hazard(&self) -> &'static str {
        let route = if self.can_report_hazard() {
            UPLOAD_ROUTE
        } else {
            LOGIN_ROUTE
        };
        self.navigator.push(route);
        route
    }
}
