//! User profile and credential types.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Public profile of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl UserProfile {
    /// Identifier handed out by the mock service.
    pub const DEMO_ID: &'static str = "1";

    /// Name used when the service has no better one.
    pub const DEMO_NAME: &'static str = "Test User";

    /// Creates a profile.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// The profile shown when nobody has signed in yet.
    pub fn demo() -> Self {
        Self::new(Self::DEMO_ID, Self::DEMO_NAME, "user@example.com")
    }
}

/// Credentials submitted by the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(())
    }
}

/// Registration data submitted by the signup form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupData {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl SignupData {
    /// Creates signup data.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(())
    }
}

/// Token and profile returned by a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque session token.
    pub token: String,
    /// The signed-in user.
    pub user: UserProfile,
}
