//! Mock identity service.
//!
//! Every call waits for a simulated round trip and then succeeds. No password
//! is checked; a login only needs a non-empty email and password.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{AuthError, Result};
use crate::session::SessionContext;
use crate::storage::generate_token;
use crate::user::{AuthResponse, LoginCredentials, SignupData, UserProfile};

/// Simulated latencies of the mock service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthConfig {
    /// Delay before login and signup answer.
    pub login_latency: Duration,
    /// Delay before logout and profile lookups answer.
    pub session_latency: Duration,
}

impl AuthConfig {
    /// Default login/signup delay.
    pub const DEFAULT_LOGIN_LATENCY: Duration = Duration::from_millis(500);

    /// Default logout/profile delay.
    pub const DEFAULT_SESSION_LATENCY: Duration = Duration::from_millis(300);

    /// A config that answers immediately.
    pub const fn instant() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// A config with the same delay for every call.
    pub const fn with_latency(latency: Duration) -> Self {
        Self {
            login_latency: latency,
            session_latency: latency,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_latency: Self::DEFAULT_LOGIN_LATENCY,
            session_latency: Self::DEFAULT_SESSION_LATENCY,
        }
    }
}

/// Login, signup and logout against a simulated backend.
///
/// Successful logins are recorded in the injected [`SessionContext`].
#[derive(Debug, Clone)]
pub struct MockAuthService {
    config: AuthConfig,
    session: SessionContext,
}

impl MockAuthService {
    /// Creates a service recording logins in `session`.
    pub const fn new(config: AuthConfig, session: SessionContext) -> Self {
        Self { config, session }
    }

    /// Returns the session this service signs in and out of.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Logs a user in.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<AuthResponse> {
        debug!(email = %credentials.email, "login requested");
        simulate(self.config.login_latency).await;
        credentials.check()?;

        let response = AuthResponse {
            token: generate_token(),
            user: UserProfile::new(UserProfile::DEMO_ID, UserProfile::DEMO_NAME, credentials.email),
        };
        self.session.sign_in(&response);
        Ok(response)
    }

    /// Registers a new user and logs them in.
    pub async fn signup(&self, data: SignupData) -> Result<AuthResponse> {
        debug!(email = %data.email, "signup requested");
        simulate(self.config.login_latency).await;
        data.check()?;

        let response = AuthResponse {
            token: generate_token(),
            user: UserProfile::new(UserProfile::DEMO_ID, data.name, data.email),
        };
        info!(user = %response.user.email, "account created");
        self.session.sign_in(&response);
        Ok(response)
    }

    /// Logs the current user out.
    pub async fn logout(&self) -> Result<()> {
        simulate(self.config.session_latency).await;
        self.session.sign_out();
        Ok(())
    }

    /// Returns the signed-in user, or the demo profile if nobody is.
    pub async fn current_user(&self) -> Result<UserProfile> {
        simulate(self.config.session_latency).await;
        Ok(self.session.user().unwrap_or_else(UserProfile::demo))
    }

    /// Returns the signed-in user, failing if nobody is.
    pub async fn require_user(&self) -> Result<UserProfile> {
        if !self.session.is_logged_in() {
            return Err(AuthError::NotSignedIn);
        }
        self.current_user().await
    }
}

async fn simulate(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MockAuthService {
        MockAuthService::new(AuthConfig::instant(), SessionContext::in_memory())
    }

    #[tokio::test]
    async fn test_login_signs_in() {
        let service = service();
        let response = service
            .login(LoginCredentials::new("diver@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(response.token.len(), 64);
        assert_eq!(
            response.user,
            UserProfile::new("1", "Test User", "diver@example.com")
        );
        assert!(service.session().is_logged_in());
        assert_eq!(service.session().token(), Some(response.token));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials() {
        let service = service();
        let err = service
            .login(LoginCredentials::new("", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!service.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_signup_uses_given_name() {
        let service = service();
        let response = service
            .signup(SignupData::new("Asha", "asha@example.com", "Abcdefg1"))
            .await
            .unwrap();

        assert_eq!(response.user.name, "Asha");
        assert_eq!(service.current_user().await.unwrap().name, "Asha");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let service = service();
        service
            .login(LoginCredentials::new("a@b.com", "pw"))
            .await
            .unwrap();
        service.logout().await.unwrap();

        assert!(!service.session().is_logged_in());
        assert_eq!(service.session().token(), None);
        assert!(matches!(
            service.require_user().await,
            Err(AuthError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_current_user_falls_back_to_demo() {
        assert_eq!(service().current_user().await.unwrap(), UserProfile::demo());
    }

    #[test]
    fn test_default_latencies() {
        let config = AuthConfig::default();
        assert_eq!(config.login_latency, Duration::from_millis(500));
        assert_eq!(config.session_latency, Duration::from_millis(300));
        assert_eq!(AuthConfig::instant().login_latency, Duration::ZERO);
    }

    #[test]
    fn test_login_with_latency_blocks_on_runtime() {
        let service = MockAuthService::new(
            AuthConfig::with_latency(Duration::from_millis(5)),
            SessionContext::in_memory(),
        );
        let response =
            tokio_test::block_on(service.login(LoginCredentials::new("a@b.com", "pw")));
        tokio_test::assert_ok!(response);
        assert!(service.session().is_logged_in());
    }
}
