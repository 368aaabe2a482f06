//! Wiring of the session, the auth service and the pages.

use ocean_auth::{MockAuthService, SessionContext, TokenSlot};

use crate::config::AppConfig;
use crate::content::Catalog;
use crate::error::Result;
use crate::pages::{Dashboard, LoginPage, Navigator, ProfilePage, SignupPage};

/// One running instance of the app.
///
/// The session context is created once here and handed to every page.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    service: MockAuthService,
    navigator: Navigator,
}

impl App {
    /// Creates an app with its own in-memory token slot.
    pub fn new(config: AppConfig) -> Self {
        Self::with_slot(config, TokenSlot::in_memory())
    }

    /// Creates an app over an existing token slot.
    pub fn with_slot(config: AppConfig, slot: TokenSlot) -> Self {
        let session = SessionContext::new(slot);
        let service = MockAuthService::new(config.auth_config(), session);
        Self {
            config,
            service,
            navigator: Navigator::new(),
        }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the shared session.
    pub const fn session(&self) -> &SessionContext {
        self.service.session()
    }

    /// Returns the navigator shared by the pages.
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Opens the login page.
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.service.clone(), self.navigator.clone())
    }

    /// Opens the signup page.
    pub fn signup_page(&self) -> SignupPage {
        SignupPage::new(self.service.clone(), self.navigator.clone())
    }

    /// Opens the profile page.
    pub fn profile_page(&self) -> ProfilePage {
        ProfilePage::new(self.service.clone(), self.navigator.clone())
    }

    /// Loads the listings and opens the dashboard.
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let catalog = Catalog::load(&self.config.data_dir).await?;
        Ok(Dashboard::new(
            catalog,
            self.service.clone(),
            self.navigator.clone(),
        ))
    }
}
