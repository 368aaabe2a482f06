//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use ocean_auth::AuthConfig;

/// Default directory holding the static listings.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Settings collected from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `hazards.json` and `safeZones.json`.
    pub data_dir: PathBuf,
    /// Overrides every simulated service delay.
    pub latency: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            latency: None,
        }
    }
}

impl AppConfig {
    /// Creates a config reading listings from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            latency: None,
        }
    }

    /// Sets one delay for every service call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Builds the auth service settings.
    pub fn auth_config(&self) -> AuthConfig {
        self.latency
            .map_or_else(AuthConfig::default, AuthConfig::with_latency)
    }
}
