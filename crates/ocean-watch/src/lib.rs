//! # ocean-watch
//!
//! Coastal hazard listings plus the login, signup and profile flows of
//! Ocean Watch, without a rendering layer.
//!
//! This crate provides:
//! - [`content`]: hazard and safe-zone listings decoded from JSON
//! - [`pages`]: login, signup, profile and dashboard controllers built on
//!   [`ocean_forms::FormEngine`] and [`ocean_auth::MockAuthService`]
//! - [`App`]: one session context shared by every page
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use ocean_watch::{App, AppConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let app = App::new(AppConfig::default().with_latency(Duration::ZERO));
//! let login = app.login_page();
//!
//! login.change("email", "diver@example.com").unwrap();
//! login.change("password", "hunter2").unwrap();
//! let outcome = login.submit().await.unwrap();
//!
//! assert!(outcome.is_submitted());
//! assert!(app.session().is_logged_in());
//! assert_eq!(app.navigator().current().as_deref(), Some("/dashboard"));
//! # });
//! ```

mod app;
pub mod config;
pub mod content;
mod error;
pub mod pages;

pub use app::App;
pub use config::AppConfig;
pub use content::{Catalog, Hazard, Intensity, SafeZone};
pub use error::{ContentError, Result};
