//! # ocean-auth
//!
//! Mock identity service and explicit session state for Ocean Watch.
//!
//! This crate provides:
//! - [`TokenSlot`]: the opaque session token kept under
//!   `"ocean_watch_auth_token"` in a [`KeyValueStore`]
//! - [`SessionContext`]: who is signed in, with subscription and refresh
//! - [`MockAuthService`]: login, signup and logout with simulated latency
//!
//! ## Quick Start
//!
//! ```rust
//! use ocean_auth::{AuthConfig, LoginCredentials, MockAuthService, SessionContext};
//!
//! # tokio_test::block_on(async {
//! let session = SessionContext::in_memory();
//! let service = MockAuthService::new(AuthConfig::instant(), session.clone());
//!
//! let response = service
//!     .login(LoginCredentials::new("diver@example.com", "Abcdefg1"))
//!     .await
//!     .expect("mock login succeeds");
//!
//! assert!(session.is_logged_in());
//! assert_eq!(session.token(), Some(response.token));
//!
//! service.logout().await.expect("mock logout succeeds");
//! assert!(!session.is_logged_in());
//! # });
//! ```
//!
//! ## Session Subscription
//!
//! Pages that show login-dependent affordances hold a
//! [`SessionContext`] and either read it or call
//! [`SessionContext::subscribe`] to be told when it changes. If the token
//! slot is written by someone else, call [`SessionContext::refresh`].

mod error;
mod service;
mod session;
pub mod storage;
mod user;

pub use error::{AuthError, Result};
pub use service::{AuthConfig, MockAuthService};
pub use session::{SessionContext, SessionStatus};
pub use storage::{KeyValueStore, MemoryStore, TokenSlot, AUTH_TOKEN_KEY};
pub use user::{AuthResponse, LoginCredentials, SignupData, UserProfile};
