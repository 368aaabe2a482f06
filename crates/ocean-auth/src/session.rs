//! Session context shared by the pages of the app.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::storage::TokenSlot;
use crate::user::{AuthResponse, UserProfile};

/// Whether someone is signed in, and who.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// No token is stored.
    Anonymous,
    /// A token is stored. The profile is known if it was cached with it.
    Authenticated {
        /// The signed-in user, if known.
        user: Option<UserProfile>,
    },
}

impl SessionStatus {
    /// Returns whether a token is stored.
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the signed-in user, if known.
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated { user } => user.as_ref(),
            Self::Anonymous => None,
        }
    }

    fn read(slot: &TokenSlot) -> Self {
        if slot.is_authenticated() {
            Self::Authenticated {
                user: slot.profile(),
            }
        } else {
            Self::Anonymous
        }
    }
}

/// Explicit session state for the app, backed by a [`TokenSlot`].
///
/// The slot is read once when the context is created. Sign-in and sign-out
/// through the context update it immediately; anything that writes the slot
/// behind its back must be followed by [`SessionContext::refresh`].
/// Subscribers are notified whenever the status changes.
#[derive(Debug, Clone)]
pub struct SessionContext {
    slot: TokenSlot,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl SessionContext {
    /// Creates a context and reads the current status from `slot`.
    pub fn new(slot: TokenSlot) -> Self {
        let initial = SessionStatus::read(&slot);
        debug!(authenticated = initial.is_authenticated(), "session context created");
        let (status, _) = watch::channel(initial);
        Self {
            slot,
            status: Arc::new(status),
        }
    }

    /// Creates a context over a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(TokenSlot::in_memory())
    }

    /// Returns the token slot this context reads.
    pub const fn slot(&self) -> &TokenSlot {
        &self.slot
    }

    /// Returns the current status.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Returns whether someone is signed in.
    pub fn is_logged_in(&self) -> bool {
        self.status.borrow().is_authenticated()
    }

    /// Returns the signed-in user, if known.
    pub fn user(&self) -> Option<UserProfile> {
        self.status.borrow().user().cloned()
    }

    /// Returns the stored token.
    pub fn token(&self) -> Option<String> {
        self.slot.token()
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Re-reads the slot and publishes the result if it changed.
    pub fn refresh(&self) -> SessionStatus {
        let status = SessionStatus::read(&self.slot);
        self.publish(status.clone());
        status
    }

    /// Stores a fresh login and publishes it.
    pub fn sign_in(&self, response: &AuthResponse) {
        self.slot.set_token(&response.token);
        self.slot.set_profile(&response.user);
        info!(user = %response.user.email, "signed in");
        self.publish(SessionStatus::Authenticated {
            user: Some(response.user.clone()),
        });
    }

    /// Clears the stored login and publishes it.
    pub fn sign_out(&self) {
        self.slot.remove_token();
        info!("signed out");
        self.publish(SessionStatus::Anonymous);
    }

    fn publish(&self, status: SessionStatus) {
        let changed = self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            debug!("session status changed");
        }
    }
}
