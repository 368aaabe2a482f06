//! Key-value storage and the auth token slot kept in it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::error;

use crate::error::{AuthError, Result};
use crate::user::UserProfile;

/// Storage key holding the session token.
pub const AUTH_TOKEN_KEY: &str = "ocean_watch_auth_token";

/// Storage key holding the signed-in user's profile as JSON.
pub const AUTH_USER_KEY: &str = "ocean_watch_auth_user";

/// A string key-value store, in the manner of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads a key.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Writes a key.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a key. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|e| AuthError::Storage(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|e| AuthError::Storage(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}

/// The auth token slot in a [`KeyValueStore`].
///
/// Storage failures are logged and swallowed: a failed read behaves like a
/// missing token and a failed write leaves the slot as it was.
#[derive(Clone)]
pub struct TokenSlot {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSlot")
            .field("key", &AUTH_TOKEN_KEY)
            .finish_non_exhaustive()
    }
}

impl TokenSlot {
    /// Creates a slot over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Creates a slot over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Stores the token.
    pub fn set_token(&self, token: &str) {
        if let Err(err) = self.store.set_item(AUTH_TOKEN_KEY, token) {
            error!(%err, "error setting auth token");
        }
    }

    /// Returns the stored token.
    pub fn token(&self) -> Option<String> {
        match self.store.get_item(AUTH_TOKEN_KEY) {
            Ok(token) => token,
            Err(err) => {
                error!(%err, "error getting auth token");
                None
            }
        }
    }

    /// Removes the token and the cached profile.
    pub fn remove_token(&self) {
        if let Err(err) = self.store.remove_item(AUTH_TOKEN_KEY) {
            error!(%err, "error removing auth token");
        }
        if let Err(err) = self.store.remove_item(AUTH_USER_KEY) {
            error!(%err, "error removing cached profile");
        }
    }

    /// Returns whether a non-empty token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }

    /// Caches the signed-in user's profile next to the token.
    pub fn set_profile(&self, user: &UserProfile) {
        let stored = serde_json::to_string(user)
            .map_err(AuthError::from)
            .and_then(|json| self.store.set_item(AUTH_USER_KEY, &json));
        if let Err(err) = stored {
            error!(%err, "error caching user profile");
        }
    }

    /// Returns the cached profile, if present and readable.
    pub fn profile(&self) -> Option<UserProfile> {
        let loaded: Result<Option<UserProfile>> = self.store.get_item(AUTH_USER_KEY).and_then(|json| {
            json.map(|json| serde_json::from_str(&json).map_err(AuthError::from))
                .transpose()
        });
        match loaded {
            Ok(profile) => profile,
            Err(err) => {
                error!(%err, "error reading cached profile");
                None
            }
        }
    }
}

/// Generates a random opaque session token.
pub fn generate_token() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
