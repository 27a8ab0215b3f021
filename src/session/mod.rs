//! Session store - who the client is signed in as
//!
//! The persisted entries (`access_token`, `user_data`) are the source of truth
//! across restarts. [`SessionStore`] keeps an in-memory [`Session`] that caches
//! them for the lifetime of the process and is only ever changed through
//! [`SessionStore::hydrate`], [`SessionStore::login`] and
//! [`SessionStore::logout`]. Every mutation writes storage first, then updates
//! the cache, so both stay consistent.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "access_token";

/// Storage key holding the JSON-serialized [`UserRecord`]
pub const USER_KEY: &str = "user_data";

/// Name shown when the session has no cached profile
pub const FALLBACK_DISPLAY_NAME: &str = "Pengguna";

/// Profile of the signed-in user as returned by the backend
///
/// Only `name` is interpreted by this client. Every other field is kept
/// exactly as received and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// `name`, when the backend sent it as a string
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// Any field, untouched
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Coarse authentication state derived from a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
}

/// Authentication state of the current client
///
/// Fields are private so the "logged out implies no user" rule cannot be broken.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    authenticated: bool,
    user: Option<UserRecord>,
}

impl Session {
    /// Not signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed in; `user` may be absent when only a token is known
    pub fn signed_in(user: Option<UserRecord>) -> Self {
        Self {
            authenticated: true,
            user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn state(&self) -> AuthState {
        if self.authenticated {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        }
    }

    /// Name used in greetings, falls back when no profile is cached
    pub fn display_name(&self) -> &str {
        display_name(self.user.as_ref())
    }
}

/// Greeting name for an optional profile
pub fn display_name(user: Option<&UserRecord>) -> &str {
    user.and_then(UserRecord::name)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_DISPLAY_NAME)
}

/// Owns the persisted entries and the cached [`Session`]
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    session: Session,
}

impl SessionStore {
    /// Wrap a storage backend. The session starts anonymous until [`hydrate`](Self::hydrate).
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            session: Session::anonymous(),
        }
    }

    /// The cached session
    pub fn current(&self) -> &Session {
        &self.session
    }

    /// Rebuild the session from persisted storage
    ///
    /// No token (or an empty one) means logged out, whatever else is stored.
    /// A user record that is not a JSON object is removed from storage; the
    /// token alone still counts as authenticated.
    pub fn hydrate(&mut self) -> Session {
        let Some(_token) = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty()) else {
            self.session = Session::anonymous();
            tracing::info!("No stored access token, starting logged out");
            return self.session.clone();
        };

        let user = match self.store.get(USER_KEY) {
            Some(raw) => match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable cached user record: {}", e);
                    if let Err(e) = self.store.remove(USER_KEY) {
                        tracing::warn!("Failed to remove cached user record: {:#}", e);
                    }
                    None
                }
            },
            None => None,
        };

        self.session = Session::signed_in(user);
        tracing::info!(
            "Restored session for {}",
            self.session.display_name()
        );
        self.session.clone()
    }

    /// Persist a fresh sign-in and cache it
    ///
    /// Without a profile any previously cached record is removed so storage
    /// never describes a different user than the token.
    pub fn login(&mut self, token: &str, user: Option<UserRecord>) -> Session {
        if let Err(e) = self.store.set(TOKEN_KEY, token) {
            tracing::warn!("Failed to persist access token: {:#}", e);
        }

        let persisted = match &user {
            Some(user) => serde_json::to_string(user)
                .map_err(anyhow::Error::from)
                .and_then(|json| self.store.set(USER_KEY, &json)),
            None => self.store.remove(USER_KEY),
        };
        if let Err(e) = persisted {
            tracing::warn!("Failed to persist user record: {:#}", e);
        }

        self.session = Session::signed_in(user);
        self.session.clone()
    }

    /// Forget the sign-in, both persisted and cached
    pub fn logout(&mut self) -> Session {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to clear {}: {:#}", key, e);
            }
        }

        self.session = Session::anonymous();
        self.session.clone()
    }

    /// Stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }
}
