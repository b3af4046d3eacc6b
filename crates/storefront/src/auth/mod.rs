//! Admin session state.
//!
//! [`AuthStore`] gates the admin area. A successful login writes two
//! cookies that let the session survive a reload:
//!
//! - [`AUTH_TOKEN_COOKIE`] - an opaque random token
//! - [`USER_DATA_COOKIE`] - the JSON-serialized [`User`]
//!
//! Both are secure, `SameSite=Strict`, and expire after [`SESSION_TTL_DAYS`].

mod error;
mod verifier;

pub use error::AuthError;
pub use verifier::{AdminCredentials, CredentialVerifier, DemoCredentials, hash_password};

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;

use greensickle_core::User;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::storage::{Cookie, CookieStore, StorageError};

/// Cookie holding the opaque session token.
pub const AUTH_TOKEN_COOKIE: &str = "auth-token";

/// Cookie holding the serialized session user.
pub const USER_DATA_COOKIE: &str = "user-data";

/// Lifetime of both session cookies.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Holds the logged-in admin user, if any.
pub struct AuthStore {
    user: Option<User>,
    cookies: Box<dyn CookieStore>,
    verifier: Box<dyn CredentialVerifier>,
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStore")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Create the store and restore any session persisted in `cookies`.
    ///
    /// A corrupt session is discarded: both cookies are removed and the
    /// store starts logged out.
    pub fn restore(
        mut cookies: Box<dyn CookieStore>,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Self {
        let user = match decode_session(cookies.as_ref()) {
            Ok(user) => user,
            Err(AuthError::IncompleteSession(missing)) => {
                tracing::debug!(missing = %missing, "No complete session to restore");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt session");
                if let Err(e) = clear_cookies(cookies.as_mut()) {
                    tracing::error!(error = %e, "Failed to clear corrupt session cookies");
                }
                None
            }
        };

        if let Some(user) = &user {
            tracing::info!(email = %user.email, "Restored admin session");
            set_sentry_user(&user.id, Some(user.email.as_str()));
        }

        Self {
            user,
            cookies,
            verifier,
        }
    }

    /// Attempt to log in.
    ///
    /// Returns false, leaving the current state untouched, if the verifier
    /// rejects the pair.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let Some(user) = self.verifier.verify(email, password) else {
            tracing::warn!(email = %email, "Rejected admin login");
            return false;
        };

        if let Err(e) = self.write_session(&user) {
            tracing::error!(error = %e, "Failed to persist session; it will not survive a reload");
        }

        tracing::info!(email = %user.email, role = %user.role, "Admin logged in");
        set_sentry_user(&user.id, Some(user.email.as_str()));
        self.user = Some(user);
        true
    }

    /// Log out. Safe to call when already logged out.
    pub fn logout(&mut self) {
        if let Err(e) = clear_cookies(self.cookies.as_mut()) {
            tracing::error!(error = %e, "Failed to clear session cookies");
        }
        if let Some(user) = self.user.take() {
            tracing::info!(email = %user.email, "Admin logged out");
        }
        clear_sentry_user();
    }

    /// The logged-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The current session token, if the session cookie is live.
    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.user.as_ref()?;
        self.cookies.get(AUTH_TOKEN_COOKIE)
    }

    /// Tear the store down, returning its cookie store.
    #[must_use]
    pub fn into_cookies(self) -> Box<dyn CookieStore> {
        self.cookies
    }

    fn write_session(&mut self, user: &User) -> Result<(), StorageError> {
        let ttl = Duration::days(SESSION_TTL_DAYS);
        let user_data = serde_json::to_string(user)?;

        self.cookies
            .set(Cookie::new(AUTH_TOKEN_COOKIE, generate_session_token(), ttl))?;
        self.cookies.set(Cookie::new(USER_DATA_COOKIE, user_data, ttl))
    }
}

/// Read the session user from the two session cookies.
fn decode_session(cookies: &dyn CookieStore) -> Result<Option<User>, AuthError> {
    let token = cookies.get(AUTH_TOKEN_COOKIE);
    let user_data = cookies.get(USER_DATA_COOKIE);

    match (token, user_data) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(AuthError::IncompleteSession(AUTH_TOKEN_COOKIE)),
        (Some(_), None) => Err(AuthError::IncompleteSession(USER_DATA_COOKIE)),
        (Some(_), Some(data)) => Ok(Some(serde_json::from_str(&data)?)),
    }
}

fn clear_cookies(cookies: &mut dyn CookieStore) -> Result<(), StorageError> {
    cookies.remove(AUTH_TOKEN_COOKIE)?;
    cookies.remove(USER_DATA_COOKIE)
}

/// Generate a 256-bit random session token, base64url encoded.
fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
