//! Credential verification.
//!
//! The admin area accepts exactly one account. Which account, and how its
//! password is checked, depends on the environment:
//!
//! - [`AdminCredentials`] - one configured account with an argon2 password hash.
//! - [`DemoCredentials`] - the fixed demo account, for local development only.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use greensickle_core::{Email, User, UserId, UserRole};

use super::AuthError;
use crate::config::AdminAuthConfig;

/// Checks an email/password pair and, on success, produces the session user.
pub trait CredentialVerifier {
    /// Return the user for a matching pair, or `None`.
    fn verify(&self, email: &str, password: &str) -> Option<User>;
}

/// The demo account: `admin@farmproducts.com` / `admin123`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoCredentials;

impl DemoCredentials {
    pub const EMAIL: &'static str = "admin@farmproducts.com";
    pub const PASSWORD: &'static str = "admin123";
    pub const USER_ID: &'static str = "1";
    pub const NAME: &'static str = "Farm Administrator";
}

impl CredentialVerifier for DemoCredentials {
    fn verify(&self, email: &str, password: &str) -> Option<User> {
        if email != Self::EMAIL || password != Self::PASSWORD {
            return None;
        }

        Some(User {
            id: UserId::new(Self::USER_ID),
            email: Email::parse(Self::EMAIL).ok()?,
            role: UserRole::Admin,
            name: Self::NAME.to_owned(),
        })
    }
}

/// A single configured admin account verified against an argon2 hash.
pub struct AdminCredentials {
    user: User,
    password_hash: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl AdminCredentials {
    /// Create a verifier for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPasswordHash` if `password_hash` is not a
    /// PHC-format hash string.
    pub fn new(user: User, password_hash: SecretString) -> Result<Self, AuthError> {
        PasswordHash::new(password_hash.expose_secret())
            .map_err(|e| AuthError::InvalidPasswordHash(e.to_string()))?;
        Ok(Self {
            user,
            password_hash,
        })
    }

    /// Create a verifier from the admin section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPasswordHash` if the configured hash is malformed.
    pub fn from_config(config: &AdminAuthConfig) -> Result<Self, AuthError> {
        let user = User {
            id: UserId::new(config.email.as_str()),
            email: config.email.clone(),
            role: config.role,
            name: config.name.clone(),
        };
        Self::new(user, config.password_hash.clone())
    }
}

impl CredentialVerifier for AdminCredentials {
    fn verify(&self, email: &str, password: &str) -> Option<User> {
        if email != self.user.email.as_str() {
            return None;
        }

        let parsed = PasswordHash::new(self.password_hash.expose_secret()).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()?;

        Some(self.user.clone())
    }
}

/// Hash a password with argon2 for use as `ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}
