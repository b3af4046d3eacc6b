//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while verifying credentials or decoding a session.
///
/// None of these reach `AuthStore` callers: a bad login is `false` and a bad
/// session is no session. They exist for logging and for setting up
/// verifiers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The persisted user record is not valid JSON for a `User`.
    #[error("invalid session data: {0}")]
    InvalidSessionData(#[from] serde_json::Error),

    /// Only one of the two session cookies is present.
    #[error("incomplete session: missing {0} cookie")]
    IncompleteSession(&'static str),

    /// The configured password hash is not a PHC string.
    #[error("invalid password hash: {0}")]
    InvalidPasswordHash(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
