//! Admin-panel user record.

use serde::{Deserialize, Serialize};

use super::{Email, UserId, UserRole};

/// The user behind an authenticated admin session.
///
/// Only ever constructed by a credential verifier after a successful login,
/// or restored from a persisted session. Serialized as
/// `{"id", "email", "role", "name"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque user identifier.
    pub id: UserId,
    /// Login email address.
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    /// Display name.
    pub name: String,
}
