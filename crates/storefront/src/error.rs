//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for failures that reach the top of the
//! application. Call [`AppError::capture`] to report one to Sentry.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::services::email::MailError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication setup failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Email delivery setup or sending failed.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

impl AppError {
    /// Report the error to Sentry and log it with the event ID.
    pub fn capture(&self) -> sentry::types::Uuid {
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
        event_id
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for an admin action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(ConfigError::MissingEnvVar("ADMIN_EMAIL".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: ADMIN_EMAIL"
        );

        let err = AppError::from(StorageError::InvalidKey("../etc".to_string()));
        assert!(err.to_string().starts_with("Storage error: "));

        let err = AppError::from(MailError::Invalid("missing name".to_string()));
        assert!(err.to_string().starts_with("Mail error: "));
    }

    #[test]
    fn test_capture_without_client_is_noop() {
        // No Sentry client is bound in tests; capture must still succeed.
        let err = AppError::from(AuthError::PasswordHash);
        let _ = err.capture();
    }

    #[test]
    fn test_sentry_user_without_client() {
        set_sentry_user(&"1", Some("admin@farmproducts.com"));
        add_breadcrumb("catalog", "Product added", &[("product_id", "1")]);
        clear_sentry_user();
    }
}
