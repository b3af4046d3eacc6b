//! Application state.
//!
//! [`AppState`] owns the two stores and the optional mailer. It is built
//! once at startup and mutated in place by admin actions; nothing in it is
//! shared across threads.

use crate::auth::{AdminCredentials, AuthStore, CredentialVerifier, DemoCredentials};
use crate::catalog::ProductStore;
use crate::config::{AuthConfig, StorefrontConfig};
use crate::error::Result;
use crate::services::email::{EmailJsClient, Mailer};
use crate::storage::{FileCookieJar, FileStore};

/// File name of the session cookie jar inside the data directory.
pub const COOKIE_FILE: &str = "cookies.json";

/// Storefront application state.
#[derive(Debug)]
pub struct AppState {
    products: ProductStore,
    auth: AuthStore,
    mailer: Option<Mailer<EmailJsClient>>,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// The catalog and session are read from `config.data_dir`, which is
    /// created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, the
    /// configured admin password hash is malformed, or the mail client fails
    /// to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let storage = FileStore::open(&config.data_dir)?;
        let cookies = FileCookieJar::open(config.data_dir.join(COOKIE_FILE));

        let verifier: Box<dyn CredentialVerifier> = match &config.auth {
            AuthConfig::Demo => {
                tracing::warn!("Demo mode: admin login uses the built-in demo account");
                Box::new(DemoCredentials)
            }
            AuthConfig::Admin(admin) => Box::new(AdminCredentials::from_config(admin)?),
        };

        let mailer = match &config.email {
            Some(email) => Some(Mailer::new(
                EmailJsClient::new(email)?,
                email.template_id.clone(),
                email.newsletter_template_id.clone(),
            )),
            None => {
                tracing::info!("EmailJS not configured, contact forms are disabled");
                None
            }
        };

        let products = ProductStore::hydrate(Box::new(storage));
        let auth = AuthStore::restore(Box::new(cookies), verifier);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            products = products.len(),
            authenticated = auth.is_authenticated(),
            "Storefront state ready"
        );

        Ok(Self::from_parts(products, auth, mailer))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub const fn from_parts(
        products: ProductStore,
        auth: AuthStore,
        mailer: Option<Mailer<EmailJsClient>>,
    ) -> Self {
        Self {
            products,
            auth,
            mailer,
        }
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub const fn products(&self) -> &ProductStore {
        &self.products
    }

    /// Get a mutable reference to the product catalog.
    pub const fn products_mut(&mut self) -> &mut ProductStore {
        &mut self.products
    }

    /// Get a reference to the admin session.
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Get a mutable reference to the admin session.
    pub const fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Get the mailer, if email delivery is configured.
    #[must_use]
    pub const fn mailer(&self) -> Option<&Mailer<EmailJsClient>> {
        self.mailer.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use greensickle_core::{Price, ProductUpdate};

    use super::*;
    use crate::error::AppError;

    fn config(dir: &Path, extra: &[(&str, &str)]) -> StorefrontConfig {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("GREENSICKLE_DEMO_MODE".to_string(), "true".to_string()),
            (
                "GREENSICKLE_DATA_DIR".to_string(),
                dir.to_string_lossy().into_owned(),
            ),
        ]);
        for (k, v) in extra {
            vars.insert((*k).to_string(), (*v).to_string());
        }
        StorefrontConfig::from_vars(&vars).unwrap()
    }

    #[test]
    fn test_new_state_is_seeded_and_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(&config(dir.path(), &[])).unwrap();

        assert_eq!(state.products().len(), 7);
        assert!(!state.auth().is_authenticated());
        assert!(state.mailer().is_none());
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[]);

        let mut state = AppState::new(&config).unwrap();
        assert!(state.auth_mut().login("admin@farmproducts.com", "admin123"));
        let id = state.products().products()[0].id.clone();
        let update = ProductUpdate {
            price: Some(Price::from_minor_units(400_000)),
            ..ProductUpdate::default()
        };
        assert!(state.products_mut().update_product(&id, update));
        drop(state);

        let state = AppState::new(&config).unwrap();
        assert!(state.auth().is_authenticated());
        assert_eq!(
            state.products().get(&id).unwrap().price,
            Price::from_minor_units(400_000)
        );
        assert!(dir.path().join(COOKIE_FILE).exists());
    }

    #[test]
    fn test_mailer_built_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            dir.path(),
            &[
                ("EMAILJS_SERVICE_ID", "service_farm"),
                ("EMAILJS_TEMPLATE_ID", "template_contact"),
                ("EMAILJS_PUBLIC_KEY", "pk_live"),
            ],
        );

        let state = AppState::new(&config).unwrap();
        let mailer = state.mailer().unwrap();
        assert_eq!(
            mailer.transport().endpoint().as_str(),
            "https://api.emailjs.com/api/v1.0/email/send"
        );
    }

    #[test]
    fn test_malformed_admin_hash_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            dir.path(),
            &[
                ("ADMIN_EMAIL", "owner@greensickle.ng"),
                ("ADMIN_PASSWORD_HASH", "plaintext"),
            ],
        );

        assert!(matches!(AppState::new(&config), Err(AppError::Auth(_))));
    }
}
