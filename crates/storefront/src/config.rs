//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Admin login (one of)
//! - `ADMIN_EMAIL` + `ADMIN_PASSWORD_HASH` - the single admin account
//!   (argon2 PHC hash); optional `ADMIN_NAME` (default: Administrator) and
//!   `ADMIN_ROLE` (`admin` | `manager`, default: admin)
//! - `GREENSICKLE_DEMO_MODE=true` - accept the built-in demo account instead
//!
//! ## Optional
//! - `GREENSICKLE_DATA_DIR` - Directory for the catalog and cookie files (default: .greensickle)
//! - `GREENSICKLE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `EMAILJS_SERVICE_ID` - Enables the contact/newsletter mailer; then requires
//!   `EMAILJS_TEMPLATE_ID` and `EMAILJS_PUBLIC_KEY`
//! - `EMAILJS_NEWSLETTER_TEMPLATE_ID` - Newsletter template (default: contact template)
//! - `EMAILJS_PRIVATE_KEY` - API access token (validated secret)
//! - `EMAILJS_API_URL` - API origin (default: <https://api.emailjs.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use greensickle_core::{Email, UserRole};

const DEFAULT_DATA_DIR: &str = ".greensickle";
const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com";
const DEFAULT_ADMIN_NAME: &str = "Administrator";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the persisted catalog and session cookies
    pub data_dir: PathBuf,
    /// How admin logins are verified
    pub auth: AuthConfig,
    /// Contact/newsletter delivery; `None` disables the mailer
    pub email: Option<EmailJsConfig>,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Which credential verifier guards the admin area.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Built-in demo account. Never use in production.
    Demo,
    /// One configured admin account.
    Admin(AdminAuthConfig),
}

/// The configured admin account.
#[derive(Clone)]
pub struct AdminAuthConfig {
    pub email: Email,
    /// Argon2 PHC hash of the admin password
    pub password_hash: SecretString,
    pub name: String,
    pub role: UserRole,
}

impl std::fmt::Debug for AdminAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthConfig")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// `EmailJS` transactional email configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct EmailJsConfig {
    /// API origin, e.g. <https://api.emailjs.com>
    pub api_url: Url,
    pub service_id: String,
    /// Template for contact form messages
    pub template_id: String,
    /// Template for newsletter signups; falls back to `template_id`
    pub newsletter_template_id: Option<String>,
    /// Public key (safe to expose in browser)
    pub public_key: String,
    /// Private access token (server-side only)
    pub private_key: Option<SecretString>,
}

impl std::fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("api_url", &self.api_url.as_str())
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("newsletter_template_id", &self.newsletter_template_id)
            .field("public_key", &self.public_key)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let data_dir = PathBuf::from(env.or_default("GREENSICKLE_DATA_DIR", DEFAULT_DATA_DIR));
        let log_format = match env.or_default("GREENSICKLE_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "GREENSICKLE_LOG_FORMAT".to_string(),
                    format!("expected pretty or json, got {other:?}"),
                ));
            }
        };

        Ok(Self {
            data_dir,
            auth: AuthConfig::from_env(&env)?,
            email: EmailJsConfig::from_env(&env)?,
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

impl AuthConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        if let Some(email) = env.optional("ADMIN_EMAIL") {
            let email = Email::parse(&email)
                .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_EMAIL".to_string(), e.to_string()))?;
            let role = env
                .or_default("ADMIN_ROLE", "admin")
                .parse::<UserRole>()
                .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_ROLE".to_string(), e))?;

            return Ok(Self::Admin(AdminAuthConfig {
                email,
                password_hash: SecretString::from(env.required("ADMIN_PASSWORD_HASH")?),
                name: env.or_default("ADMIN_NAME", DEFAULT_ADMIN_NAME),
                role,
            }));
        }

        match env.optional("GREENSICKLE_DEMO_MODE").as_deref() {
            Some("true" | "1") => Ok(Self::Demo),
            _ => Err(ConfigError::MissingEnvVar("ADMIN_EMAIL".to_string())),
        }
    }
}

impl EmailJsConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(
        env: &Env<F>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(service_id) = env.optional("EMAILJS_SERVICE_ID") else {
            return Ok(None);
        };

        let api_url = env
            .or_default("EMAILJS_API_URL", DEFAULT_EMAILJS_API_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("EMAILJS_API_URL".to_string(), e.to_string())
            })?;

        let private_key = if env.optional("EMAILJS_PRIVATE_KEY").is_some() {
            Some(env.validated_secret("EMAILJS_PRIVATE_KEY")?)
        } else {
            None
        };

        Ok(Some(Self {
            api_url,
            service_id,
            template_id: env.required("EMAILJS_TEMPLATE_ID")?,
            newsletter_template_id: env.optional("EMAILJS_NEWSLETTER_TEMPLATE_ID"),
            public_key: env.required("EMAILJS_PUBLIC_KEY")?,
            private_key,
        }))
    }

    /// Template used for newsletter signups.
    #[must_use]
    pub fn newsletter_template(&self) -> &str {
        self.newsletter_template_id
            .as_deref()
            .unwrap_or(&self.template_id)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A variable source. Empty values count as unset.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
