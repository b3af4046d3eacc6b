//! Contact form and newsletter delivery.
//!
//! Messages are rendered server-side by `EmailJS` templates; this module only
//! fills in template parameters and posts them. [`Mailer`] never returns an
//! error: delivery failures are logged and reported as `false`, the same way
//! the forms show a generic "could not send" notice.

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use greensickle_core::Email;

use crate::config::EmailJsConfig;

/// Recipient name shown in every template.
pub const TEAM_NAME: &str = "GreenSickle Agro Team";

/// Path of the send endpoint, relative to the API origin.
const SEND_PATH: &str = "api/v1.0/email/send";

/// Request timeout for the `EmailJS` API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured API URL cannot be extended to the send endpoint.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The message failed validation and was not sent.
    #[error("invalid message: {0}")]
    Invalid(String),
}

/// Template variables for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateParams(BTreeMap<&'static str, String>);

impl TemplateParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Sends one templated message and reports the HTTP status of the attempt.
pub trait EmailTransport {
    /// Send `params` through the template `template_id`.
    async fn send(&self, template_id: &str, params: &TemplateParams) -> Result<u16, MailError>;
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Check the fields the contact form marks as required.
    ///
    /// # Errors
    ///
    /// Returns `MailError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), MailError> {
        for (field, value) in [
            ("name", &self.name),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(MailError::Invalid(format!("{field} is required")));
            }
        }

        if !is_valid_email(&self.email) {
            return Err(MailError::Invalid(format!(
                "invalid email address: {:?}",
                self.email
            )));
        }

        Ok(())
    }

    fn template_params(&self) -> TemplateParams {
        let phone = self
            .phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .unwrap_or("Not provided");

        TemplateParams::new()
            .with("from_name", &self.name)
            .with("from_email", &self.email)
            .with("phone", phone)
            .with("subject", &self.subject)
            .with("message", &self.message)
            .with("to_name", TEAM_NAME)
    }
}

/// A newsletter signup from the site footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
}

impl NewsletterSignup {
    fn template_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("from_email", &self.email)
            .with("to_name", TEAM_NAME)
            .with(
                "message",
                format!("New newsletter subscription from: {}", self.email),
            )
            .with("subject", "New Newsletter Subscription")
    }
}

/// Whether `s` looks like an email address the forms accept.
///
/// Accepts `local@domain.tld` shapes with no whitespace and a single `@`,
/// up to [`Email::MAX_LENGTH`] characters.
#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    Email::parse(s).is_ok()
}

/// Fills templates for the storefront's two forms and sends them.
#[derive(Debug, Clone)]
pub struct Mailer<T> {
    transport: T,
    contact_template: String,
    newsletter_template: Option<String>,
}

impl<T: EmailTransport> Mailer<T> {
    /// Create a mailer. Newsletter signups use `contact_template` when no
    /// newsletter template is given.
    pub fn new(
        transport: T,
        contact_template: impl Into<String>,
        newsletter_template: Option<String>,
    ) -> Self {
        Self {
            transport,
            contact_template: contact_template.into(),
            newsletter_template,
        }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a contact form message to the team.
    ///
    /// Returns true only if the provider answered with status 200.
    pub async fn send_contact_email(&self, message: &ContactMessage) -> bool {
        if let Err(e) = message.validate() {
            tracing::warn!(error = %e, "Contact message rejected");
            return false;
        }

        self.deliver("contact", &self.contact_template, &message.template_params())
            .await
    }

    /// Notify the team of a newsletter signup.
    ///
    /// Returns true only if the provider answered with status 200.
    pub async fn send_newsletter_email(&self, signup: &NewsletterSignup) -> bool {
        if !is_valid_email(&signup.email) {
            tracing::warn!(email = %signup.email, "Newsletter signup rejected");
            return false;
        }

        let template = self
            .newsletter_template
            .as_deref()
            .unwrap_or(&self.contact_template);
        self.deliver("newsletter", template, &signup.template_params())
            .await
    }

    async fn deliver(&self, kind: &str, template_id: &str, params: &TemplateParams) -> bool {
        match self.transport.send(template_id, params).await {
            Ok(200) => {
                tracing::info!(kind = %kind, template_id = %template_id, "Email sent");
                true
            }
            Ok(status) => {
                tracing::warn!(kind = %kind, status, "Email provider rejected message");
                false
            }
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Failed to send email");
                false
            }
        }
    }
}

// =============================================================================
// EmailJS client
// =============================================================================

/// `EmailJS` REST API client.
#[derive(Clone)]
pub struct EmailJsClient {
    client: reqwest::Client,
    endpoint: Url,
    service_id: String,
    public_key: String,
    private_key: Option<SecretString>,
}

impl std::fmt::Debug for EmailJsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("service_id", &self.service_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a TemplateParams,
}

impl EmailJsClient {
    /// Create a new `EmailJS` client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &EmailJsConfig) -> Result<Self, MailError> {
        let endpoint = config.api_url.join(SEND_PATH)?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            service_id: config.service_id.clone(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
        })
    }

    /// The send endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl EmailTransport for EmailJsClient {
    async fn send(&self, template_id: &str, params: &TemplateParams) -> Result<u16, MailError> {
        let body = SendRequest {
            service_id: &self.service_id,
            template_id,
            user_id: &self.public_key,
            access_token: self.private_key.as_ref().map(|key| key.expose_secret()),
            template_params: params,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status().as_u16();

        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status, message = %message, "EmailJS error response");
        }

        Ok(status)
    }
}
