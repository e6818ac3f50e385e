use std::time::Duration;

use anyhow::Context as _;
use serde_json::json;

use crate::domain::repository::Notifier;
use crate::domain::types::User;
use crate::error::AccountsServiceError;

/// Outbound mail through a transactional-email HTTP API (Brevo-compatible
/// payload shape).
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
    /// Page where users enter their activation code, spelled out in the
    /// activation email.
    activation_url: String,
}

impl HttpMailer {
    pub fn new(
        api_url: String,
        api_key: String,
        sender: String,
        activation_url: String,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail HTTP client")?;
        Ok(Self { client, api_url, api_key, sender, activation_url })
    }

    async fn send(&self, body: serde_json::Value) -> Result<(), AccountsServiceError> {
        self.client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("send email request")?
            .error_for_status()
            .context("mail API rejected the message")?;
        Ok(())
    }
}

impl Notifier for HttpMailer {
    async fn send_activation(&self, user: &User, code: &str) -> Result<(), AccountsServiceError> {
        let body = json!({
            "sender": { "email": self.sender },
            "to": [{ "email": user.email, "name": user.display_name() }],
            "subject": "Activate your Readnest account",
            "htmlContent": format!(
                "<p>Hi {name},</p>\
                 <p>Your activation code is <strong>{code}</strong>. \
                 It expires in 15 minutes.</p>\
                 <p>Enter it at {url} to activate your account.</p>",
                name = user.first_name,
                url = self.activation_url,
            ),
        });
        self.send(body).await
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), AccountsServiceError> {
        let body = json!({
            "sender": { "email": self.sender },
            "to": [{ "email": user.email, "name": user.display_name() }],
            "subject": "Reset your Readnest password",
            "htmlContent": format!(
                "<p>Hi {name},</p>\
                 <p><a href=\"{reset_link}\">Reset your password</a>. \
                 The link expires in one hour.</p>\
                 <p>If you did not ask for this, ignore this email.</p>",
                name = user.first_name,
            ),
        });
        self.send(body).await
    }
}

/// Development fallback: log the would-be email instead of sending it.
#[derive(Clone)]
pub struct LogMailer;

impl Notifier for LogMailer {
    async fn send_activation(&self, user: &User, code: &str) -> Result<(), AccountsServiceError> {
        tracing::info!(email = %user.email, code, "activation email (log only)");
        Ok(())
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), AccountsServiceError> {
        tracing::info!(email = %user.email, reset_link, "password reset email (log only)");
        Ok(())
    }
}

/// Notifier picked at startup. Async trait methods rule out `dyn` dispatch,
/// so the selection is an enum.
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Notifier for Mailer {
    async fn send_activation(&self, user: &User, code: &str) -> Result<(), AccountsServiceError> {
        match self {
            Self::Http(mailer) => mailer.send_activation(user, code).await,
            Self::Log(mailer) => mailer.send_activation(user, code).await,
        }
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), AccountsServiceError> {
        match self {
            Self::Http(mailer) => mailer.send_password_reset(user, reset_link).await,
            Self::Log(mailer) => mailer.send_password_reset(user, reset_link).await,
        }
    }
}
