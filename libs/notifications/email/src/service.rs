//! High-level email service used by API handlers.
//!
//! Wraps an [`EmailProvider`] with template rendering so callers work in
//! terms of "send this" rather than transport details.

use crate::models::Email;
use crate::provider::{EmailProvider, SendResult};
use crate::templates::TemplateEngine;
use eyre::{Result, WrapErr};
use std::sync::Arc;

/// Email service for transactional mail.
pub struct EmailService {
    provider: Arc<dyn EmailProvider>,
    templates: TemplateEngine,
    activation_base_url: String,
}

impl EmailService {
    /// Create a new email service.
    ///
    /// `activation_base_url` is the frontend origin used to build activation
    /// links, e.g. `https://app.example.com`.
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        activation_base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            templates: TemplateEngine::new()?,
            activation_base_url: activation_base_url.into(),
        })
    }

    /// Send a generic email to one or more recipients.
    pub async fn send_email(
        &self,
        recipients: Vec<String>,
        subject: &str,
        text: Option<String>,
        html: Option<String>,
    ) -> Result<SendResult> {
        if recipients.is_empty() {
            return Err(eyre::eyre!("Email must have at least one recipient"));
        }
        if text.is_none() && html.is_none() {
            return Err(eyre::eyre!("Email must have either text or HTML body"));
        }

        let mut email = Email::to_many(recipients, subject);
        if let Some(text) = text {
            email = email.with_text(text);
        }
        if let Some(html) = html {
            email = email.with_html(html);
        }

        self.provider
            .send(&email)
            .await
            .wrap_err_with(|| format!("Provider {} failed to send email", self.provider.name()))
    }

    /// Send an account activation email.
    ///
    /// Renders the `activation` template with a link of the form
    /// `{activation_base_url}/activate?token={token}`.
    pub async fn send_activation_email(&self, to: &str, token: &str) -> Result<SendResult> {
        let activation_url = format!(
            "{}/activate?token={}",
            self.activation_base_url.trim_end_matches('/'),
            token
        );

        let rendered = self.templates.render(
            "activation",
            &serde_json::json!({ "activation_url": activation_url }),
        )?;

        let mut email = Email::new(to, rendered.subject);
        if let Some(text) = rendered.body_text {
            email = email.with_text(text);
        }
        if let Some(html) = rendered.body_html {
            email = email.with_html(html);
        }

        let result = self
            .provider
            .send(&email)
            .await
            .wrap_err("Failed to send activation email")?;

        tracing::info!(to = %to, "Activation email sent");
        Ok(result)
    }

    /// Check the underlying provider's health.
    pub async fn health_check(&self) -> Result<()> {
        self.provider.health_check().await
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockSmtpProvider;

    #[tokio::test]
    async fn test_send_email_delivers_to_all_recipients() {
        let mock = Arc::new(MockSmtpProvider::new());
        let service = EmailService::new(mock.clone(), "http://localhost:3000").unwrap();

        let result = service
            .send_email(
                vec!["a@example.com".to_string(), "b@example.com".to_string()],
                "Quarterly schedule",
                Some("See attached schedule".to_string()),
                None,
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(mock.sent_count().await, 1);
        assert!(mock.was_sent_to("a@example.com").await);
        assert!(mock.was_sent_to("b@example.com").await);
    }

    #[tokio::test]
    async fn test_send_email_requires_recipients_and_body() {
        let mock = Arc::new(MockSmtpProvider::new());
        let service = EmailService::new(mock.clone(), "http://localhost:3000").unwrap();

        let no_recipients = service
            .send_email(Vec::new(), "Subject", Some("Body".to_string()), None)
            .await;
        assert!(no_recipients.is_err());

        let no_body = service
            .send_email(vec!["a@example.com".to_string()], "Subject", None, None)
            .await;
        assert!(no_body.is_err());

        assert_eq!(mock.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_activation_email_contains_link() {
        let mock = Arc::new(MockSmtpProvider::new());
        let service = EmailService::new(mock.clone(), "https://app.example.com/").unwrap();

        service
            .send_activation_email("new.hire@example.com", "tok-123")
            .await
            .unwrap();

        let sent = mock.sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["new.hire@example.com"]);
        assert_eq!(sent[0].subject, "Activate Your Account");

        let html = sent[0].body_html.as_deref().unwrap();
        assert!(html.contains("https://app.example.com/activate?token=tok-123"));
        let text = sent[0].body_text.as_deref().unwrap();
        assert!(text.contains("https://app.example.com/activate?token=tok-123"));
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces() {
        let mock = Arc::new(MockSmtpProvider::failing("connrefused"));
        let service = EmailService::new(mock, "http://localhost:3000").unwrap();

        let result = service
            .send_email(
                vec!["a@example.com".to_string()],
                "Subject",
                Some("Body".to_string()),
                None,
            )
            .await;

        assert!(result.is_err());
    }
}
