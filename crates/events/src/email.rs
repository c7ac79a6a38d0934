//! Workflow notification emails via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text emails for assignment, verdict and invitation events.
//! Configuration is loaded from environment variables; if `SMTP_HOST`
//! is not set, [`EmailConfig::from_env`] returns `None` and no mailer
//! should be constructed.

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@veritas.local";

/// Default review-panel base URL when `PANEL_DOMAIN` is not set.
const DEFAULT_PANEL_DOMAIN: &str = "https://panel.veritas.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Base URL of the review panel, used to build links in emails.
    pub panel_domain: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                         |
    /// |-----------------|----------|---------------------------------|
    /// | `SMTP_HOST`     | yes      | (none)                          |
    /// | `SMTP_PORT`     | no       | `587`                           |
    /// | `SMTP_FROM`     | no       | `noreply@veritas.local`         |
    /// | `SMTP_USER`     | no       | (none)                          |
    /// | `SMTP_PASSWORD` | no       | (none)                          |
    /// | `PANEL_DOMAIN`  | no       | `https://panel.veritas.local`   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            panel_domain: std::env::var("PANEL_DOMAIN")
                .unwrap_or_else(|_| DEFAULT_PANEL_DOMAIN.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends workflow notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    async fn send(&self, to_email: &str, subject: &str, body: String) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Notification email sent");
        Ok(())
    }

    /// Notify fact checkers that new items await their review.
    ///
    /// Delivery failures are logged per recipient; one broken mailbox
    /// does not block the rest of the batch.
    pub async fn send_assignment_notifications(&self, recipients: &[String]) {
        let subject = "New reports are waiting for your verdict";
        let body = format!(
            "New reports have been assigned to you for review.\n\n\
             Open your queue: {}/queue\n",
            self.config.panel_domain
        );
        for recipient in recipients {
            if let Err(error) = self.send(recipient, subject, body.clone()).await {
                tracing::error!(to = recipient.as_str(), %error, "Assignment email failed");
            }
        }
    }

    /// Tell the reporter their submission has been verified.
    pub async fn send_news_verified_notification(
        &self,
        reporter_email: &str,
        verdicted_by_expert: bool,
    ) -> Result<(), EmailError> {
        let subject = "Your report has been verified";
        let verified_by = if verdicted_by_expert {
            "one of our experts"
        } else {
            "our fact-checking community"
        };
        let body = format!(
            "The report you submitted has been reviewed and verified by {verified_by}.\n\n\
             Thank you for helping fight misinformation.\n"
        );
        self.send(reporter_email, subject, body).await
    }

    /// Send a signup invitation with the tokenized registration link.
    ///
    /// Unlike the other notifications this propagates the error: the
    /// caller rolls back the invitation row when delivery fails.
    pub async fn send_invitation(&self, to_email: &str, token: &str) -> Result<(), EmailError> {
        let subject = "You have been invited to join the verification team";
        let body = format!(
            "You have been invited to join the verification team.\n\n\
             Complete your registration: {}/register?token={token}\n",
            self.config.panel_domain
        );
        self.send(to_email, subject, body).await
    }

    /// Tell the crew member who made a manual assignment that the
    /// assignee dismissed it.
    pub async fn send_assignment_rejection(&self, assignor_email: &str, assignee_name: &str) {
        let subject = "An assignment you made was dismissed";
        let body = format!("{assignee_name} has dismissed the report you assigned to them.\n");
        if let Err(error) = self.send(assignor_email, subject, body).await {
            tracing::error!(to = assignor_email, %error, "Rejection email failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
