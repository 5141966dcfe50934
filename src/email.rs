use std::time::Duration;

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::SmtpConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A rendered email, ready to address
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub subject: String,
    pub html: String,
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_alert_email(property_label: &str, event_type: &str) -> Email {
    let label = escape_html(property_label);
    let event = escape_html(event_type);

    Email {
        subject: format!("AlerteCompteur alert: {} on '{}'", event_type, property_label),
        html: format!(
            r#"<html>
  <body style="font-family: sans-serif;">
    <h2>AlerteCompteur alert</h2>
    <p>An alert was detected for the property: <strong>{label}</strong></p>
    <p>Event type: <strong>{event}</strong></p>
  </body>
</html>"#
        ),
    }
}

pub fn render_consent_invitation(owner_email: &str, property_label: &str) -> Email {
    let owner = escape_html(owner_email);
    let label = escape_html(property_label);

    Email {
        subject: format!("Invitation to view the data of '{}'", property_label),
        html: format!(
            r##"<html>
  <body style="font-family: sans-serif;">
    <h2>Invitation from {owner}</h2>
    <p>{owner} has invited you to view the data of the property: <strong>{label}</strong>.</p>
    <a href="#" style="background-color: #2dd4bf; color: #111827; padding: 10px 20px; text-decoration: none; border-radius: 5px;">Accept the invitation</a>
  </body>
</html>"##
        ),
    }
}

/// Outbound notifications over an authenticated STARTTLS relay.
///
/// Sends are attempted once. Failures are logged and reported as `false`.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, recipient: &str, email: Email) -> Result<Message, EmailError> {
        let from: Mailbox = self.config.from.parse()?;
        let to: Mailbox = recipient.parse()?;

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)?)
    }

    async fn deliver(&self, recipient: &str, email: Email) -> Result<(), EmailError> {
        let message = self.build_message(recipient, email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport.send(message).await?;
        Ok(())
    }

    async fn send(&self, recipient: &str, email: Email) -> bool {
        let subject = email.subject.clone();
        match self.deliver(recipient, email).await {
            Ok(()) => {
                tracing::info!("Sent '{}' to {}", subject, recipient);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send '{}' to {}: {}", subject, recipient, e);
                false
            }
        }
    }

    pub async fn send_alert_email(&self, recipient: &str, property_label: &str, event_type: &str) -> bool {
        self.send(recipient, render_alert_email(property_label, event_type))
            .await
    }

    pub async fn send_consent_invitation_email(
        &self,
        recipient: &str,
        owner_email: &str,
        property_label: &str,
    ) -> bool {
        self.send(recipient, render_consent_invitation(owner_email, property_label))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_relay() -> SmtpConfig {
        SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "user".to_string(),
            password: "pass".to_string(),
            from: "alerts@example.com".to_string(),
        }
    }

    #[test]
    fn alert_template_names_property_and_event() {
        let email = render_alert_email("Flat A", "SQUAT");
        assert!(email.subject.contains("SQUAT"));
        assert!(email.html.contains("<strong>Flat A</strong>"));
        assert!(email.html.contains("<strong>SQUAT</strong>"));
    }

    #[test]
    fn template_values_are_escaped() {
        let email = render_consent_invitation("owner@example.com", "<script>alert(1)</script>");
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("Invitation from owner@example.com"));
    }

    #[test]
    fn message_builds_for_valid_addresses() {
        let mailer = Mailer::new(unreachable_relay());
        assert!(mailer
            .build_message("tenant@example.com", render_alert_email("Flat A", "SQUAT"))
            .is_ok());
    }

    #[tokio::test]
    async fn invalid_recipient_reports_failure() {
        let mailer = Mailer::new(unreachable_relay());
        assert!(!mailer.send_alert_email("not an address", "Flat A", "SQUAT").await);
    }

    #[tokio::test]
    async fn unreachable_relay_reports_failure() {
        let mailer = Mailer::new(unreachable_relay());
        assert!(
            !mailer
                .send_consent_invitation_email("tenant@example.com", "owner@example.com", "Flat A")
                .await
        );
    }
}
