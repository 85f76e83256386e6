//! SMTP delivery via lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

use super::message::{password_reset_email, verification_email, OutgoingEmail};
use super::EmailSender;
use crate::config::SmtpConfig;
use crate::{AuthError, Result};

/// SMTP timeout for a single delivery attempt.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Mailer delivering over an SMTP relay (STARTTLS).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    base_url: String,
    enabled: bool,
}

impl SmtpMailer {
    /// Build a mailer from configuration.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from: Mailbox = format!("Vendorly <{}>", config.from_address)
            .parse()
            .map_err(|e| AuthError::Config(format!("invalid from address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AuthError::Mail(format!("failed to create SMTP transport: {e}")))?
            .port(config.port)
            .timeout(Some(SEND_TIMEOUT));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            base_url: config.frontend_base_url.clone(),
            enabled: config.enabled,
        })
    }

    async fn deliver(&self, to: &str, mail: &OutgoingEmail) -> bool {
        if !self.enabled {
            debug!("Email delivery disabled; dropping mail to {}", to);
            return false;
        }

        let to_mailbox: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!("Invalid recipient address {}: {}", to, e);
                return false;
            }
        };

        let message = match Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(&mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
        {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to build email to {}: {}", to, e);
                return false;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                info!("Email sent successfully to {}", to);
                true
            }
            Err(e) => {
                error!("Failed to send email to {}: {}", to, e);
                false
            }
        }
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send_verification(&self, to: &str, token: &str, display_name: &str) -> bool {
        let mail = verification_email(&self.base_url, token, display_name);
        self.deliver(to, &mail).await
    }

    async fn send_password_reset(&self, to: &str, token: &str, display_name: &str) -> bool {
        let mail = password_reset_email(&self.base_url, token, display_name);
        self.deliver(to, &mail).await
    }
}
