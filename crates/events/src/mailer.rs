//! Transport-agnostic mail dispatch.

use crate::config::{EmailConfig, EmailSender, TransportConfig};
use crate::delivery::{ProviderApiDelivery, SmtpDelivery};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The HTTP request to the provider failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Email provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    /// Address a rendered email to `to`.
    pub fn new(
        to: impl Into<String>,
        to_name: Option<String>,
        rendered: taskflow_core::email_body::RenderedEmail,
    ) -> Self {
        Self {
            to: to.into(),
            to_name,
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        }
    }
}

/// What happened to a message that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Handed to a real transport.
    Sent { message_id: Option<String> },
    /// No transport is configured; the message was only logged.
    Simulated,
}

impl DeliveryReport {
    pub fn was_delivered(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

enum Transport {
    ProviderApi(ProviderApiDelivery),
    Smtp(SmtpDelivery),
    Simulated,
}

/// Sends [`OutgoingEmail`]s through the configured transport.
pub struct Mailer {
    transport: Transport,
    sender: EmailSender,
}

impl Mailer {
    /// Build a mailer for `config`.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let transport = match config.transport {
            TransportConfig::ProviderApi { api_url, api_key } => {
                Transport::ProviderApi(ProviderApiDelivery::new(api_url, api_key)?)
            }
            TransportConfig::Smtp {
                host,
                port,
                user,
                password,
            } => Transport::Smtp(SmtpDelivery::new(&host, port, user, password)?),
            TransportConfig::Disabled => Transport::Simulated,
        };
        Ok(Self {
            transport,
            sender: config.sender,
        })
    }

    /// A mailer that logs every message instead of sending it.
    pub fn simulated() -> Self {
        Self {
            transport: Transport::Simulated,
            sender: EmailSender::default(),
        }
    }

    /// Name of the active transport, for startup logging.
    pub fn transport_name(&self) -> &'static str {
        match self.transport {
            Transport::ProviderApi(_) => "provider_api",
            Transport::Smtp(_) => "smtp",
            Transport::Simulated => "simulated",
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.transport, Transport::Simulated)
    }

    /// Send one message.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReport, EmailError> {
        let report = match &self.transport {
            Transport::ProviderApi(api) => DeliveryReport::Sent {
                message_id: api.deliver(&self.sender, email).await?,
            },
            Transport::Smtp(smtp) => {
                smtp.deliver(&self.sender, email).await?;
                DeliveryReport::Sent { message_id: None }
            }
            Transport::Simulated => {
                tracing::info!(
                    to = %email.to,
                    subject = %email.subject,
                    body = %email.text,
                    "Email transport not configured, simulated send"
                );
                return Ok(DeliveryReport::Simulated);
            }
        };

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            transport = self.transport_name(),
            "Email sent"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_simulates() {
        let mailer = Mailer::new(EmailConfig::disabled()).unwrap();
        assert!(mailer.is_simulated());
        assert_eq!(mailer.transport_name(), "simulated");
    }

    #[test]
    fn email_error_display_provider() {
        let err = EmailError::Provider {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Email provider returned HTTP 401: unauthorized"
        );
    }

    #[test]
    fn report_delivery_flag() {
        assert!(DeliveryReport::Sent { message_id: None }.was_delivered());
        assert!(!DeliveryReport::Simulated.was_delivered());
    }
}
