//! Email configuration loaded from environment variables.

/// Default provider endpoint used when only `EMAIL_API_KEY` is set.
pub const DEFAULT_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_SENDER_ADDRESS: &str = "noreply@taskflow.local";
const DEFAULT_SENDER_NAME: &str = "TaskFlow";

/// The "From" identity on every outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSender {
    pub address: String,
    pub name: String,
}

impl Default for EmailSender {
    fn default() -> Self {
        Self {
            address: DEFAULT_SENDER_ADDRESS.to_string(),
            name: DEFAULT_SENDER_NAME.to_string(),
        }
    }
}

/// Which transport the [`Mailer`](crate::Mailer) uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Transactional email provider reached over HTTPS.
    ProviderApi { api_url: String, api_key: String },
    /// Plain SMTP relay with optional credentials.
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
    /// Nothing configured; messages are logged instead of sent.
    Disabled,
}

/// Complete email configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub transport: TransportConfig,
    pub sender: EmailSender,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// The provider API wins when `EMAIL_API_KEY` is set; otherwise SMTP is
    /// used when `SMTP_HOST` is set; otherwise email is disabled.
    ///
    /// | Variable               | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `EMAIL_API_KEY`        | (none)                                   |
    /// | `EMAIL_API_URL`        | `https://api.brevo.com/v3/smtp/email`    |
    /// | `SMTP_HOST`            | (none)                                   |
    /// | `SMTP_PORT`            | `587`                                    |
    /// | `SMTP_USER`            | (none)                                   |
    /// | `SMTP_PASSWORD`        | (none)                                   |
    /// | `EMAIL_SENDER_ADDRESS` | `noreply@taskflow.local`                 |
    /// | `EMAIL_SENDER_NAME`    | `TaskFlow`                               |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = if let Some(api_key) = get("EMAIL_API_KEY") {
            TransportConfig::ProviderApi {
                api_url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                api_key,
            }
        } else if let Some(host) = get("SMTP_HOST") {
            TransportConfig::Smtp {
                host,
                port: get("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: get("SMTP_USER"),
                password: get("SMTP_PASSWORD"),
            }
        } else {
            TransportConfig::Disabled
        };

        let defaults = EmailSender::default();
        Self {
            transport,
            sender: EmailSender {
                address: get("EMAIL_SENDER_ADDRESS").unwrap_or(defaults.address),
                name: get("EMAIL_SENDER_NAME").unwrap_or(defaults.name),
            },
        }
    }

    /// A configuration that only simulates delivery.
    pub fn disabled() -> Self {
        Self {
            transport: TransportConfig::Disabled,
            sender: EmailSender::default(),
        }
    }
}
