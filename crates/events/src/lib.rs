//! Outbound email for TaskFlow.
//!
//! - [`EmailConfig`] -- transport selection and sender identity, loaded
//!   from the environment.
//! - [`Mailer`] -- sends an [`OutgoingEmail`] through the provider HTTP
//!   API, SMTP, or (when nothing is configured) a console simulation.
//! - [`delivery`] -- the individual transports.
//!
//! Message bodies are rendered by `taskflow_core::email_body`; this crate
//! only moves bytes.

pub mod config;
pub mod delivery;
pub mod mailer;

pub use config::{EmailConfig, EmailSender, TransportConfig};
pub use mailer::{DeliveryReport, EmailError, Mailer, OutgoingEmail};
