//! Delivery over SMTP via `lettre`.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailSender;
use crate::mailer::{EmailError, OutgoingEmail};

/// Sends multipart (plain text + HTML) email through an SMTP relay.
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpDelivery {
    /// Build a STARTTLS relay transport.
    pub fn new(
        host: &str,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
        if let (Some(user), Some(password)) = (user, password) {
            builder = builder.credentials(Credentials::new(user, password));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }

    pub async fn deliver(
        &self,
        sender: &EmailSender,
        email: &OutgoingEmail,
    ) -> Result<(), EmailError> {
        let message = build_message(sender, email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn build_message(sender: &EmailSender, email: &OutgoingEmail) -> Result<Message, EmailError> {
    let from = Mailbox::new(Some(sender.name.clone()), sender.address.parse()?);
    let to = Mailbox::new(email.to_name.clone(), email.to.parse()?);

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| EmailError::Build(e.to_string()))
}
