//! Delivery through a transactional email provider's HTTP API.
//!
//! Messages are POSTed as JSON with the key in an `api-key` header. A
//! non-2xx answer becomes [`EmailError::Provider`] carrying the status and
//! (truncated) response body, so the caller can log what the provider said.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::EmailSender;
use crate::mailer::{EmailError, OutgoingEmail};

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest provider error body kept in [`EmailError::Provider`].
const MAX_ERROR_BODY: usize = 500;

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
}

/// Sends email through the provider API.
pub struct ProviderApiDelivery {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ProviderApiDelivery {
    /// Build a delivery service with a pre-configured HTTP client.
    pub fn new(api_url: String, api_key: String) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Send one message. Returns the provider's message id when it reports one.
    pub async fn deliver(
        &self,
        sender: &EmailSender,
        email: &OutgoingEmail,
    ) -> Result<Option<String>, EmailError> {
        let body = SendRequest {
            sender: Contact {
                email: &sender.address,
                name: Some(&sender.name),
            },
            to: [Contact {
                email: &email.to,
                name: email.to_name.as_deref(),
            }],
            subject: &email.subject,
            html_content: &email.html,
            text_content: &email.text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut text = response.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(EmailError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let message_id = response
            .json::<SendResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id);
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_provider_field_names() {
        let body = SendRequest {
            sender: Contact {
                email: "noreply@example.com",
                name: Some("TaskFlow"),
            },
            to: [Contact {
                email: "jane@x.com",
                name: None,
            }],
            subject: "Hi",
            html_content: "<p>Hi</p>",
            text_content: "Hi",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sender"]["name"], "TaskFlow");
        assert_eq!(json["to"][0]["email"], "jane@x.com");
        assert!(json["to"][0].get("name").is_none());
        assert_eq!(json["htmlContent"], "<p>Hi</p>");
        assert_eq!(json["textContent"], "Hi");
    }

    #[test]
    fn new_does_not_panic() {
        let _delivery =
            ProviderApiDelivery::new("http://localhost/send".to_string(), "k".to_string()).unwrap();
    }
}
