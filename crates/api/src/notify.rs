//! Best-effort email dispatch after a successful write.
//!
//! Failures are logged at `warn` and summarized in a [`NotificationOutcome`]
//! that handlers return next to their primary payload. Nothing here can
//! fail the request that triggered it, and nothing is retried.

use chrono::Datelike;
use serde::Serialize;
use taskflow_events::{DeliveryReport, Mailer, OutgoingEmail};

/// Summary of an email fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub attempted: usize,
    pub sent: usize,
    pub simulated: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl NotificationOutcome {
    /// Nothing was attempted; `warning` says why.
    pub fn not_sent(warning: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            ..Default::default()
        }
    }

    fn finish(mut self) -> Self {
        self.warning = if self.failed > 0 {
            Some(format!(
                "Email could not be sent to {} of {} recipient(s). The change was saved.",
                self.failed, self.attempted
            ))
        } else if self.simulated > 0 {
            Some("Email delivery is not configured; messages were logged only.".to_string())
        } else {
            None
        };
        self
    }
}

/// Send every message in `emails`, one at a time.
pub async fn dispatch(mailer: &Mailer, emails: &[OutgoingEmail]) -> NotificationOutcome {
    let mut outcome = NotificationOutcome {
        attempted: emails.len(),
        ..Default::default()
    };

    for email in emails {
        match mailer.send(email).await {
            Ok(DeliveryReport::Sent { .. }) => outcome.sent += 1,
            Ok(DeliveryReport::Simulated) => outcome.simulated += 1,
            Err(e) => {
                tracing::warn!(to = %email.to, subject = %email.subject, error = %e, "Email delivery failed");
                outcome.failed += 1;
            }
        }
    }

    outcome.finish()
}

/// Year stamped into email footers.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

#[cfg(test)]
mod tests {
    use taskflow_core::email_body::render_task_assigned;

    use super::*;

    #[tokio::test]
    async fn simulated_sends_are_reported() {
        let email = OutgoingEmail::new(
            "a@example.com",
            None,
            render_task_assigned("TaskFlow", "Fix", None, "http://x", 2026),
        );
        let outcome = dispatch(&Mailer::simulated(), &[email.clone(), email]).await;
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.simulated, 2);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.warning.unwrap().contains("not configured"));
    }

    #[test]
    fn not_sent_carries_only_the_warning() {
        let outcome = NotificationOutcome::not_sent("lookup failed");
        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.warning.as_deref(), Some("lookup failed"));
    }

    #[tokio::test]
    async fn nothing_to_send_has_no_warning() {
        let outcome = dispatch(&Mailer::simulated(), &[]).await;
        assert_eq!(outcome, NotificationOutcome::default());
    }
}
