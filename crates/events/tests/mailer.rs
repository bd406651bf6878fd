//! Mailer integration tests against an in-process HTTP stub of the
//! provider API.

use assert_matches::assert_matches;
use taskflow_core::email_body::render_edit_access_approved;
use taskflow_events::{
    DeliveryReport, EmailConfig, EmailError, EmailSender, Mailer, OutgoingEmail, TransportConfig,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, capture the raw request, answer with `status`
/// and `body`.
async fn stub_provider(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v3/smtp/email", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..split]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= split + 4 + length
}

fn provider_config(url: String) -> EmailConfig {
    EmailConfig {
        transport: TransportConfig::ProviderApi {
            api_url: url,
            api_key: "test-key".to_string(),
        },
        sender: EmailSender {
            address: "noreply@example.com".to_string(),
            name: "TaskFlow".to_string(),
        },
    }
}

fn approval_email() -> OutgoingEmail {
    let rendered = render_edit_access_approved(
        "TaskFlow",
        "Roadmap",
        "Jane",
        "http://localhost:5173/notes/1/edit?token=abc",
        2026,
    );
    OutgoingEmail::new("jane@x.com", Some("Jane".to_string()), rendered)
}

#[tokio::test]
async fn provider_success_reports_message_id() {
    let (url, server) = stub_provider("201 Created", r#"{"messageId":"<m-1@relay>"}"#).await;
    let mailer = Mailer::new(provider_config(url)).unwrap();

    let report = mailer.send(&approval_email()).await.unwrap();
    assert_eq!(
        report,
        DeliveryReport::Sent {
            message_id: Some("<m-1@relay>".to_string())
        }
    );

    let request = server.await.unwrap();
    assert!(request.to_ascii_lowercase().contains("api-key: test-key"));
    assert!(request.contains("\"htmlContent\""));
    assert!(request.contains("jane@x.com"));
}

#[tokio::test]
async fn provider_error_carries_status_and_body() {
    let (url, server) = stub_provider("401 Unauthorized", r#"{"message":"Key not found"}"#).await;
    let mailer = Mailer::new(provider_config(url)).unwrap();

    let err = mailer.send(&approval_email()).await.unwrap_err();
    assert_matches!(err, EmailError::Provider { status: 401, ref body } if body.contains("Key not found"));
    server.await.unwrap();
}

#[tokio::test]
async fn simulated_mailer_never_fails() {
    let mailer = Mailer::simulated();
    let report = mailer.send(&approval_email()).await.unwrap();
    assert_eq!(report, DeliveryReport::Simulated);
}
