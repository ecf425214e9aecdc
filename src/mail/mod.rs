// src/mail/mod.rs

pub mod brevo;
pub mod templates;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

pub use brevo::BrevoClient;

/// A single transactional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Recipient,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email provider is not configured")]
    NotConfigured,
    #[error("email provider rate limit exceeded")]
    RateLimited,
    #[error("email provider rejected credentials (HTTP {0})")]
    Unauthorized(u16),
    #[error("email provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("email transport failed: {0}")]
    Transport(String),
}

/// Outbound transactional email collaborator.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Returns the provider's message id.
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError>;

    /// Lets callers fail before writing state when sending can never succeed.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Outcome of a best-effort notification sent after a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Notification {
    Sent {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Failed {
        code: String,
        message: String,
    },
}

impl Notification {
    pub fn is_sent(&self) -> bool {
        matches!(self, Notification::Sent { .. })
    }
}

/// Sends and folds the result into a [`Notification`], logging failures.
/// Used wherever the surrounding write has already been committed.
pub async fn notify(mailer: &dyn EmailSender, email: OutgoingEmail, context: &str) -> Notification {
    let to = email.to.email.clone();
    match mailer.send(email).await {
        Ok(message_id) => {
            tracing::info!("{} email sent to {} ({})", context, to, message_id);
            Notification::Sent { message_id }
        }
        Err(err) => {
            tracing::warn!("{} email to {} failed after commit: {}", context, to, err);
            let err = AppError::from(err);
            Notification::Failed {
                code: err.code().to_string(),
                message: err.public_message().to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_serializes_with_status_tag() {
        let sent = Notification::Sent {
            message_id: "<m-1@relay>".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&sent).unwrap(),
            json!({ "status": "sent", "messageId": "<m-1@relay>" })
        );

        let failed = Notification::Failed {
            code: "resource-exhausted".to_string(),
            message: "slow down".to_string(),
        };
        assert_eq!(serde_json::to_value(&failed).unwrap()["status"], "failed");
    }

    struct FailingProvider;

    #[async_trait]
    impl EmailSender for FailingProvider {
        async fn send(&self, _email: OutgoingEmail) -> Result<String, EmailError> {
            Err(EmailError::Provider {
                status: 500,
                message: "relay-7 exploded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn provider_failures_are_masked_in_notifications() {
        let email = OutgoingEmail {
            to: Recipient::new("a@x.com", None),
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };

        let notification = notify(&FailingProvider, email, "Test").await;

        assert_eq!(
            notification,
            Notification::Failed {
                code: "internal".to_string(),
                message: "Internal Server Error".to_string(),
            }
        );
    }

    #[test]
    fn blank_recipient_names_are_dropped() {
        assert_eq!(Recipient::new("a@x.com", Some("  ".to_string())).name, None);
    }
}
