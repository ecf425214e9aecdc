// src/mail/brevo.rs

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};

use super::{EmailError, EmailSender, OutgoingEmail};
use crate::config::EmailConfig;

#[derive(Debug, Serialize)]
struct Party<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Party<'a>,
    to: Vec<Party<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Client for the Brevo transactional email API.
pub struct BrevoClient {
    http: reqwest::Client,
    config: EmailConfig,
}

impl BrevoClient {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl EmailSender for BrevoClient {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            tracing::error!("BREVO_API_KEY missing, cannot send '{}'", email.subject);
            EmailError::NotConfigured
        })?;

        let payload = SendRequest {
            sender: Party {
                email: &self.config.sender_email,
                name: Some(&self.config.sender_name),
            },
            to: vec![Party {
                email: &email.to.email,
                name: email.to.name.as_deref(),
            }],
            subject: &email.subject,
            html_content: &email.html,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .header("api-key", api_key)
            .header(header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: SendResponse = response
                .json()
                .await
                .map_err(|e| {
                    EmailError::Transport(format!("unreadable provider response: {}", e))
                })?;
            return Ok(body.message_id);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        tracing::error!("Brevo API error: status {} ({})", status, message);

        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => EmailError::RateLimited,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                EmailError::Unauthorized(status.as_u16())
            }
            _ => EmailError::Provider {
                status: status.as_u16(),
                message,
            },
        })
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}
