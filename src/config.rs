// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

pub const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Outbound email settings consumed by the transactional mail client.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service falls back to the in-memory document store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    /// Emails granted the admin role at sign-in.
    pub admin_emails: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub email: EmailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = optional("DATABASE_URL");

        let jwt_secret = optional("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = number("JWT_EXPIRATION", 86_400)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let cors_origins = optional("CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        let admin_emails = optional("ADMIN_EMAILS")
            .map(|raw| {
                split_list(&raw)
                    .into_iter()
                    .map(|email| email.to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        let email = EmailConfig {
            api_key: optional("BREVO_API_KEY"),
            api_url: env::var("BREVO_API_URL")
                .unwrap_or_else(|_| DEFAULT_BREVO_API_URL.to_string()),
            sender_email: env::var("SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@hrms.local".to_string()),
            sender_name: env::var("SENDER_NAME").unwrap_or_else(|_| "HRMS Recruitment".to_string()),
            timeout: Duration::from_secs(number("EMAIL_TIMEOUT_SECS", 10)?),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            cors_origins,
            admin_emails,
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
            email,
        })
    }

    /// True when the address is on the configured admin allow-list.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
