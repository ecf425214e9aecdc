// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Represents a document in the 'users' collection, keyed by uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,

    pub email: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub email_verified: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(uid: &str, email: &str, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: String::new(),
            role,
            email_verified: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Credential record of the local identity provider ('accounts' collection,
/// keyed by lower-cased email). Never returned by any handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// DTO for requesting a verification code (signup step 1).
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for confirming a verification code (signup step 2).
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
