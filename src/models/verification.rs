// src/models/verification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-flight signup awaiting its one-time code, keyed by email in the
/// 'pending_verifications' collection.
///
/// Only digests are stored: `otp_hash` of the code and `password_hash` of the
/// chosen password. The latter exists solely to detect a mismatched password
/// at confirmation time; the real credential is created by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    pub email: String,
    pub otp_hash: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub attempts: i64,
}

impl PendingVerification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
