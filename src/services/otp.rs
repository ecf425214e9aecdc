// src/services/otp.rs

//! Email ownership check in front of account creation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use validator::Validate;

use crate::{
    error::AppError,
    mail::{EmailSender, Recipient, templates},
    models::{
        user::{Role, SignupRequest, UserProfile, VerifyOtpRequest},
        verification::PendingVerification,
    },
    services::identity::IdentityProvider,
    store::{DocumentStore, collections, fetch, to_document},
    utils::digest::sha256_hex,
};

/// Lifetime of an issued code.
pub const OTP_TTL_SECS: i64 = 600;

pub const MAX_OTP_ATTEMPTS: i64 = 3;

#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn EmailSender>,
    identity: Arc<dyn IdentityProvider>,
    company: String,
}

impl OtpService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        identity: Arc<dyn IdentityProvider>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            identity,
            company: company.into(),
        }
    }

    /// Stores a fresh code for the email (overwriting any earlier one) and
    /// mails it. Returns the validity window in seconds.
    pub async fn issue_code(&self, req: SignupRequest) -> Result<i64, AppError> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(AppError::InvalidArgument(
                "Email and password are required".to_string(),
            ));
        }
        req.validate()?;

        if !self.mailer.is_configured() {
            return Err(AppError::Internal(
                "Email service configuration error".to_string(),
            ));
        }

        let email = req.email.trim().to_lowercase();
        let code = rand::thread_rng().gen_range(100_000..=999_999u32).to_string();
        let now = Utc::now();

        let record = PendingVerification {
            email: email.clone(),
            otp_hash: sha256_hex(&code),
            password_hash: sha256_hex(&req.password),
            created_at: now,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            attempts: 0,
        };
        self.store
            .set(collections::PENDING_VERIFICATIONS, &email, to_document(&record)?)
            .await?;
        tracing::info!("Verification code stored for {}", email);

        let message =
            templates::verification_code(Recipient::new(&email, None), &code, &self.company);
        match self.mailer.send(message).await {
            Ok(message_id) => {
                tracing::info!("Verification email sent to {} ({})", email, message_id);
                Ok(OTP_TTL_SECS)
            }
            Err(err) => {
                tracing::error!("Verification email to {} failed: {}", email, err);
                Err(err.into())
            }
        }
    }

    /// Checks the code and, on success, creates the verified account and its
    /// profile. Returns the new uid.
    pub async fn verify_code(&self, req: VerifyOtpRequest) -> Result<String, AppError> {
        if req.email.trim().is_empty() || req.otp.trim().is_empty() || req.password.is_empty() {
            return Err(AppError::InvalidArgument(
                "Email, verification code and password are required".to_string(),
            ));
        }

        let email = req.email.trim().to_lowercase();
        let now = Utc::now();

        let record: PendingVerification =
            fetch(self.store.as_ref(), collections::PENDING_VERIFICATIONS, &email)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(
                        "No verification request found. Please sign up again.".to_string(),
                    )
                })?;

        if record.is_expired(now) {
            self.discard(&email).await?;
            tracing::info!("Verification code for {} expired", email);
            return Err(AppError::DeadlineExceeded(
                "Verification code has expired. Please request a new one.".to_string(),
            ));
        }

        if record.attempts >= MAX_OTP_ATTEMPTS {
            self.discard(&email).await?;
            return Err(too_many_attempts());
        }

        if sha256_hex(req.otp.trim()) != record.otp_hash {
            let attempts = self
                .store
                .increment(collections::PENDING_VERIFICATIONS, &email, "attempts", 1)
                .await?;
            tracing::info!("Wrong verification code for {} (attempt {})", email, attempts);

            if attempts >= MAX_OTP_ATTEMPTS {
                self.discard(&email).await?;
                return Err(too_many_attempts());
            }
            return Err(AppError::InvalidArgument(format!(
                "Invalid verification code. {} attempt(s) remaining.",
                MAX_OTP_ATTEMPTS - attempts
            )));
        }

        if sha256_hex(&req.password) != record.password_hash {
            return Err(AppError::InvalidArgument(
                "Password does not match. Please use the same password you entered during signup."
                    .to_string(),
            ));
        }

        let uid = self.identity.create_account(&email, &req.password, true).await?;

        let profile = UserProfile::new(&uid, &email, Role::User, now);
        self.store
            .set(collections::USERS, &uid, to_document(&profile)?)
            .await?;
        self.discard(&email).await?;

        tracing::info!("Email {} verified, account {} created", email, uid);
        Ok(uid)
    }

    async fn discard(&self, email: &str) -> Result<(), AppError> {
        self.store
            .delete(collections::PENDING_VERIFICATIONS, email)
            .await
            .map_err(AppError::from)
    }
}

fn too_many_attempts() -> AppError {
    AppError::ResourceExhausted("Too many failed attempts. Please sign up again.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::identity::LocalIdentityProvider,
        store::{MemoryDocumentStore, fetch_required},
        testing::{RateLimitedMailer, RecordingMailer, UnconfiguredMailer, extract_code},
    };
    use serde_json::json;

    struct Harness {
        store: Arc<MemoryDocumentStore>,
        mailer: Arc<RecordingMailer>,
        otp: OtpService,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryDocumentStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let identity = Arc::new(LocalIdentityProvider::new(store.clone()));
        let otp = OtpService::new(store.clone(), mailer.clone(), identity, "Acme");
        Harness {
            store,
            mailer,
            otp,
        }
    }

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn verify(email: &str, otp: &str, password: &str) -> VerifyOtpRequest {
        VerifyOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
            password: password.to_string(),
        }
    }

    impl Harness {
        async fn issue(&self, email: &str, password: &str) -> String {
            let expires_in = self.otp.issue_code(signup(email, password)).await.unwrap();
            assert_eq!(expires_in, 600);
            extract_code(&self.mailer.last().unwrap())
        }

        async fn pending(&self, email: &str) -> Option<PendingVerification> {
            fetch(self.store.as_ref(), collections::PENDING_VERIFICATIONS, email)
                .await
                .unwrap()
        }
    }

    fn wrong(code: &str) -> &'static str {
        if code == "000000" { "111111" } else { "000000" }
    }

    #[tokio::test]
    async fn issue_stores_digests_only() {
        let h = harness();
        let code = h.issue("A@x.com", "pw123456").await;

        assert_eq!(code.len(), 6);
        let record = h.pending("a@x.com").await.unwrap();
        assert_eq!(record.attempts, 0);
        assert_eq!(record.otp_hash, sha256_hex(&code));
        assert_ne!(record.password_hash, "pw123456");
        assert_eq!((record.expires_at - record.created_at).num_seconds(), 600);
        assert_eq!(h.mailer.last().unwrap().to.email, "a@x.com");
    }

    #[tokio::test]
    async fn correct_code_creates_account_once() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;

        let uid = h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap();

        let profile: UserProfile = fetch_required(h.store.as_ref(), collections::USERS, &uid)
            .await
            .unwrap();
        assert_eq!(profile.role, Role::User);
        assert!(profile.email_verified);
        assert!(h.pending("a@x.com").await.is_none());

        let err = h
            .otp
            .verify_code(verify("a@x.com", &code, "pw123456"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[tokio::test]
    async fn third_wrong_code_exhausts_and_deletes() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;
        let bad = wrong(&code);

        let err = h.otp.verify_code(verify("a@x.com", bad, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(err.message().contains("2 attempt(s) remaining"));

        let err = h.otp.verify_code(verify("a@x.com", bad, "pw123456")).await.unwrap_err();
        assert!(err.message().contains("1 attempt(s) remaining"));

        let err = h.otp.verify_code(verify("a@x.com", bad, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "resource-exhausted");
        assert!(h.pending("a@x.com").await.is_none());

        let err = h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "not-found");
    }

    #[tokio::test]
    async fn exhausted_record_is_refused_even_with_correct_code() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;
        h.store
            .merge(collections::PENDING_VERIFICATIONS, "a@x.com", json!({ "attempts": 3 }))
            .await
            .unwrap();

        let err = h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "resource-exhausted");
        assert!(h.pending("a@x.com").await.is_none());
    }

    #[tokio::test]
    async fn expired_code_is_deadline_exceeded_and_removed() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;
        let past = Utc::now() - Duration::seconds(1);
        h.store
            .merge(collections::PENDING_VERIFICATIONS, "a@x.com", json!({ "expiresAt": past }))
            .await
            .unwrap();

        let err = h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "deadline-exceeded");
        assert!(h.pending("a@x.com").await.is_none());
    }

    #[tokio::test]
    async fn password_mismatch_does_not_spend_an_attempt() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;

        for _ in 0..3 {
            let err = h
                .otp
                .verify_code(verify("a@x.com", &code, "different"))
                .await
                .unwrap_err();
            assert!(err.message().starts_with("Password does not match"));
        }
        assert_eq!(h.pending("a@x.com").await.unwrap().attempts, 0);

        h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap();
    }

    #[tokio::test]
    async fn reissue_overwrites_previous_code() {
        let h = harness();
        let first = h.issue("a@x.com", "pw123456").await;
        h.otp.verify_code(verify("a@x.com", wrong(&first), "pw123456")).await.unwrap_err();

        let second = h.issue("a@x.com", "pw123456").await;
        assert_eq!(h.pending("a@x.com").await.unwrap().attempts, 0);
        h.otp.verify_code(verify("a@x.com", &second, "pw123456")).await.unwrap();
    }

    #[tokio::test]
    async fn existing_account_is_already_exists() {
        let h = harness();
        let code = h.issue("a@x.com", "pw123456").await;
        h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap();

        let code = h.issue("a@x.com", "pw123456").await;
        let err = h.otp.verify_code(verify("a@x.com", &code, "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "already-exists");
    }

    #[tokio::test]
    async fn missing_fields_are_invalid() {
        let h = harness();
        let err = h.otp.issue_code(signup("", "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "invalid-argument");

        let err = h.otp.verify_code(verify("a@x.com", "", "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_mailer_fails_before_writing() {
        let store = Arc::new(MemoryDocumentStore::new());
        let identity = Arc::new(LocalIdentityProvider::new(store.clone()));
        let otp = OtpService::new(store.clone(), Arc::new(UnconfiguredMailer), identity, "Acme");

        let err = otp.issue_code(signup("a@x.com", "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "internal");
        assert!(store.get(collections::PENDING_VERIFICATIONS, "a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn send_failure_keeps_the_record() {
        let store = Arc::new(MemoryDocumentStore::new());
        let identity = Arc::new(LocalIdentityProvider::new(store.clone()));
        let otp = OtpService::new(store.clone(), Arc::new(RateLimitedMailer), identity, "Acme");

        let err = otp.issue_code(signup("a@x.com", "pw123456")).await.unwrap_err();
        assert_eq!(err.code(), "resource-exhausted");
        assert!(store.get(collections::PENDING_VERIFICATIONS, "a@x.com").await.unwrap().is_some());
    }
}
