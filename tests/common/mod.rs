// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hrms_backend::{
    config::{Config, DEFAULT_BREVO_API_URL, EmailConfig},
    mail::{EmailError, EmailSender, OutgoingEmail},
    routes,
    services::LocalIdentityProvider,
    state::AppState,
    store::{DocumentStore, MemoryDocumentStore},
};
use regex::Regex;
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "hr@acme.test";
pub const PASSWORD: &str = "pw123456";

static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"otp-code[^>]*>(\d{6})<"#).unwrap());

/// Captures outgoing mail so tests can read codes and subjects.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_to(&self, email: &str) -> Option<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to.email == email)
            .cloned()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email);
        Ok(format!("<msg-{}@test>", sent.len()))
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub mailer: Arc<RecordingMailer>,
    pub store: Arc<MemoryDocumentStore>,
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        admin_email: None,
        admin_password: None,
        email: EmailConfig {
            api_key: Some("test-key".to_string()),
            api_url: DEFAULT_BREVO_API_URL.to_string(),
            sender_email: "no-reply@acme.test".to_string(),
            sender_name: "Acme".to_string(),
            timeout: Duration::from_secs(5),
        },
    }
}

/// Spawns the app on a random port with in-memory collaborators.
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let dyn_store: Arc<dyn DocumentStore> = store.clone();
    let identity = Arc::new(LocalIdentityProvider::new(dyn_store.clone()));

    let state = AppState::new(test_config(), dyn_store, mailer.clone(), identity);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        mailer,
        store,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    /// Code from the newest verification email sent to `email`.
    pub fn code_for(&self, email: &str) -> String {
        let message = self.mailer.last_to(email).expect("verification email");
        OTP_RE
            .captures(&message.html)
            .map(|caps| caps[1].to_string())
            .expect("code in verification email")
    }

    /// Full OTP signup followed by a login; returns the bearer token.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/auth/otp",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let code = self.code_for(email);
        let response = self
            .post(
                "/api/auth/otp/verify",
                None,
                json!({ "email": email, "otp": code, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);

        self.login(email).await
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.register(ADMIN_EMAIL).await
    }

    /// Creates a posting expiring `expires_in_days` from now.
    pub async fn create_job(&self, admin: &str, title: &str, expires_in_days: i64) -> String {
        let expiry = chrono::Utc::now() + chrono::Duration::days(expires_in_days);
        let response = self
            .post(
                "/api/admin/jobs",
                Some(admin),
                json!({
                    "title": title,
                    "department": "Fabrication",
                    "employmentType": "Full-time",
                    "location": "Pune",
                    "requirements": ["Certified", " "],
                    "expiryDateTime": expiry
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    /// Submits a valid application as `user`; returns its id.
    pub async fn apply(&self, user: &str, job_id: &str) -> String {
        let response = self
            .post("/api/applications", Some(user), application_body(job_id))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        body["application"]["id"].as_str().unwrap().to_string()
    }
}

pub fn application_body(job_id: &str) -> Value {
    json!({
        "jobId": job_id,
        "personalDetails": {
            "fullName": "Ada Lovelace",
            "email": "ada@x.com",
            "phone": "+1 555 0100"
        },
        "education": [
            { "degreeLevel": "Bachelor", "institution": "Polytechnic", "year": 2019 }
        ],
        "skills": ["TIG", ""],
        "resumeUrl": "https://files.example/ada.pdf"
    })
}
