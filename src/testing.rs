// src/testing.rs

//! Fakes shared by the unit tests.

use std::sync::{LazyLock, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;

use crate::{
    mail::{EmailError, EmailSender, OutgoingEmail},
    models::application::{
        ApplicationStatus, EducationEntry, JobApplication, PersonalDetails,
    },
    store::{DocumentStore, collections, to_document},
};

static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"otp-code[^>]*>(\d{6})<"#).unwrap());

/// Captures every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<OutgoingEmail> {
        self.sent.lock().unwrap().last().cloned()
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

/// Provider that always answers 429.
pub struct RateLimitedMailer;

#[async_trait]
impl EmailSender for RateLimitedMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<String, EmailError> {
        Err(EmailError::RateLimited)
    }
}

/// Provider without an API key.
pub struct UnconfiguredMailer;

#[async_trait]
impl EmailSender for UnconfiguredMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<String, EmailError> {
        Err(EmailError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Pulls the six-digit code out of a verification email.
pub fn extract_code(email: &OutgoingEmail) -> String {
    OTP_RE
        .captures(&email.html)
        .map(|caps| caps[1].to_string())
        .expect("verification email carries a code")
}

pub fn sample_application(status: ApplicationStatus) -> JobApplication {
    JobApplication {
        id: String::new(),
        job_id: "job-1".to_string(),
        job_title: "Welder".to_string(),
        department: "Fabrication".to_string(),
        user_id: Some("uid-1".to_string()),
        personal_details: PersonalDetails {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            phone: "+1 555 0100".to_string(),
            address: String::new(),
        },
        education: vec![EducationEntry {
            degree_level: "Bachelor".to_string(),
            institution: "Polytechnic".to_string(),
            field_of_study: "Metallurgy".to_string(),
            year: Some(2019),
            grade: None,
        }],
        work_experience: Vec::new(),
        skills: vec!["TIG".to_string()],
        resume_url: "https://files.example/ada.pdf".to_string(),
        cover_letter: String::new(),
        portfolio_url: None,
        status,
        applied_at: Utc::now(),
        interview: None,
        evaluation: None,
        on_hold_at: None,
        shortlisted_at: None,
        selected_at: None,
        rejected_at: None,
    }
}

pub async fn seed_application(store: &dyn DocumentStore, status: ApplicationStatus) -> String {
    let application = sample_application(status);
    store
        .insert(
            collections::JOB_APPLICATIONS,
            to_document(&application).unwrap(),
        )
        .await
        .unwrap()
}
