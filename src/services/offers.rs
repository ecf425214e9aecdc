// src/services/offers.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::AppError,
    mail::{EmailSender, Notification, notify, templates},
    models::{
        application::{ApplicationStatus, JobApplication},
        offer::{OfferLetter, OfferLetterRequest, OfferStatus},
    },
    store::{DocumentStore, collections, fetch, fetch_all, to_document},
};

#[derive(Debug, Serialize)]
pub struct OfferOutcome {
    pub offer: OfferLetter,
    pub notification: Notification,
}

/// Drafts and sends the single offer letter of a selected application.
#[derive(Clone)]
pub struct OfferLetterService {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn EmailSender>,
    company: String,
}

impl OfferLetterService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            company: company.into(),
        }
    }

    pub async fn get(&self, application_id: &str) -> Result<OfferLetter, AppError> {
        fetch(self.store.as_ref(), collections::OFFER_LETTERS, application_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No offer letter for application '{}'",
                    application_id
                ))
            })
    }

    /// Most recently updated first.
    pub async fn list(&self) -> Result<Vec<OfferLetter>, AppError> {
        let mut offers: Vec<OfferLetter> =
            fetch_all(self.store.as_ref(), collections::OFFER_LETTERS).await?;
        offers.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(offers)
    }

    pub async fn save_draft(
        &self,
        application_id: &str,
        req: OfferLetterRequest,
    ) -> Result<OfferLetter, AppError> {
        req.validate()?;
        let now = Utc::now();
        let offer = self.compose(application_id, req, now).await?;

        self.store
            .set(collections::OFFER_LETTERS, application_id, to_document(&offer)?)
            .await?;
        tracing::info!("Offer letter draft saved for application {}", application_id);
        Ok(offer)
    }

    /// Stores the letter as sent, then emails it. Fields left out of the
    /// request fall back to the saved draft.
    pub async fn send(
        &self,
        application_id: &str,
        req: OfferLetterRequest,
    ) -> Result<OfferOutcome, AppError> {
        req.validate()?;
        let now = Utc::now();
        let mut offer = self.compose(application_id, req, now).await?;

        let salary = offer.salary.filter(|amount| *amount > 0);
        let (salary, joining_date) = match (salary, offer.joining_date) {
            (Some(salary), Some(joining_date)) => (salary, joining_date),
            _ => {
                return Err(AppError::InvalidArgument(
                    "A positive salary and a joining date are required to send an offer letter"
                        .to_string(),
                ));
            }
        };

        offer.status = OfferStatus::Sent;
        offer.sent_at = Some(now);
        self.store
            .set(collections::OFFER_LETTERS, application_id, to_document(&offer)?)
            .await?;
        tracing::info!("Offer letter for application {} marked sent", application_id);

        let email = templates::offer_letter(
            &offer,
            salary,
            joining_date,
            now.date_naive(),
            &self.company,
        );
        let notification = notify(self.mailer.as_ref(), email, "Offer letter").await;

        Ok(OfferOutcome {
            offer,
            notification,
        })
    }

    /// Merges the request over the stored letter and the application's
    /// defaults. The result is always a draft; `created_at` survives.
    async fn compose(
        &self,
        application_id: &str,
        req: OfferLetterRequest,
        now: DateTime<Utc>,
    ) -> Result<OfferLetter, AppError> {
        let application = self.selected_application(application_id).await?;
        let existing: Option<OfferLetter> =
            fetch(self.store.as_ref(), collections::OFFER_LETTERS, application_id).await?;

        let (role, department, salary, joining_date, location, terms, created_at) = match existing {
            Some(prev) => (
                prev.role,
                prev.department,
                prev.salary,
                prev.joining_date,
                prev.location,
                prev.additional_terms,
                prev.created_at,
            ),
            None => (
                String::new(),
                String::new(),
                None,
                None,
                String::new(),
                String::new(),
                now,
            ),
        };

        Ok(OfferLetter {
            id: application_id.to_string(),
            application_id: application_id.to_string(),
            candidate_name: application.personal_details.full_name,
            candidate_email: application.personal_details.email,
            role: first_filled([req.role, role, application.job_title]),
            department: first_filled([req.department, department, application.department]),
            salary: req.salary.or(salary),
            joining_date: req.joining_date.or(joining_date),
            location: replace_or_keep(req.location, location),
            additional_terms: replace_or_keep(req.additional_terms, terms),
            status: OfferStatus::Draft,
            created_at,
            updated_at: now,
            sent_at: None,
        })
    }

    async fn selected_application(&self, id: &str) -> Result<JobApplication, AppError> {
        let application: JobApplication =
            fetch(self.store.as_ref(), collections::JOB_APPLICATIONS, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", id)))?;

        if application.status != ApplicationStatus::Selected {
            return Err(AppError::InvalidArgument(format!(
                "Offer letters require a selected application; this one is {}",
                application.status
            )));
        }
        Ok(application)
    }
}

fn first_filled<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn replace_or_keep(submitted: Option<String>, stored: String) -> String {
    match submitted {
        Some(value) => value.trim().to_string(),
        None => stored,
    }
}
