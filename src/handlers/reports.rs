// src/handlers/reports.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        application::{ApplicationStatus, JobApplication},
        job::JobPosting,
        offer::{OfferLetter, OfferStatus},
    },
    state::AppState,
    store::{collections, fetch_all},
};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub on_hold: usize,
    pub shortlisted: usize,
    pub selected: usize,
    pub rejected: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct OfferCounts {
    pub draft: usize,
    pub sent: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_applications: usize,
    pub by_status: StatusCounts,
    pub offer_letters: OfferCounts,
    pub users: usize,
    pub active_jobs: usize,
    pub expired_jobs: usize,
}

/// Recruitment counters for the admin dashboard.
/// Admin only.
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store.as_ref();
    let applications: Vec<JobApplication> =
        fetch_all(store, collections::JOB_APPLICATIONS).await?;
    let offers: Vec<OfferLetter> = fetch_all(store, collections::OFFER_LETTERS).await?;
    let jobs: Vec<JobPosting> = fetch_all(store, collections::JOB_POSTINGS).await?;
    let users = store.list(collections::USERS).await?.len();

    let mut by_status = StatusCounts::default();
    for application in &applications {
        match application.status {
            ApplicationStatus::Pending => by_status.pending += 1,
            ApplicationStatus::OnHold => by_status.on_hold += 1,
            ApplicationStatus::Shortlisted => by_status.shortlisted += 1,
            ApplicationStatus::Selected => by_status.selected += 1,
            ApplicationStatus::Rejected => by_status.rejected += 1,
        }
    }

    let mut offer_letters = OfferCounts::default();
    for offer in &offers {
        match offer.status {
            OfferStatus::Draft => offer_letters.draft += 1,
            OfferStatus::Sent => offer_letters.sent += 1,
        }
    }

    let now = Utc::now();
    let expired_jobs = jobs.iter().filter(|job| job.is_expired(now)).count();

    Ok(Json(Summary {
        total_applications: applications.len(),
        by_status,
        offer_letters,
        users,
        active_jobs: jobs.len() - expired_jobs,
        expired_jobs,
    }))
}
