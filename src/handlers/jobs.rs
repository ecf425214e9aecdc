// src/handlers/jobs.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::job::{JobPosting, JobPostingRequest, active_postings, expired_postings},
    state::AppState,
    store::{collections, fetch, fetch_all, to_document},
};

/// Lists postings still open for applications, newest first.
pub async fn list_active(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let postings: Vec<JobPosting> =
        fetch_all(state.store.as_ref(), collections::JOB_POSTINGS).await?;
    Ok(Json(active_postings(postings, Utc::now())))
}

/// Fetches one open posting. Expired postings are hidden from applicants.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let posting = load(&state, &id).await?;
    if posting.is_expired(Utc::now()) {
        return Err(AppError::NotFound("Job posting not found".to_string()));
    }
    Ok(Json(posting))
}

/// Lists every posting, expired included.
/// Admin only.
pub async fn list_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut postings: Vec<JobPosting> =
        fetch_all(state.store.as_ref(), collections::JOB_POSTINGS).await?;
    postings.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    Ok(Json(postings))
}

/// Admin only.
pub async fn list_expired(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let postings: Vec<JobPosting> =
        fetch_all(state.store.as_ref(), collections::JOB_POSTINGS).await?;
    Ok(Json(expired_postings(postings, Utc::now())))
}

/// Creates a posting.
/// Admin only.
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobPostingRequest>,
) -> Result<impl IntoResponse, AppError> {
    check(&payload)?;

    let mut posting = payload.into_posting(Utc::now());
    posting.id = state
        .store
        .insert(collections::JOB_POSTINGS, to_document(&posting)?)
        .await?;
    tracing::info!("Job posting {} created: {}", posting.id, posting.title);

    Ok((StatusCode::CREATED, Json(posting)))
}

/// Replaces a posting, keeping its original `postedAt`.
/// Admin only.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<JobPostingRequest>,
) -> Result<impl IntoResponse, AppError> {
    check(&payload)?;
    let existing = load(&state, &id).await?;

    let mut posting = payload.into_posting(existing.posted_at);
    posting.id = id;
    posting.updated_at = Some(Utc::now());
    state
        .store
        .set(collections::JOB_POSTINGS, &posting.id, to_document(&posting)?)
        .await?;

    Ok(Json(posting))
}

/// Admin only.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    load(&state, &id).await?;
    state.store.delete(collections::JOB_POSTINGS, &id).await?;
    tracing::info!("Job posting {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

fn check(payload: &JobPostingRequest) -> Result<(), AppError> {
    payload.validate()?;
    if !payload.salary_range_is_valid() {
        return Err(AppError::InvalidArgument(
            "salaryMin must not exceed salaryMax".to_string(),
        ));
    }
    Ok(())
}

async fn load(state: &AppState, id: &str) -> Result<JobPosting, AppError> {
    fetch(state.store.as_ref(), collections::JOB_POSTINGS, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))
}
