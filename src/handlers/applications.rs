// src/handlers/applications.rs

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::application::{
        ApplicationListParams, EvaluateRequest, InterviewRequest, JobApplication,
        SubmitApplicationRequest,
    },
    state::AppState,
    store::{collections, fetch, fetch_all},
    utils::jwt::Claims,
};

/// Submits an application for the signed-in user.
///
/// The confirmation email is best-effort; its outcome is reported as
/// `notification`.
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.lifecycle.submit(&claims.sub, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// The caller's own applications, newest first.
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let applications = newest_first(
        fetch_all::<JobApplication>(state.store.as_ref(), collections::JOB_APPLICATIONS)
            .await?
            .into_iter()
            .filter(|a| a.user_id.as_deref() == Some(claims.sub.as_str()))
            .collect(),
    );
    Ok(Json(applications))
}

/// Lists applications, optionally filtered by `?status=`, `?jobId=`,
/// `?department=` and a `?search=` over applicant name and email.
/// Admin only.
pub async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationListParams>,
) -> Result<impl IntoResponse, AppError> {
    let applications = newest_first(
        fetch_all::<JobApplication>(state.store.as_ref(), collections::JOB_APPLICATIONS)
            .await?
            .into_iter()
            .filter(|a| params.matches(a))
            .collect(),
    );
    Ok(Json(applications))
}

/// Admin only.
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let application: JobApplication =
        fetch(state.store.as_ref(), collections::JOB_APPLICATIONS, &id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", id)))?;
    Ok(Json(application))
}

/// pending | on_hold -> shortlisted, with interview details.
/// Admin only.
pub async fn shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<InterviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lifecycle.shortlist(&id, payload).await?))
}

/// pending -> on_hold.
/// Admin only.
pub async fn hold(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lifecycle.hold(&id).await?))
}

/// pending -> rejected.
/// Admin only.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.lifecycle.reject(&id).await?))
}

/// shortlisted -> selected | rejected, recording the evaluation.
/// Admin only.
pub async fn evaluate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        state.lifecycle.evaluate(&id, payload, &claims.email).await?,
    ))
}

/// Re-sends the email for the current status.
/// Admin only.
pub async fn resend_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification = state.lifecycle.resend_notification(&id).await?;
    Ok(Json(json!({ "notification": notification })))
}

fn newest_first(mut applications: Vec<JobApplication>) -> Vec<JobApplication> {
    applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    applications
}
