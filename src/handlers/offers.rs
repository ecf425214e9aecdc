// src/handlers/offers.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::offer::OfferLetterRequest, state::AppState};

/// Admin only.
pub async fn list_offers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.offers.list().await?))
}

/// Admin only.
pub async fn get_offer(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.offers.get(&application_id).await?))
}

/// Creates or updates the draft letter of a selected application.
/// Admin only.
pub async fn save_offer(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Json(payload): Json<OfferLetterRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.offers.save_draft(&application_id, payload).await?))
}

/// Marks the letter sent and emails it to the candidate.
/// Admin only.
pub async fn send_offer(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Json(payload): Json<OfferLetterRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.offers.send(&application_id, payload).await?))
}
