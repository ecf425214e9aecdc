// src/handlers/users.rs

use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::user::UserProfile,
    state::AppState,
    store::{collections, fetch, fetch_all},
    utils::jwt::Claims,
};

/// Profile of the signed-in user.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile: UserProfile = fetch(state.store.as_ref(), collections::USERS, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// Lists every profile, newest first.
/// Admin only.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut users: Vec<UserProfile> = fetch_all(state.store.as_ref(), collections::USERS).await?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(users))
}
