// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, Role, SignupRequest, UserProfile, VerifyOtpRequest},
    state::AppState,
    store::{collections, fetch},
    utils::jwt::sign_jwt,
};

/// Signup step 1: stores a pending verification and emails the code.
/// Calling it again for the same email replaces the previous code.
pub async fn request_code(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let expires_in = state.otp.issue_code(payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Verification code sent to your email",
        "expiresIn": expires_in
    })))
}

/// Signup step 2: checks the code and creates the verified account.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let uid = state.otp.verify_code(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Email verified successfully! You can now sign in.",
            "uid": uid
        })),
    ))
}

/// Authenticates against the identity provider and returns a JWT.
///
/// The admin role comes from the configured allow-list or the stored profile.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = state
        .identity
        .authenticate(&payload.email, &payload.password)
        .await?;

    let profile: Option<UserProfile> =
        fetch(state.store.as_ref(), collections::USERS, &account.uid).await?;
    let role = if state.config.is_admin_email(&account.email)
        || profile.is_some_and(|p| p.role == Role::Admin)
    {
        Role::Admin
    } else {
        Role::User
    };

    let token = sign_jwt(
        &account.uid,
        &account.email,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;
    tracing::info!("{} signed in as {}", account.email, role.as_str());

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "uid": account.uid,
        "role": role
    })))
}
