// src/handlers/departments.rs

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
    models::job::{Department, DepartmentRequest},
    state::AppState,
    store::{collections, fetch, fetch_all, to_document},
};

/// Lists departments alphabetically.
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut departments: Vec<Department> =
        fetch_all(state.store.as_ref(), collections::DEPARTMENTS).await?;
    departments.sort_by_key(|d| d.name.to_lowercase());
    Ok(Json(departments))
}

/// Admin only.
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<DepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut department = Department {
        id: String::new(),
        name: payload.name.trim().to_string(),
        description: payload.description.filter(|d| !d.trim().is_empty()),
        created_at: Utc::now(),
    };
    department.id = state
        .store
        .insert(collections::DEPARTMENTS, to_document(&department)?)
        .await?;

    Ok((StatusCode::CREATED, Json(department)))
}

/// Admin only.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existing: Option<Department> =
        fetch(state.store.as_ref(), collections::DEPARTMENTS, &id).await?;
    if existing.is_none() {
        return Err(AppError::NotFound("Department not found".to_string()));
    }
    state.store.delete(collections::DEPARTMENTS, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
