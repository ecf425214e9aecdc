// src/models/mod.rs

pub mod application;
pub mod job;
pub mod offer;
pub mod user;
pub mod verification;

use validator::ValidationError;

/// Rejects values that are empty once trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
