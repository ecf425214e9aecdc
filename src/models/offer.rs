// src/models/offer.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[default]
    Draft,
    Sent,
}

/// Represents a document in the 'offer_letters' collection, keyed by the
/// application id so each application has at most one letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferLetter {
    #[serde(default)]
    pub id: String,
    pub application_id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub salary: Option<u64>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub additional_terms: String,
    #[serde(default)]
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Editable fields of an offer letter.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferLetterRequest {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub role: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub department: String,
    pub salary: Option<u64>,
    pub joining_date: Option<NaiveDate>,
    /// `None` keeps the stored value; an empty string clears it.
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 10000))]
    pub additional_terms: Option<String>,
}
