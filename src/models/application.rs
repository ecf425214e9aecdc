// src/models/application.rs

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").expect("valid phone regex"));

/// Lifecycle state of a job application.
///
/// Documents written before a status was ever set deserialize as `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    OnHold,
    Shortlisted,
    Selected,
    Rejected,
}

/// Admin actions that drive an application between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shortlist,
    Hold,
    Reject,
    Select,
    RejectAfterInterview,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Shortlist => "shortlist",
            Action::Hold => "hold",
            Action::Reject => "reject",
            Action::Select => "select",
            Action::RejectAfterInterview => "reject after interview",
        }
    }
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::OnHold => "on_hold",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Document field stamped when the application enters this state.
    pub fn timestamp_field(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pendingAt",
            ApplicationStatus::OnHold => "onHoldAt",
            ApplicationStatus::Shortlisted => "shortlistedAt",
            ApplicationStatus::Selected => "selectedAt",
            ApplicationStatus::Rejected => "rejectedAt",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Selected | ApplicationStatus::Rejected)
    }

    /// The transition table. Anything not listed is refused.
    pub fn transition(self, action: Action) -> Result<ApplicationStatus, AppError> {
        use ApplicationStatus::*;

        match (self, action) {
            (Pending | OnHold, Action::Shortlist) => Ok(Shortlisted),
            (Pending, Action::Hold) => Ok(OnHold),
            (Pending, Action::Reject) => Ok(Rejected),
            (Shortlisted, Action::Select) => Ok(Selected),
            (Shortlisted, Action::RejectAfterInterview) => Ok(Rejected),
            (from, action) => Err(AppError::InvalidArgument(format!(
                "Cannot {} an application that is {}",
                action.label(),
                from
            ))),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    #[default]
    Online,
    Offline,
}

impl InterviewMode {
    pub fn label(self) -> &'static str {
        match self {
            InterviewMode::Online => "Online",
            InterviewMode::Offline => "In person",
        }
    }
}

/// Interview details attached when an application is shortlisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub date: String,
    pub time: String,
    pub mode: InterviewMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

/// Body of the shortlist action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub mode: InterviewMode,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// True for absolute `http` or `https` URLs.
pub fn is_web_link(link: &str) -> bool {
    url::Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

impl InterviewRequest {
    /// Checks the schedule and builds the stored interview. Only the field
    /// relevant to the mode is kept.
    pub fn into_interview(self, now: DateTime<Utc>) -> Result<Interview, AppError> {
        let date = self.date.trim();
        let time = self.time.trim();
        if date.is_empty() || time.is_empty() {
            return Err(AppError::InvalidArgument(
                "Interview date and time are required".to_string(),
            ));
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidArgument(format!("Interview date '{}' is not YYYY-MM-DD", date))
        })?;
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
            AppError::InvalidArgument(format!("Interview time '{}' is not HH:MM", time))
        })?;

        let (meeting_link, location) = match self.mode {
            InterviewMode::Online => {
                let link = present(&self.meeting_link).ok_or_else(|| {
                    AppError::InvalidArgument(
                        "A meeting link is required for online interviews".to_string(),
                    )
                })?;
                if !is_web_link(&link) {
                    return Err(AppError::InvalidArgument(
                        "The meeting link must be an http or https URL".to_string(),
                    ));
                }
                (Some(link), None)
            }
            InterviewMode::Offline => {
                let location = present(&self.location).ok_or_else(|| {
                    AppError::InvalidArgument(
                        "A location is required for offline interviews".to_string(),
                    )
                })?;
                (None, Some(location))
            }
        };

        Ok(Interview {
            date: date.to_string(),
            time: time.to_string(),
            mode: self.mode,
            meeting_link,
            location,
            scheduled_at: now,
        })
    }
}

/// Post-interview scores, each 1 to 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub technical_skills: u8,
    pub communication: u8,
    pub fit: u8,
    #[serde(default)]
    pub notes: String,
    pub evaluated_by: String,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[validate(range(min = 1, max = 5, message = "technicalSkills must be between 1 and 5"))]
    pub technical_skills: u8,
    #[validate(range(min = 1, max = 5, message = "communication must be between 1 and 5"))]
    pub communication: u8,
    #[validate(range(min = 1, max = 5, message = "fit must be between 1 and 5"))]
    pub fit: u8,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub notes: String,
}

impl EvaluationRequest {
    pub fn into_evaluation(self, evaluator: &str, now: DateTime<Utc>) -> Evaluation {
        Evaluation {
            technical_skills: self.technical_skills,
            communication: self.communication,
            fit: self.fit,
            notes: self.notes,
            evaluated_by: evaluator.to_string(),
            evaluated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Select,
    Reject,
}

/// Body of the evaluate action.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub decision: Decision,
    pub evaluation: EvaluationRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "A valid phone number is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree_level: String,
    pub institution: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceEntry {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Represents a document in the 'job_applications' collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(default)]
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub department: String,
    /// Session user that submitted the application.
    #[serde(default)]
    pub user_id: Option<String>,
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub resume_url: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview: Option<Interview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hold_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortlisted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

/// DTO for submitting a new application.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    #[validate(length(min = 1, message = "jobId is required"))]
    pub job_id: String,
    #[validate(nested)]
    pub personal_details: PersonalDetails,
    #[validate(length(min = 1, message = "At least one education entry is required"))]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceEntry>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub skills: Vec<String>,
    #[validate(length(min = 1, max = 1000), custom(function = validate_url_string))]
    pub resume_url: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub cover_letter: String,
    #[validate(custom(function = validate_url_string))]
    pub portfolio_url: Option<String>,
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if url::Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

/// Query string of the admin application listing. Every given filter must
/// match.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListParams {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<String>,
    pub department: Option<String>,
    /// Case-insensitive substring of the applicant's name or email.
    pub search: Option<String>,
}

impl ApplicationListParams {
    pub fn matches(&self, application: &JobApplication) -> bool {
        let details = &application.personal_details;
        self.status.is_none_or(|status| application.status == status)
            && present(&self.job_id).is_none_or(|id| application.job_id == id)
            && present(&self.department)
                .is_none_or(|d| application.department.trim().eq_ignore_ascii_case(&d))
            && present(&self.search).is_none_or(|term| {
                let term = term.to_lowercase();
                details.full_name.to_lowercase().contains(&term)
                    || details.email.to_lowercase().contains(&term)
            })
    }
}
