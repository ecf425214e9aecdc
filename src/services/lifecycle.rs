// src/services/lifecycle.rs

//! Application submission and the admin-driven status transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    error::AppError,
    mail::{EmailSender, Notification, OutgoingEmail, Recipient, notify, templates},
    models::{
        application::{
            Action, ApplicationStatus, Decision, EvaluateRequest, InterviewRequest, JobApplication,
            SubmitApplicationRequest,
        },
        job::JobPosting,
    },
    store::{DocumentStore, StoreError, collections, fetch, fetch_required, to_document},
};

/// Result of a committed write plus the outcome of its email.
#[derive(Debug, Serialize)]
pub struct ApplicationOutcome {
    pub application: JobApplication,
    pub notification: Notification,
}

#[derive(Clone)]
pub struct ApplicationLifecycle {
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn EmailSender>,
    company: String,
}

impl ApplicationLifecycle {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn EmailSender>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            company: company.into(),
        }
    }

    /// Records a new `pending` application against an active posting.
    pub async fn submit(
        &self,
        user_id: &str,
        req: SubmitApplicationRequest,
    ) -> Result<ApplicationOutcome, AppError> {
        req.validate()?;

        let now = Utc::now();
        let job: JobPosting = fetch(self.store.as_ref(), collections::JOB_POSTINGS, &req.job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job posting not found".to_string()))?;
        if job.is_expired(now) {
            return Err(AppError::InvalidArgument(
                "This job posting is no longer accepting applications".to_string(),
            ));
        }

        let mut application = JobApplication {
            id: String::new(),
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            department: job.department.clone(),
            user_id: Some(user_id.to_string()),
            personal_details: req.personal_details,
            education: req.education,
            work_experience: req.work_experience,
            skills: req
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            resume_url: req.resume_url,
            cover_letter: req.cover_letter,
            portfolio_url: req.portfolio_url.filter(|url| !url.trim().is_empty()),
            status: ApplicationStatus::Pending,
            applied_at: now,
            interview: None,
            evaluation: None,
            on_hold_at: None,
            shortlisted_at: None,
            selected_at: None,
            rejected_at: None,
        };

        application.id = self
            .store
            .insert(collections::JOB_APPLICATIONS, to_document(&application)?)
            .await?;
        tracing::info!(
            "Application {} submitted for job {} by {}",
            application.id,
            application.job_id,
            user_id
        );

        let email = templates::application_received(
            recipient(&application),
            &application.job_title,
            &self.company,
        );
        let notification = notify(self.mailer.as_ref(), email, "Application received").await;

        Ok(ApplicationOutcome {
            application,
            notification,
        })
    }

    pub async fn shortlist(
        &self,
        id: &str,
        req: InterviewRequest,
    ) -> Result<ApplicationOutcome, AppError> {
        let application = self.load(id).await?;
        let to = application.status.transition(Action::Shortlist)?;
        let now = Utc::now();
        let interview = req.into_interview(now)?;

        self.commit(application, to, now, Some(("interview", to_value(&interview)?)))
            .await
    }

    pub async fn hold(&self, id: &str) -> Result<ApplicationOutcome, AppError> {
        let application = self.load(id).await?;
        let to = application.status.transition(Action::Hold)?;
        self.commit(application, to, Utc::now(), None).await
    }

    pub async fn reject(&self, id: &str) -> Result<ApplicationOutcome, AppError> {
        let application = self.load(id).await?;
        let to = application.status.transition(Action::Reject)?;
        self.commit(application, to, Utc::now(), None).await
    }

    /// Post-interview decision; the evaluation is stored either way.
    pub async fn evaluate(
        &self,
        id: &str,
        req: EvaluateRequest,
        evaluator: &str,
    ) -> Result<ApplicationOutcome, AppError> {
        req.evaluation.validate()?;

        let action = match req.decision {
            Decision::Select => Action::Select,
            Decision::Reject => Action::RejectAfterInterview,
        };
        let application = self.load(id).await?;
        let to = application.status.transition(action)?;
        let now = Utc::now();
        let evaluation = req.evaluation.into_evaluation(evaluator, now);

        self.commit(application, to, now, Some(("evaluation", to_value(&evaluation)?)))
            .await
    }

    /// Sends the email for the current status again without touching data.
    pub async fn resend_notification(&self, id: &str) -> Result<Notification, AppError> {
        let application = self.load(id).await?;
        let email = self.status_email(&application)?;
        Ok(notify(self.mailer.as_ref(), email, "Status update (resend)").await)
    }

    async fn load(&self, id: &str) -> Result<JobApplication, AppError> {
        fetch(self.store.as_ref(), collections::JOB_APPLICATIONS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", id)))
    }

    /// Merges status, its timestamp and the attached sub-object, then
    /// notifies. Email failure does not undo the write.
    async fn commit(
        &self,
        application: JobApplication,
        to: ApplicationStatus,
        now: DateTime<Utc>,
        attachment: Option<(&str, Value)>,
    ) -> Result<ApplicationOutcome, AppError> {
        let mut patch = Map::new();
        patch.insert("status".to_string(), to_value(&to)?);
        patch.insert(to.timestamp_field().to_string(), to_value(&now)?);
        if let Some((field, value)) = attachment {
            patch.insert(field.to_string(), value);
        }

        self.store
            .merge(collections::JOB_APPLICATIONS, &application.id, Value::Object(patch))
            .await?;
        tracing::info!(
            "Application {} moved from {} to {}",
            application.id,
            application.status,
            to
        );

        let updated: JobApplication = fetch_required(
            self.store.as_ref(),
            collections::JOB_APPLICATIONS,
            &application.id,
        )
        .await?;

        let notification = match self.status_email(&updated) {
            Ok(email) => notify(self.mailer.as_ref(), email, "Status update").await,
            Err(err) => Notification::Failed {
                code: err.code().to_string(),
                message: err.message().to_string(),
            },
        };

        Ok(ApplicationOutcome {
            application: updated,
            notification,
        })
    }

    fn status_email(&self, application: &JobApplication) -> Result<OutgoingEmail, AppError> {
        templates::status_update(
            recipient(application),
            application.status,
            &application.job_title,
            application.interview.as_ref(),
            &self.company,
        )
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "No notification exists for a {} application",
                application.status
            ))
        })
    }
}

fn recipient(application: &JobApplication) -> Recipient {
    Recipient::new(
        application.personal_details.email.clone(),
        Some(application.personal_details.full_name.clone()),
    )
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| StoreError::from(e).into())
}
