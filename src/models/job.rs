// src/models/job.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Represents a document in the 'job_postings' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: String,

    pub title: String,

    pub department: String,

    /// e.g. "Full-time", "Contract".
    #[serde(default)]
    pub employment_type: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: String,

    /// Free text such as "3-5 years".
    #[serde(default)]
    pub experience: String,

    #[serde(default)]
    pub salary_min: Option<u64>,

    #[serde(default)]
    pub salary_max: Option<u64>,

    #[serde(default)]
    pub requirements: Vec<String>,

    pub posted_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Postings without an expiry never expire.
    #[serde(default)]
    pub expiry_date_time: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expiry_date_time, Some(expiry) if expiry <= now)
    }
}

/// Postings visible to applicants, newest first.
pub fn active_postings(postings: Vec<JobPosting>, now: DateTime<Utc>) -> Vec<JobPosting> {
    let mut active: Vec<JobPosting> = postings
        .into_iter()
        .filter(|posting| !posting.is_expired(now))
        .collect();
    active.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    active
}

/// Expired postings kept for reporting, most recently expired first.
pub fn expired_postings(postings: Vec<JobPosting>, now: DateTime<Utc>) -> Vec<JobPosting> {
    let mut expired: Vec<JobPosting> = postings
        .into_iter()
        .filter(|posting| posting.is_expired(now))
        .collect();
    expired.sort_by(|a, b| b.expiry_date_time.cmp(&a.expiry_date_time));
    expired
}

/// DTO for creating or replacing a job posting.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingRequest {
    #[validate(
        length(max = 150),
        custom(function = not_blank, message = "Title is required")
    )]
    pub title: String,
    #[validate(
        length(max = 100),
        custom(function = not_blank, message = "Department is required")
    )]
    pub department: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub employment_type: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 20000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub experience: String,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub expiry_date_time: Option<DateTime<Utc>>,
}

impl JobPostingRequest {
    pub fn salary_range_is_valid(&self) -> bool {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    /// Builds the stored posting; blank requirement lines are dropped.
    pub fn into_posting(self, posted_at: DateTime<Utc>) -> JobPosting {
        JobPosting {
            id: String::new(),
            title: self.title.trim().to_string(),
            department: self.department.trim().to_string(),
            employment_type: self.employment_type,
            location: self.location,
            description: self.description,
            experience: self.experience,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            requirements: self
                .requirements
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            posted_at,
            updated_at: None,
            expiry_date_time: self.expiry_date_time,
        }
    }
}

/// Represents a document in the 'departments' collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DepartmentRequest {
    #[validate(
        length(max = 100),
        custom(function = not_blank, message = "Department name is required")
    )]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn posting(title: &str, posted_days_ago: i64, expiry: Option<i64>) -> JobPosting {
        let now = Utc::now();
        JobPosting {
            id: title.to_lowercase(),
            title: title.to_string(),
            department: "Engineering".to_string(),
            employment_type: "Full-time".to_string(),
            location: "Lusaka".to_string(),
            description: String::new(),
            experience: String::new(),
            salary_min: None,
            salary_max: None,
            requirements: vec![],
            posted_at: now - Duration::days(posted_days_ago),
            updated_at: None,
            expiry_date_time: expiry.map(|days| now + Duration::days(days)),
        }
    }

    #[test]
    fn posting_without_expiry_never_expires() {
        let p = posting("Welder", 400, None);
        assert!(!p.is_expired(Utc::now() + Duration::days(3650)));
    }

    #[test]
    fn active_and_expired_partition_the_postings() {
        let now = Utc::now();
        let all = vec![
            posting("Old", 30, Some(-1)),
            posting("Open", 2, Some(10)),
            posting("Forever", 1, None),
        ];

        let active = active_postings(all.clone(), now);
        let titles: Vec<_> = active.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Forever", "Open"]);

        let expired = expired_postings(all, now);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].title, "Old");
    }

    fn request(title: &str, department: &str) -> JobPostingRequest {
        JobPostingRequest {
            title: title.to_string(),
            department: department.to_string(),
            employment_type: String::new(),
            location: String::new(),
            description: String::new(),
            experience: String::new(),
            salary_min: None,
            salary_max: None,
            requirements: vec![],
            expiry_date_time: None,
        }
    }

    #[test]
    fn whitespace_title_or_department_is_invalid() {
        assert!(request("Welder", "Workshop").validate().is_ok());
        assert!(request("   ", "Workshop").validate().is_err());
        assert!(request("Welder", " \t ").validate().is_err());

        let blank = DepartmentRequest {
            name: "  ".to_string(),
            description: None,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn blank_requirements_are_dropped() {
        let req = JobPostingRequest {
            title: " Welder ".to_string(),
            department: "Workshop".to_string(),
            employment_type: String::new(),
            location: String::new(),
            description: String::new(),
            experience: String::new(),
            salary_min: Some(10),
            salary_max: Some(5),
            requirements: vec!["Certified".to_string(), "  ".to_string()],
            expiry_date_time: None,
        };
        assert!(!req.salary_range_is_valid());

        let posting = req.into_posting(Utc::now());
        assert_eq!(posting.title, "Welder");
        assert_eq!(posting.requirements, vec!["Certified".to_string()]);
    }
}
