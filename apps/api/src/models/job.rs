#![allow(dead_code)]

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl JobType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Freelance => "freelance",
            Self::Internship => "internship",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full-time" => Some(Self::FullTime),
            "part-time" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "freelance" => Some(Self::Freelance),
            "internship" => Some(Self::Internship),
            _ => None,
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkplaceType {
    OnSite,
    Hybrid,
    Remote,
}

impl WorkplaceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSite => "on-site",
            Self::Hybrid => "hybrid",
            Self::Remote => "remote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on-site" => Some(Self::OnSite),
            "hybrid" => Some(Self::Hybrid),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Publication state. Listings are taken down by flipping status or
/// `is_active` rather than deleting the row in most flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    Published,
}

impl JobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// A job posting owned by a company account. Students only ever see postings
/// with `status = published` and `is_active = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub workplace_type: WorkplaceType,
    pub location: String,
    pub skills: Vec<String>,
    pub status: JobStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied on the posting-edit path. `None` leaves the field
/// untouched; status/`is_active` changes are how listings get taken down.
#[derive(Debug, Clone, Default)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub department: Option<String>,
    pub job_type: Option<JobType>,
    pub workplace_type: Option<WorkplaceType>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: Option<JobStatus>,
    pub is_active: Option<bool>,
}

impl JobPostingUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.department.is_none()
            && self.job_type.is_none()
            && self.workplace_type.is_none()
            && self.location.is_none()
            && self.skills.is_none()
            && self.status.is_none()
            && self.is_active.is_none()
    }

    pub fn apply_to(self, posting: &mut JobPosting) {
        if let Some(title) = self.title {
            posting.title = title;
        }
        if let Some(department) = self.department {
            posting.department = Some(department);
        }
        if let Some(job_type) = self.job_type {
            posting.job_type = job_type;
        }
        if let Some(workplace_type) = self.workplace_type {
            posting.workplace_type = workplace_type;
        }
        if let Some(location) = self.location {
            posting.location = location;
        }
        if let Some(skills) = self.skills {
            posting.skills = skills;
        }
        if let Some(status) = self.status {
            posting.status = status;
        }
        if let Some(is_active) = self.is_active {
            posting.is_active = is_active;
        }
    }
}

/// Raw `job_postings` row. Enum columns are stored as their wire labels in
/// TEXT, skills as TEXT[].
#[derive(Debug, Clone, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub department: Option<String>,
    pub job_type: String,
    pub workplace_type: String,
    pub location: String,
    pub skills: Vec<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobPostingRow> for JobPosting {
    type Error = anyhow::Error;

    fn try_from(row: JobPostingRow) -> Result<Self, Self::Error> {
        let Some(job_type) = JobType::parse(&row.job_type) else {
            bail!("row {}: unrecognized job type '{}'", row.id, row.job_type);
        };
        let Some(workplace_type) = WorkplaceType::parse(&row.workplace_type) else {
            bail!(
                "row {}: unrecognized workplace type '{}'",
                row.id,
                row.workplace_type
            );
        };
        let Some(status) = JobStatus::parse(&row.status) else {
            bail!("row {}: unrecognized status '{}'", row.id, row.status);
        };

        Ok(JobPosting {
            id: row.id,
            company_id: row.company_id,
            title: row.title,
            department: row.department,
            job_type,
            workplace_type,
            location: row.location,
            skills: row.skills,
            status,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}
