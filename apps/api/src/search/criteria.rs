//! Search parameter parsing — raw query strings into a typed `SearchCriteria`.
//!
//! Every parameter is optional; absence (or a blank value) contributes no
//! constraint. Malformed values that DO arrive — bad dates, unknown enum
//! labels, unknown sort fields — are rejected with a validation error rather
//! than silently matching everything.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{JobStatus, JobType, WorkplaceType};

/// Raw search parameters as they arrive on the query string.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub workplace_type: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    /// Comma-separated skill list.
    pub skills: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// Relative window such as `30d`; ignored when `from`/`to` is present.
    pub time: Option<String>,
    /// Sort field, optionally prefixed with `-` for descending.
    pub sort: Option<String>,
}

/// Fields a search can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Title,
    Location,
    Department,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Title => "title",
            Self::Location => "location",
            Self::Department => "department",
        }
    }
}

/// Requested result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    /// Most-recently-created first.
    fn default() -> Self {
        SortSpec {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

/// Typed, request-scoped search criteria. Never persisted; built fresh from
/// `SearchParams` on every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub q: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub job_type: Option<JobType>,
    pub workplace_type: Option<WorkplaceType>,
    pub status: Option<JobStatus>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub last_days: Option<i64>,
    pub sort: Option<SortSpec>,
}

impl SearchCriteria {
    pub fn from_params(params: SearchParams) -> Result<Self, AppError> {
        let job_type = match non_blank(params.job_type) {
            Some(raw) => Some(
                JobType::parse(&raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown job type '{raw}'")))?,
            ),
            None => None,
        };
        let workplace_type = match non_blank(params.workplace_type) {
            Some(raw) => Some(WorkplaceType::parse(&raw).ok_or_else(|| {
                AppError::Validation(format!("Unknown workplace type '{raw}'"))
            })?),
            None => None,
        };
        let status = match non_blank(params.status) {
            Some(raw) => Some(
                JobStatus::parse(&raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown status '{raw}'")))?,
            ),
            None => None,
        };

        let created_from = match non_blank(params.from) {
            Some(raw) => Some(parse_day(&raw, "from")?.and_time(NaiveTime::MIN).and_utc()),
            None => None,
        };
        let created_to = match non_blank(params.to) {
            Some(raw) => {
                let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).expect("valid time of day");
                Some(parse_day(&raw, "to")?.and_time(end_of_day).and_utc())
            }
            None => None,
        };

        let sort = match non_blank(params.sort) {
            Some(raw) => Some(parse_sort(&raw)?),
            None => None,
        };

        Ok(SearchCriteria {
            q: non_blank(params.q),
            title: non_blank(params.title),
            department: non_blank(params.department),
            job_type,
            workplace_type,
            status,
            location: non_blank(params.location),
            skills: split_skills(params.skills.as_deref().unwrap_or_default()),
            created_from,
            created_to,
            last_days: non_blank(params.time).and_then(|raw| parse_window_days(&raw)),
            sort,
        })
    }

    /// The ordering to apply, falling back to newest-first.
    pub fn sort_spec(&self) -> SortSpec {
        self.sort.unwrap_or_default()
    }
}

/// Trims and treats empty strings the same as absent parameters.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Splits a comma-separated skill list, trimming entries and dropping empties.
fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_day(raw: &str, param: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "Invalid '{param}' date '{raw}' (expected YYYY-MM-DD)"
        ))
    })
}

/// Extracts the day count from a relative window like `30d`. Values without
/// digits, or that come out non-positive, carry no constraint.
fn parse_window_days(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok().filter(|days| *days > 0)
}

fn parse_sort(raw: &str) -> Result<SortSpec, AppError> {
    let (field_name, descending) = match raw.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    let field = match field_name {
        "createdAt" => SortField::CreatedAt,
        "title" => SortField::Title,
        "location" => SortField::Location,
        "department" => SortField::Department,
        _ => {
            return Err(AppError::Validation(format!(
                "Unknown sort field '{field_name}'"
            )))
        }
    };
    Ok(SortSpec { field, descending })
}
