//! Query construction — turns `SearchCriteria` plus a caller-supplied scope
//! into a typed `JobQuery`: a list of AND-ed conditions and an ordering.
//!
//! `JobQuery::matches` is the reference predicate; the Postgres store renders
//! the same conditions to SQL, so the decision of WHICH conditions exist lives
//! here and only here.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::criteria::{SearchCriteria, SortField, SortSpec};
use crate::models::job::{JobPosting, JobStatus, JobType, WorkplaceType};

/// Posting fields addressable by substring conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Department,
    Location,
}

/// One AND-conjunct of a job query.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive substring match against title, department, or
    /// location — the free-text `q` parameter, and the only OR group.
    AnyTextContains(String),
    /// Case-insensitive substring match against a single field.
    TextContains(TextField, String),
    TypeIs(JobType),
    WorkplaceIs(WorkplaceType),
    StatusIs(JobStatus),
    ActiveIs(bool),
    /// The posting's skill set must contain every listed skill.
    HasAllSkills(Vec<String>),
    /// Inclusive creation-time bounds; either side may be open.
    CreatedWithin {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    OwnedBy(Uuid),
}

impl Condition {
    pub fn matches(&self, posting: &JobPosting) -> bool {
        match self {
            Condition::AnyTextContains(needle) => {
                contains_ci(&posting.title, needle)
                    || posting
                        .department
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, needle))
                    || contains_ci(&posting.location, needle)
            }
            Condition::TextContains(field, needle) => match field {
                TextField::Title => contains_ci(&posting.title, needle),
                TextField::Department => posting
                    .department
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, needle)),
                TextField::Location => contains_ci(&posting.location, needle),
            },
            Condition::TypeIs(job_type) => posting.job_type == *job_type,
            Condition::WorkplaceIs(workplace) => posting.workplace_type == *workplace,
            Condition::StatusIs(status) => posting.status == *status,
            Condition::ActiveIs(active) => posting.is_active == *active,
            Condition::HasAllSkills(required) => required
                .iter()
                .all(|skill| posting.skills.iter().any(|have| have == skill)),
            Condition::CreatedWithin { from, to } => {
                from.map_or(true, |lower| posting.created_at >= lower)
                    && to.map_or(true, |upper| posting.created_at <= upper)
            }
            Condition::OwnedBy(company_id) => posting.company_id == *company_id,
        }
    }
}

/// Caller-supplied visibility constraint, AND-ed in ahead of every optional
/// parameter and never overridable by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// What students see: published and active listings only.
    PublishedListings,
    /// A company's own postings, drafts included.
    Company(Uuid),
}

/// A fully-built filter plus ordering, ready for any `JobStore` backend.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub conditions: Vec<Condition>,
    pub order: SortSpec,
}

impl JobQuery {
    /// Reference predicate: a posting is in the result set iff every
    /// condition holds.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.conditions.iter().all(|c| c.matches(posting))
    }
}

/// Builds the filter for `criteria` under `scope`. Pure: relative time
/// windows are anchored on the `now` the caller passes in.
pub fn build_query(criteria: &SearchCriteria, scope: &SearchScope, now: DateTime<Utc>) -> JobQuery {
    let mut conditions = Vec::new();

    match scope {
        SearchScope::PublishedListings => {
            conditions.push(Condition::StatusIs(JobStatus::Published));
            conditions.push(Condition::ActiveIs(true));
        }
        SearchScope::Company(company_id) => {
            conditions.push(Condition::OwnedBy(*company_id));
        }
    }

    if let Some(q) = &criteria.q {
        conditions.push(Condition::AnyTextContains(q.clone()));
    }
    if let Some(title) = &criteria.title {
        conditions.push(Condition::TextContains(TextField::Title, title.clone()));
    }
    if let Some(department) = &criteria.department {
        conditions.push(Condition::TextContains(
            TextField::Department,
            department.clone(),
        ));
    }
    if let Some(location) = &criteria.location {
        conditions.push(Condition::TextContains(
            TextField::Location,
            location.clone(),
        ));
    }
    if let Some(job_type) = criteria.job_type {
        conditions.push(Condition::TypeIs(job_type));
    }
    if let Some(workplace_type) = criteria.workplace_type {
        conditions.push(Condition::WorkplaceIs(workplace_type));
    }
    if let Some(status) = criteria.status {
        conditions.push(Condition::StatusIs(status));
    }
    if !criteria.skills.is_empty() {
        conditions.push(Condition::HasAllSkills(criteria.skills.clone()));
    }

    // Explicit bounds win; the relative window only applies when neither
    // bound is present.
    if criteria.created_from.is_some() || criteria.created_to.is_some() {
        conditions.push(Condition::CreatedWithin {
            from: criteria.created_from,
            to: criteria.created_to,
        });
    } else if let Some(days) = criteria.last_days {
        conditions.push(Condition::CreatedWithin {
            from: Some(now - Duration::days(days)),
            to: Some(now),
        });
    }

    JobQuery {
        conditions,
        order: criteria.sort_spec(),
    }
}

/// Reference ordering used by the in-memory store; the Postgres store emits
/// an equivalent ORDER BY.
pub fn sort_postings(postings: &mut [JobPosting], spec: &SortSpec) {
    postings.sort_by(|a, b| {
        let ordering = match spec.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
            SortField::Department => a
                .department
                .as_deref()
                .map(str::to_lowercase)
                .cmp(&b.department.as_deref().map(str::to_lowercase)),
        };
        if spec.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::criteria::{SearchParams, SortField};
    use chrono::TimeZone;

    fn posting(title: &str, department: Option<&str>, location: &str) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.to_string(),
            department: department.map(str::to_string),
            job_type: JobType::FullTime,
            workplace_type: WorkplaceType::OnSite,
            location: location.to_string(),
            skills: vec!["rust".to_string(), "sql".to_string()],
            status: JobStatus::Published,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn criteria(params: SearchParams) -> SearchCriteria {
        SearchCriteria::from_params(params).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_published_scope_conditions_lead_the_query() {
        let query = build_query(
            &criteria(SearchParams::default()),
            &SearchScope::PublishedListings,
            now(),
        );
        assert_eq!(
            query.conditions,
            vec![
                Condition::StatusIs(JobStatus::Published),
                Condition::ActiveIs(true),
            ]
        );
    }

    #[test]
    fn test_empty_criteria_add_no_optional_conditions() {
        let company = Uuid::new_v4();
        let query = build_query(
            &criteria(SearchParams::default()),
            &SearchScope::Company(company),
            now(),
        );
        assert_eq!(query.conditions, vec![Condition::OwnedBy(company)]);
    }

    #[test]
    fn test_q_matches_any_of_the_text_trio_case_insensitively() {
        let query = build_query(
            &criteria(SearchParams {
                q: Some("ENGineer".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        assert!(query.matches(&posting("Software Engineer", None, "Boston")));
        assert!(query.matches(&posting("Analyst", Some("Engineering"), "Boston")));
        assert!(query.matches(&posting("Chef", None, "Engineer's Bay")));
        assert!(!query.matches(&posting("Chef", Some("Kitchen"), "Boston")));
    }

    #[test]
    fn test_individual_text_params_are_all_required() {
        let query = build_query(
            &criteria(SearchParams {
                title: Some("engineer".to_string()),
                location: Some("berlin".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        assert!(query.matches(&posting("Platform Engineer", None, "Berlin")));
        // Title matches but location does not: AND semantics.
        assert!(!query.matches(&posting("Platform Engineer", None, "Boston")));
    }

    #[test]
    fn test_q_does_not_match_skills_or_type() {
        let query = build_query(
            &criteria(SearchParams {
                q: Some("rust".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );
        // The sample posting lists "rust" as a skill but nowhere in its text
        // fields.
        assert!(!query.matches(&posting("Chef", None, "Boston")));
    }

    #[test]
    fn test_skills_require_every_listed_skill() {
        let query = build_query(
            &criteria(SearchParams {
                skills: Some("rust,sql".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        let both = posting("Engineer", None, "Boston");
        assert!(query.matches(&both));

        let mut only_one = posting("Engineer", None, "Boston");
        only_one.skills = vec!["rust".to_string()];
        assert!(!only_one.skills.contains(&"sql".to_string()));
        assert!(!query.matches(&only_one));
    }

    #[test]
    fn test_time_window_bounds_creation_date() {
        let query = build_query(
            &criteria(SearchParams {
                time: Some("30d".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        let mut recent = posting("Engineer", None, "Boston");
        recent.created_at = now() - Duration::days(29);
        assert!(query.matches(&recent));

        let mut stale = posting("Engineer", None, "Boston");
        stale.created_at = now() - Duration::days(31);
        assert!(!query.matches(&stale));
    }

    #[test]
    fn test_explicit_bounds_make_time_irrelevant() {
        let query = build_query(
            &criteria(SearchParams {
                from: Some("2024-06-01".to_string()),
                to: Some("2024-06-10".to_string()),
                time: Some("2d".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        // Inside from/to but far outside the 2-day window: still matches.
        let mut inside_bounds = posting("Engineer", None, "Boston");
        inside_bounds.created_at = Utc.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).unwrap();
        assert!(query.matches(&inside_bounds));

        // Inside the 2-day window but outside from/to: rejected.
        let mut outside_bounds = posting("Engineer", None, "Boston");
        outside_bounds.created_at = now() - Duration::days(1);
        assert!(!query.matches(&outside_bounds));
    }

    #[test]
    fn test_scope_cannot_be_relaxed_by_parameters() {
        // Asking for drafts does not widen the published-listings scope; the
        // two status conditions simply AND into an unsatisfiable filter.
        let query = build_query(
            &criteria(SearchParams {
                status: Some("draft".to_string()),
                ..Default::default()
            }),
            &SearchScope::PublishedListings,
            now(),
        );

        let mut draft = posting("Engineer", None, "Boston");
        draft.status = JobStatus::Draft;
        assert!(!query.matches(&draft));
        assert!(!query.matches(&posting("Engineer", None, "Boston")));
    }

    #[test]
    fn test_published_scope_excludes_inactive_postings() {
        let query = build_query(
            &criteria(SearchParams::default()),
            &SearchScope::PublishedListings,
            now(),
        );
        let mut inactive = posting("Engineer", None, "Boston");
        inactive.is_active = false;
        assert!(!query.matches(&inactive));
    }

    #[test]
    fn test_company_scope_filters_on_owner() {
        let company = Uuid::new_v4();
        let query = build_query(
            &criteria(SearchParams::default()),
            &SearchScope::Company(company),
            now(),
        );

        let mut owned = posting("Engineer", None, "Boston");
        owned.company_id = company;
        owned.status = JobStatus::Draft; // drafts visible to their owner
        assert!(query.matches(&owned));

        assert!(!query.matches(&posting("Engineer", None, "Boston")));
    }

    #[test]
    fn test_omitting_a_parameter_only_relaxes_the_filter() {
        let full_params = SearchParams {
            q: Some("engineer".to_string()),
            skills: Some("rust,sql".to_string()),
            workplace_type: Some("on-site".to_string()),
            time: Some("30d".to_string()),
            ..Default::default()
        };
        let relaxed_params = SearchParams {
            skills: None,
            ..full_params.clone()
        };

        let full = build_query(
            &criteria(full_params),
            &SearchScope::PublishedListings,
            now(),
        );
        let relaxed = build_query(
            &criteria(relaxed_params),
            &SearchScope::PublishedListings,
            now(),
        );

        // Dropping a parameter drops exactly its condition.
        assert_eq!(relaxed.conditions.len(), full.conditions.len() - 1);
        assert!(relaxed
            .conditions
            .iter()
            .all(|c| full.conditions.contains(c)));

        // So anything the full query accepted, the relaxed one accepts too.
        let mut sample = posting("Software Engineer", None, "Boston");
        sample.created_at = now() - Duration::days(3);
        assert!(full.matches(&sample));
        assert!(relaxed.matches(&sample));
    }

    #[test]
    fn test_sort_postings_created_at_descending() {
        let mut a = posting("A", None, "X");
        a.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut b = posting("B", None, "X");
        b.created_at = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let mut c = posting("C", None, "X");
        c.created_at = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();

        let mut postings = vec![a, b, c];
        sort_postings(&mut postings, &SortSpec::default());
        let titles: Vec<&str> = postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_postings_title_ascending_ignores_case() {
        let mut postings = vec![
            posting("banana", None, "X"),
            posting("Apple", None, "X"),
            posting("cherry", None, "X"),
        ];
        sort_postings(
            &mut postings,
            &SortSpec {
                field: SortField::Title,
                descending: false,
            },
        );
        let titles: Vec<&str> = postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }
}
