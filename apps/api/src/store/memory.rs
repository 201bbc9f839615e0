//! In-memory `JobStore` used as a test double, so search semantics and the
//! HTTP surface can be exercised without Postgres. Filtering goes through
//! `JobQuery::matches`, the reference predicate the SQL rendering mirrors.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{JobStore, StoreError};
use crate::models::job::{JobPosting, JobPostingUpdate};
use crate::search::query::{sort_postings, JobQuery};

#[derive(Default)]
pub struct InMemoryJobStore {
    postings: Mutex<HashMap<Uuid, JobPosting>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, StoreError> {
        let mut results: Vec<JobPosting> = {
            let guard = self.postings.lock().expect("job store mutex poisoned");
            guard
                .values()
                .filter(|posting| query.matches(posting))
                .cloned()
                .collect()
        };
        sort_postings(&mut results, &query.order);
        Ok(results)
    }

    async fn create(&self, posting: JobPosting) -> Result<JobPosting, StoreError> {
        let mut guard = self.postings.lock().expect("job store mutex poisoned");
        guard.insert(posting.id, posting.clone());
        Ok(posting)
    }

    async fn update(&self, id: Uuid, update: JobPostingUpdate) -> Result<(), StoreError> {
        let mut guard = self.postings.lock().expect("job store mutex poisoned");
        let posting = guard.get_mut(&id).ok_or(StoreError::NotFound)?;
        update.apply_to(posting);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut guard = self.postings.lock().expect("job store mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobStatus, JobType, WorkplaceType};
    use crate::search::criteria::{SearchCriteria, SearchParams};
    use crate::search::query::{build_query, SearchScope};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn posting(title: &str, department: Option<&str>, created_at: DateTime<Utc>) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.to_string(),
            department: department.map(str::to_string),
            job_type: JobType::FullTime,
            workplace_type: WorkplaceType::OnSite,
            location: "Boston".to_string(),
            skills: vec!["rust".to_string()],
            status: JobStatus::Published,
            is_active: true,
            created_at,
        }
    }

    fn published_query(params: SearchParams) -> JobQuery {
        let criteria = SearchCriteria::from_params(params).unwrap();
        build_query(
            &criteria,
            &SearchScope::PublishedListings,
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_free_text_search_returns_published_matches_newest_first() {
        let store = InMemoryJobStore::new();
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let older = posting("Software Engineer", None, base);
        let newer = posting("Data Analyst", Some("Engineering"), base + Duration::days(2));
        let unrelated = posting("Chef", Some("Kitchen"), base + Duration::days(1));
        let mut draft = posting("Engineer in Draft", None, base + Duration::days(3));
        draft.status = JobStatus::Draft;

        for p in [&older, &newer, &unrelated, &draft] {
            store.create(p.clone()).await.unwrap();
        }

        let results = store
            .search(&published_query(SearchParams {
                q: Some("engineer".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        let titles: Vec<&str> = results.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Data Analyst", "Software Engineer"]);
    }

    #[tokio::test]
    async fn test_status_change_hides_posting_from_students() {
        let store = InMemoryJobStore::new();
        let listed = posting("Engineer", None, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        store.create(listed.clone()).await.unwrap();

        assert_eq!(
            store
                .search(&published_query(SearchParams::default()))
                .await
                .unwrap()
                .len(),
            1
        );

        store
            .update(
                listed.id,
                JobPostingUpdate {
                    status: Some(JobStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store
            .search(&published_query(SearchParams::default()))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_posting_and_then_reports_not_found() {
        let store = InMemoryJobStore::new();
        let listed = posting("Engineer", None, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        store.create(listed.clone()).await.unwrap();

        store.delete(listed.id).await.unwrap();
        assert!(matches!(
            store.delete(listed.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_posting_reports_not_found() {
        let store = InMemoryJobStore::new();
        let result = store
            .update(
                Uuid::new_v4(),
                JobPostingUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
