use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::search::criteria::{SearchCriteria, SearchParams, SortSpec};
use crate::search::query::{build_query, SearchScope};
use crate::state::AppState;

/// Sort order applied to a result set, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct AppliedSort {
    pub field: &'static str,
    pub direction: &'static str,
}

impl From<SortSpec> for AppliedSort {
    fn from(spec: SortSpec) -> Self {
        AppliedSort {
            field: spec.field.as_str(),
            direction: if spec.descending { "desc" } else { "asc" },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub sort: AppliedSort,
    pub jobs: Vec<JobPosting>,
}

/// GET /api/v1/jobs
/// Student-facing search: only published, active listings are visible.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    search_with_scope(&state, params, SearchScope::PublishedListings).await
}

/// GET /api/v1/companies/:company_id/jobs
/// A company's own postings, drafts included, under the same filters.
pub async fn handle_company_jobs(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    search_with_scope(&state, params, SearchScope::Company(company_id)).await
}

async fn search_with_scope(
    state: &AppState,
    params: SearchParams,
    scope: SearchScope,
) -> Result<Json<SearchResponse>, AppError> {
    let criteria = SearchCriteria::from_params(params)?;
    let query = build_query(&criteria, &scope, Utc::now());
    let jobs = state.jobs.search(&query).await?;
    Ok(Json(SearchResponse {
        count: jobs.len(),
        sort: query.order.into(),
        jobs,
    }))
}
