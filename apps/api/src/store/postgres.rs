//! Postgres-backed job store.
//!
//! Expects a `job_postings` table shaped like:
//!
//! ```sql
//! CREATE TABLE job_postings (
//!     id             UUID PRIMARY KEY,
//!     company_id     UUID NOT NULL,
//!     title          TEXT NOT NULL,
//!     department     TEXT,
//!     job_type       TEXT NOT NULL,
//!     workplace_type TEXT NOT NULL,
//!     location       TEXT NOT NULL,
//!     skills         TEXT[] NOT NULL DEFAULT '{}',
//!     status         TEXT NOT NULL,
//!     is_active      BOOLEAN NOT NULL DEFAULT TRUE,
//!     created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{JobStore, StoreError};
use crate::models::job::{JobPosting, JobPostingRow, JobPostingUpdate};
use crate::search::criteria::SortField;
use crate::search::query::{Condition, JobQuery, TextField};

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, StoreError> {
        let mut builder = search_sql(query);
        let rows: Vec<JobPostingRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.into_iter()
            .map(|row| JobPosting::try_from(row).map_err(|e| StoreError::Data(e.to_string())))
            .collect()
    }

    async fn create(&self, posting: JobPosting) -> Result<JobPosting, StoreError> {
        sqlx::query(
            "INSERT INTO job_postings \
             (id, company_id, title, department, job_type, workplace_type, \
              location, skills, status, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(posting.id)
        .bind(posting.company_id)
        .bind(&posting.title)
        .bind(&posting.department)
        .bind(posting.job_type.as_str())
        .bind(posting.workplace_type.as_str())
        .bind(&posting.location)
        .bind(&posting.skills)
        .bind(posting.status.as_str())
        .bind(posting.is_active)
        .bind(posting.created_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(posting)
    }

    async fn update(&self, id: Uuid, update: JobPostingUpdate) -> Result<(), StoreError> {
        let Some(mut builder) = update_sql(id, &update) else {
            return Ok(()); // nothing to change
        };
        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

const SELECT_POSTINGS: &str = "SELECT id, company_id, title, department, job_type, \
     workplace_type, location, skills, status, is_active, created_at \
     FROM job_postings WHERE TRUE";

/// Renders a `JobQuery` into a parameterized SELECT. Pure; the tests below
/// assert directly on the generated SQL.
fn search_sql(query: &JobQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_POSTINGS);
    for condition in &query.conditions {
        push_condition(&mut builder, condition);
    }
    builder.push(" ORDER BY ");
    builder.push(order_column(query.order.field));
    builder.push(if query.order.descending {
        " DESC"
    } else {
        " ASC"
    });
    builder
}

fn push_condition(builder: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    match condition {
        Condition::AnyTextContains(needle) => {
            let pattern = like_pattern(needle);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR department ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR location ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        Condition::TextContains(field, needle) => {
            builder.push(" AND ");
            builder.push(text_column(*field));
            builder.push(" ILIKE ");
            builder.push_bind(like_pattern(needle));
        }
        Condition::TypeIs(job_type) => {
            builder.push(" AND job_type = ");
            builder.push_bind(job_type.as_str());
        }
        Condition::WorkplaceIs(workplace) => {
            builder.push(" AND workplace_type = ");
            builder.push_bind(workplace.as_str());
        }
        Condition::StatusIs(status) => {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        Condition::ActiveIs(active) => {
            builder.push(" AND is_active = ");
            builder.push_bind(*active);
        }
        Condition::HasAllSkills(skills) => {
            builder.push(" AND skills @> ");
            builder.push_bind(skills.clone());
        }
        Condition::CreatedWithin { from, to } => {
            if let Some(from) = from {
                builder.push(" AND created_at >= ");
                builder.push_bind(*from);
            }
            if let Some(to) = to {
                builder.push(" AND created_at <= ");
                builder.push_bind(*to);
            }
        }
        Condition::OwnedBy(company_id) => {
            builder.push(" AND company_id = ");
            builder.push_bind(*company_id);
        }
    }
}

/// Renders a partial UPDATE, or `None` when the update carries no fields.
fn update_sql(id: Uuid, update: &JobPostingUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new("UPDATE job_postings SET ");
    let mut fields = builder.separated(", ");
    if let Some(title) = &update.title {
        fields.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(department) = &update.department {
        fields
            .push("department = ")
            .push_bind_unseparated(department.clone());
    }
    if let Some(job_type) = update.job_type {
        fields
            .push("job_type = ")
            .push_bind_unseparated(job_type.as_str());
    }
    if let Some(workplace_type) = update.workplace_type {
        fields
            .push("workplace_type = ")
            .push_bind_unseparated(workplace_type.as_str());
    }
    if let Some(location) = &update.location {
        fields
            .push("location = ")
            .push_bind_unseparated(location.clone());
    }
    if let Some(skills) = &update.skills {
        fields
            .push("skills = ")
            .push_bind_unseparated(skills.clone());
    }
    if let Some(status) = update.status {
        fields
            .push("status = ")
            .push_bind_unseparated(status.as_str());
    }
    if let Some(is_active) = update.is_active {
        fields
            .push("is_active = ")
            .push_bind_unseparated(is_active);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    Some(builder)
}

/// Escapes LIKE wildcards in user input and wraps it for substring matching.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn text_column(field: TextField) -> &'static str {
    match field {
        TextField::Title => "title",
        TextField::Department => "department",
        TextField::Location => "location",
    }
}

fn order_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::Title => "title",
        SortField::Location => "location",
        SortField::Department => "department",
    }
}
