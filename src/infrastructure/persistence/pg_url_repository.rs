//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{InsertOutcome, UrlRepository};
use crate::error::AppError;

/// Row shape of the `urls` table.
#[derive(sqlx::FromRow)]
struct UrlRow {
    id: String,
    original_url: String,
    created_at: DateTime<Utc>,
    created_by: String,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<String>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            original_url: row.original_url,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
        }
    }
}

// Checked against migrations/ by the #[sqlx::test] suite in
// tests/repository_url.rs.
const FIND_BY_ID: &str = "
    SELECT id, original_url, created_at, created_by, modified_at, modified_by
    FROM urls
    WHERE id = $1";

const FIND_BY_ORIGINAL_URL: &str = "
    SELECT id, original_url, created_at, created_by, modified_at, modified_by
    FROM urls
    WHERE original_url = $1
    ORDER BY created_at
    LIMIT 1";

const INSERT_IF_ABSENT: &str = "
    INSERT INTO urls (id, original_url, created_at, created_by, modified_at, modified_by)
    VALUES ($1, $2, NOW(), $3, NOW(), $3)
    ON CONFLICT (id) DO NOTHING
    RETURNING id, original_url, created_at, created_by, modified_at, modified_by";

const COUNT: &str = "SELECT COUNT(*) FROM urls";

/// PostgreSQL repository for short URL records.
///
/// The primary key on `id` enforces uniqueness. Inserts use
/// `ON CONFLICT (id) DO NOTHING`, so a single statement either writes the whole
/// row or nothing; a cancelled request cannot leave a partial record.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    actor: String,
}

impl PgUrlRepository {
    /// Creates a repository stamping `created_by` with `actor`.
    pub fn new(pool: Arc<PgPool>, actor: impl Into<String>) -> Self {
        Self {
            pool,
            actor: actor.into(),
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(FIND_BY_ID)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(FIND_BY_ORIGINAL_URL)
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        let inserted = sqlx::query_as::<_, UrlRow>(INSERT_IF_ABSENT)
        .bind(&new_record.id)
        .bind(&new_record.original_url)
        .bind(&self.actor)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Inserted(row.into()));
        }

        // The conflicting row may have been committed after this statement's
        // snapshot; a fresh statement sees it.
        match self.find_by_id(&new_record.id).await? {
            Some(existing) => Ok(InsertOutcome::AlreadyExists(existing)),
            None => Err(AppError::storage(
                "Insert conflicted but no record was found",
                json!({ "id": new_record.id }),
            )),
        }
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
