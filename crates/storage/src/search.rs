//! Text-search index over profile summaries.
//!
//! Each ingested profile contributes one document: a free-text summary plus
//! a small metadata object. The index answers ranked keyword queries; how it
//! ranks is up to the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PersistenceError, PersistenceResult};

/// A summary document to index. `id` is the profile's store identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: Uuid,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// A ranked search result; higher scores rank first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub text: String,
    pub metadata: serde_json::Value,
    pub score: f64,
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn add_document(&self, document: SearchDocument) -> PersistenceResult<()>;

    /// Remove a document. Removing an unknown id is not an error.
    async fn remove_document(&self, id: Uuid) -> PersistenceResult<()>;

    async fn count(&self) -> PersistenceResult<u64>;

    async fn search(&self, query: &str, limit: usize) -> PersistenceResult<Vec<SearchHit>>;

    /// Short name of the ranking backend, reported in ingestion stats.
    fn backend_name(&self) -> &'static str;
}

/// Search index stored in PostgreSQL and ranked with full-text search.
pub struct PgSearchIndex {
    pool: PgPool,
}

impl PgSearchIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> PersistenceResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| PersistenceError::SearchError(format!("Migration failed: {}", e)))?;
            }
        }

        info!("Search index schema ready");
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for PgSearchIndex {
    async fn add_document(&self, document: SearchDocument) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profile_summaries (id, summary, metadata, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (id) DO UPDATE SET
                summary = EXCLUDED.summary,
                metadata = EXCLUDED.metadata
            "#,
        )
        .bind(document.id)
        .bind(&document.text)
        .bind(&document.metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::SearchError(format!("Insert failed: {}", e)))?;

        debug!(profile_id = %document.id, "Indexed profile summary");
        Ok(())
    }

    async fn remove_document(&self, id: Uuid) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM profile_summaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PersistenceError::SearchError(format!("Delete failed: {}", e)))?;
        Ok(())
    }

    async fn count(&self) -> PersistenceResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profile_summaries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::SearchError(format!("Query failed: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn search(&self, query: &str, limit: usize) -> PersistenceResult<Vec<SearchHit>> {
        let rows = sqlx::query_as::<_, (Uuid, String, serde_json::Value, f64)>(
            "SELECT id, summary, metadata, \
                    ts_rank(to_tsvector('english', summary), plainto_tsquery('english', $1))::float8 AS score \
             FROM profile_summaries \
             WHERE to_tsvector('english', summary) @@ plainto_tsquery('english', $1) \
             ORDER BY score DESC \
             LIMIT $2",
        )
        .bind(query)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::SearchError(format!("Search failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, text, metadata, score)| SearchHit {
                id,
                text,
                metadata,
                score,
            })
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "postgres-fulltext"
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS profile_summaries (
    id UUID PRIMARY KEY,
    summary TEXT NOT NULL,
    metadata JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_profile_summaries_fts
    ON profile_summaries USING GIN (to_tsvector('english', summary))
"#;
